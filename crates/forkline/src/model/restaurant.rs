use serde::{Deserialize, Serialize};

use super::UserId;

entity_id!(
    /// Type-safe identifier for Restaurants.
    RestaurantId,
    "restaurant"
);

/// A restaurant, owned by exactly one user.
///
/// Restaurants are never removed: "deleting" one clears `is_active`, so historical
/// orders keep a valid reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub cuisine: String,
    pub is_active: bool,
    pub rating: f32,
    pub review_count: u32,
}

/// Payload for creating a restaurant. The owner is always the calling user.
#[derive(Debug, Clone)]
pub struct RestaurantCreate {
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub cuisine: String,
}

/// Payload for updating a restaurant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cuisine: Option<String>,
    pub is_active: Option<bool>,
}

/// Restaurant-specific actions.
#[derive(Debug, Clone)]
pub enum RestaurantAction {
    /// Folds one review (1 to 5 stars) into the running rating.
    RecordReview { stars: u8 },
}

/// Selection criteria for restaurant queries.
#[derive(Debug, Clone, Default)]
pub struct RestaurantFilter {
    pub owner_id: Option<UserId>,
    pub active_only: bool,
    /// Exact, case-insensitive cuisine match.
    pub cuisine: Option<String>,
    pub min_rating: Option<f32>,
    /// Case-insensitive substring of name, cuisine or description.
    pub text: Option<String>,
}

/// Sort keys for restaurant queries.
#[derive(Debug, Clone, Copy)]
pub enum RestaurantSort {
    RatingDesc,
}
