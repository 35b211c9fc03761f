use serde::{Deserialize, Serialize};

use super::RestaurantId;

entity_id!(
    /// Type-safe identifier for MenuItems.
    MenuItemId,
    "menu_item"
);

/// A dish on a restaurant's menu. Prices are whole currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub category: String,
    pub price: u64,
    pub is_available: bool,
}

/// Payload for adding a menu item.
#[derive(Debug, Clone)]
pub struct MenuItemCreate {
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub category: String,
    pub price: u64,
    pub is_available: bool,
}

/// Payload for updating a menu item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<u64>,
    pub is_available: Option<bool>,
}

/// Selection criteria for menu queries.
#[derive(Debug, Clone, Default)]
pub struct MenuItemFilter {
    pub restaurant_id: Option<RestaurantId>,
    pub available_only: bool,
    pub category: Option<String>,
}

impl MenuItemFilter {
    /// Every item of a restaurant, available or not.
    pub fn restaurant(restaurant_id: RestaurantId) -> Self {
        Self {
            restaurant_id: Some(restaurant_id),
            ..Self::default()
        }
    }
}

/// Sort keys for menu queries.
#[derive(Debug, Clone, Copy)]
pub enum MenuSort {
    CategoryThenName,
}
