//! # Restaurant Actor
//!
//! Stores restaurants and their running review rating. Restaurants are deactivated,
//! never removed, so orders always resolve their restaurant reference.
//!
//! ## Custom Actions
//!
//! - [`RestaurantAction::RecordReview`](crate::model::RestaurantAction): folds one star
//!   rating into `rating` / `review_count` atomically.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::RestaurantClient;
use crate::model::Restaurant;
use forkline_actor::ResourceActor;

/// Creates a new Restaurant actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Restaurant>, RestaurantClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, RestaurantClient::new(generic_client))
}
