//! # Order Actor
//!
//! Stores orders and applies every change to them. Orders are never updated
//! free-form nor deleted: the only mutations are the [`OrderAction`]s.
//!
//! ## Dependencies
//!
//! The actor runs with a [`RestaurantClient`] as its context. `on_create` re-reads the
//! restaurant at commit time and refuses the order if it is missing or inactive, then
//! moves the fresh record from `created` to `pending`.
//!
//! ```rust,ignore
//! let (order_actor, order_client) = order_actor::new(32);
//! tokio::spawn(order_actor.run(restaurant_client.clone()));
//! ```
//!
//! ## Per-order serialization
//!
//! [`OrderAction::Transition`] is a compare-and-set on the status. Because the actor
//! handles one request at a time, two callers racing on the same order cannot both
//! succeed from the same source status: the loser gets
//! [`OrderError::StaleStatus`] and must re-read.
//!
//! [`OrderAction`]: crate::model::OrderAction
//! [`OrderAction::Transition`]: crate::model::OrderAction::Transition
//! [`RestaurantClient`]: crate::clients::RestaurantClient

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::OrderClient;
use crate::model::Order;
use forkline_actor::ResourceActor;

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, OrderClient::new(generic_client))
}
