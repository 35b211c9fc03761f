//! # Menu Actor
//!
//! Stores every restaurant's dishes in one collection, keyed by [`MenuItemId`] and
//! selected per restaurant through [`MenuItemFilter`].
//!
//! [`MenuItemId`]: crate::model::MenuItemId
//! [`MenuItemFilter`]: crate::model::MenuItemFilter

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::MenuClient;
use crate::model::MenuItem;
use forkline_actor::ResourceActor;

/// Creates a new Menu actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<MenuItem>, MenuClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, MenuClient::new(generic_client))
}
