//! # User Actor
//!
//! Holds the platform's accounts: diners, restaurant owners, riders and admins. Users
//! carry the push token the notification gateway reads, so this collection is the
//! gateway's directory as well.
//!
//! The actor has no dependencies (`Context = ()`).
//!
//! ```rust,ignore
//! let (actor, client) = user_actor::new(32);
//! tokio::spawn(actor.run(()));
//! let id = client.create_user(UserCreate { .. }).await?;
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::UserClient;
use crate::model::User;
use forkline_actor::ResourceActor;

/// Creates a new User actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<User>, UserClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, UserClient::new(generic_client))
}
