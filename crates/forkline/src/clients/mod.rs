//! Type-safe wrappers around [`ResourceClient`](forkline_actor::ResourceClient).
//!
//! Every client maps engine failures into its collection's error enum. Entity errors
//! raised inside the actor are recovered by downcast, so callers match on
//! `OrderError::StaleStatus` rather than on a stringified message.

pub mod menu_client;
pub mod order_client;
pub mod restaurant_client;
pub mod user_client;

pub use menu_client::*;
pub use order_client::*;
pub use restaurant_client::*;
pub use user_client::*;
