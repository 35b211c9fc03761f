//! # Forkline
//!
//! Core of a food-ordering platform: diners order from restaurants, owners run menus
//! and fulfillment, and both sides get push notifications as orders move.
//!
//! ## Components
//!
//! - [`guard`]: who may read or change a restaurant, menu item or order.
//! - [`aggregator`]: the owner dashboard's figures for "today".
//! - [`notify`]: token validation, batching and concurrent push dispatch.
//! - [`lifecycle`]: order placement and status transitions, catalog management, and the
//!   [`Platform`] that wires everything together.
//!
//! Records live in resource actors from [`forkline_actor`], one per collection
//! ([`user_actor`], [`restaurant_actor`], [`menu_actor`], [`order_actor`]), reached
//! through the typed wrappers in [`clients`].

pub mod aggregator;
pub mod clients;
pub mod clock;
pub mod config;
pub mod error;
pub mod guard;
pub mod lifecycle;
pub mod menu_actor;
pub mod model;
pub mod notify;
pub mod order_actor;
pub mod restaurant_actor;
pub mod user_actor;

pub use config::PlatformConfig;
pub use error::{ErrorCode, NotifyError, PlatformError};
pub use lifecycle::Platform;
