//! # Platform Lifecycle & Orchestration
//!
//! Actors stay simple; wiring them is where the platform lives. This module holds the
//! services that coordinate several actors and the [`Platform`] that starts and stops
//! all of them.
//!
//! - [`OrderLifecycle`]: places orders and moves them through their statuses, guarded
//!   by ownership and followed by queued notifications.
//! - [`CatalogService`]: restaurants, menus and the owner dashboard.
//! - [`Platform`]: creates actors, injects their context, spawns the outbox worker and
//!   shuts everything down in order.
//!
//! ## Dependency Injection via Context
//!
//! Actors are created first and receive their dependencies in `run(context)`. Only the
//! order actor has one: a restaurant client, used to re-check the restaurant when an
//! order is committed.
//!
//! ## Graceful Shutdown
//!
//! 1. Drop every client and service. The outbox sender goes with the lifecycle.
//! 2. The outbox worker drains its queue and exits, releasing its user client.
//! 3. Each actor sees its channel close and exits; the order actor releases its
//!    restaurant client on the way out.
//!
//! The dependency graph is acyclic, so channel closure alone is enough.

pub mod catalog;
pub mod order_lifecycle;
pub mod platform;

pub use catalog::*;
pub use order_lifecycle::*;
pub use platform::*;
