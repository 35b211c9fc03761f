//! # Forkline Actor Engine
//!
//! The storage engine underneath the Forkline ordering platform. Every collection
//! (users, restaurants, menu items, orders) is owned by one [`ResourceActor`] running in
//! its own Tokio task; callers talk to it through a cloneable [`ResourceClient`].
//!
//! ## Layers
//!
//! 1. **Entity** ([`ActorEntity`]): the record type, its payloads, its actions and how it
//!    is filtered, sorted and summed.
//! 2. **Runtime** ([`ResourceActor`]): the sequential message loop that owns the records.
//! 3. **Interface** ([`ResourceClient`], [`ActorClient`]): typed async calls over channels.
//!
//! ## Requests
//!
//! | Request | Purpose |
//! |---|---|
//! | `Create` / `Get` / `Update` / `Delete` | single-record CRUD |
//! | `Action` | record-specific mutation, atomic per collection |
//! | `Find` | filter + optional sort + optional limit |
//! | `Count` | number of records matching a filter |
//! | `Sum` | sum of [`ActorEntity::measure`] over a filter |
//!
//! ## Consistency
//!
//! Requests on one collection are processed one at a time, so each request sees a state
//! that lies between two writes. Two requests sent back to back may straddle a write made
//! by someone else; there are no multi-request transactions.
//!
//! ## Context Injection
//!
//! Dependencies are passed to `run()`, not `new()`. Actors can therefore be created first
//! and wired afterwards:
//!
//! ```rust,ignore
//! let (user_actor, user_client) = ResourceActor::<User>::new(32);
//! let (order_actor, order_client) = ResourceActor::<Order>::new(32);
//! tokio::spawn(user_actor.run(()));
//! tokio::spawn(order_actor.run(()));
//! ```
//!
//! ## Testing
//!
//! See [`mock`] for scripted clients that answer without a running actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Query, ResourceRequest, Response};
