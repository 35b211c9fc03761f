//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every stored collection (users, restaurants,
//! menu items, orders) implements to be managed by the generic `ResourceActor`.
//!
//! Besides the CRUD + Action hooks, an entity describes how it is *queried*:
//!
//! - [`ActorEntity::matches`] decides whether a record belongs to a `Filter`.
//! - [`ActorEntity::compare`] orders two records for a `Sort` key.
//! - [`ActorEntity::measure`] is the numeric field summed by `Sum` requests.
//!
//! Only `matches` is required. The default `compare` keeps id order and the default
//! `measure` is zero, so collections that are never sorted or summed need no extra code.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};

/// Trait that any stored record must implement to be managed by a `ResourceActor`.
///
/// # Async & Context
/// Hooks are `async` so an entity can call other actors while it is being created or
/// mutated. The `Context` type is injected into every hook at `run()` time, which lets
/// actors be wired together after construction.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Unique identifier, generated from the actor's `u32` counter.
    type Id: Ord + Clone + Send + Sync + Display + Debug + From<u32>;

    /// Data required to create a new record.
    type Create: Send + Sync + Debug;

    /// Data required to update an existing record.
    type Update: Send + Sync + Debug;

    /// Record-specific operations that do not fit plain CRUD.
    type Action: Send + Sync + Debug;

    /// Result returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Runtime dependencies injected into hooks. Use `()` if none are needed.
    type Context: Send + Sync;

    /// Per-collection error type. Boxed into `FrameworkError::EntityError` on the wire and
    /// recoverable by the client through `downcast`.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Selection criteria accepted by `Find`, `Count` and `Sum`.
    type Filter: Send + Sync + Debug;

    /// Ordering keys accepted by `Find`.
    type Sort: Send + Sync + Debug;

    /// Construct the record from the generated id and the creation payload.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Returns `true` when this record is selected by `filter`.
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Orders two records for `sort`.
    fn compare(&self, _other: &Self, _sort: &Self::Sort) -> Ordering {
        Ordering::Equal
    }

    /// The quantity summed by `Sum` requests.
    fn measure(&self) -> u64 {
        0
    }

    // --- Lifecycle Hooks (Async) ---

    /// Called after the record is constructed, before it is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the record is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a record-specific action. Runs to completion before the actor reads the next
    /// request, so an action is atomic with respect to the whole collection.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
