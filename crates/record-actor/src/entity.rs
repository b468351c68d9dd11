//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract a record type must satisfy to be kept by a
//! [`ResourceActor`](crate::ResourceActor). It names the identity, creation and update
//! payloads, the filter used by queries, the injected runtime context and the error type,
//! and provides the lifecycle hooks (`on_create`, `on_update`, `on_delete`) that the actor
//! calls while it owns the record.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//!
//! Both default to `Ok(())`. `on_update` and `matches` must be implemented.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record type must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// Hooks are `async` so an entity may consult other services while it is being
/// created or mutated. The `Context` is handed to `run()` rather than `new()`, so
/// dependencies can be wired after every actor has been constructed.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// Store-assigned identity. Built from the actor's sequential counter.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new record.
    type Create: Send + Sync + Debug;

    /// A mutation applied to an existing record.
    type Update: Send + Sync + Debug;

    /// Predicate description used by `Query` requests.
    type Filter: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One enum per entity rather than one per operation: every hook returns the same
    /// error type, which keeps client code to a single `match`.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the record from its identity and creation payload.
    /// Called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Whether this record is selected by `filter`.
    fn matches(&self, filter: &Self::Filter) -> bool;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction and before the record becomes visible.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply `update` to the record. Returning an error leaves the stored record untouched.
    async fn on_update(&mut self, update: Self::Update, ctx: &Self::Context)
        -> Result<(), Self::Error>;

    /// Called immediately before the record is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }
}
