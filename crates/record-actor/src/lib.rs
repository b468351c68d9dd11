//! # Record Actor
//!
//! A keyed record store that runs as a Tokio actor. One task owns the records and
//! processes requests one at a time; any number of cloned clients talk to it over a
//! channel. The store is generic over the record type, which describes itself through
//! the [`ActorEntity`] trait.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - the record's data, filter matching and hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - message loop, identity, timestamps, ordering
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed async calls
//!
//! ## Store Contract
//!
//! | Request | Result |
//! |---------|--------|
//! | `create(params)` | new [`Stored`] record with identity and timestamps |
//! | `get(id)` | the record, if present |
//! | `query(Query { filter, sort, limit })` | matching records, ordered, truncated |
//! | `find_one(filter)` | first match in creation order |
//! | `update(id, update)` | the record after `on_update`, `updated_at` bumped |
//! | `delete(id)` | removes the record |
//!
//! Each request is atomic on its own. A caller that reads, decides and writes in
//! separate requests is not isolated from other callers doing the same: the last
//! write wins.
//!
//! ## Context Injection
//!
//! Dependencies are passed to [`ResourceActor::run`], not to `new()`, and reach every
//! hook as `&Self::Context`. A record type that must validate writes against shared
//! reference data receives that data this way.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers client requests from scripted expectations, so code
//! built on a client can be tested without a running actor.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod query;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
pub use query::{Direction, Query, Sort, SortKey, Stored};
