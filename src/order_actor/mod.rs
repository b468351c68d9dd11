//! # Order Actor
//!
//! Keeps every [`OrderSession`] in a single [`ResourceActor`] task.
//!
//! ## Structure
//!
//! - [`context`] - [`OrderContext`], the catalog and the issued session ids
//! - [`entity`] - [`ActorEntity`](record_actor::ActorEntity) implementation for [`OrderSession`]
//! - [`error`] - [`OrderError`]
//! - [`new()`] - factory returning the actor and its [`OrderClient`]
//!
//! ## Usage
//!
//! ```rust
//! use order_bot::model::{OrderCreate, PricingCatalog, SessionId};
//! use order_bot::clients::OrderStore;
//! use order_bot::order_actor::OrderContext;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = order_bot::order_actor::new(32);
//!     tokio::spawn(actor.run(OrderContext::new(Arc::new(PricingCatalog::laundry()))));
//!
//!     let order = client
//!         .create(OrderCreate {
//!             session_id: SessionId::from_digits(482913),
//!             user: "2348000000000".into(),
//!         })
//!         .await
//!         .unwrap();
//!     assert!(order.value.is_active());
//! }
//! ```

pub mod context;
pub mod entity;
pub mod error;

pub use context::OrderContext;
pub use error::*;

use crate::clients::OrderClient;
use crate::model::OrderSession;
use record_actor::ResourceActor;

/// Creates a new order session actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<OrderSession>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, OrderClient::new(generic_client))
}
