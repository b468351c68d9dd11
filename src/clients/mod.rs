//! Typed access to the order session store.
//!
//! [`OrderStore`] is the contract the conversation layer depends on;
//! [`OrderClient`] fulfils it on top of the order actor.

pub mod order_client;
pub mod order_store;

pub use order_client::*;
pub use order_store::*;
