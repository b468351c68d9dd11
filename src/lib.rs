//! # Order Bot
//!
//! A conversational order-taking engine for a laundry pickup/delivery service.
//! Inbound chat events are classified into an intent, handled against a per-user
//! order session, and answered with one of five reply payloads. Receiving events
//! and delivering replies are left to the caller.
//!
//! ## Module Tour
//!
//! ### 1. The Conversation ([`conversation`])
//! - [`event`](conversation::event) - inbound envelope and the normalized [`Message`](conversation::Message)
//! - [`intent`](conversation::intent) - ordered rule table, first match wins
//! - [`grammar`](conversation::grammar) - `item-<id>, count-<n>; ...` parser
//! - [`workflow`](conversation::workflow) - per-intent handlers, order summary
//! - [`dispatch`](conversation::dispatch) - classify then handle, once per event
//!
//! ### 2. The Store ([`order_actor`], [`clients`])
//! Order sessions live in a [`record_actor::ResourceActor`]. The conversation layer only
//! sees the [`OrderStore`](clients::OrderStore) trait, implemented by
//! [`OrderClient`](clients::OrderClient).
//!
//! ### 3. The Data ([`model`])
//! Sessions, filters and updates, and the [`PricingCatalog`](model::PricingCatalog).
//!
//! ### 4. The Replies ([`response`])
//! Pure builders for the channel's payload JSON.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! Configuration, tracing, and [`OrderSystem`](lifecycle::OrderSystem).
//!
//! ## Error Handling
//! User mistakes and missing sessions are answered in the conversation. Store and
//! catalog failures surface as [`WorkflowError`](conversation::WorkflowError) from
//! [`Dispatcher::dispatch`](conversation::Dispatcher::dispatch).
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run < events.ndjson
//! ```

pub mod clients;
pub mod conversation;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod response;
