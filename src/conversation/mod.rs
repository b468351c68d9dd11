//! # Conversation
//!
//! From an inbound chat event to a reply:
//!
//! 1. [`event`] normalizes the channel's JSON into a [`Message`](event::Message)
//! 2. [`intent`] classifies it with an ordered rule table
//! 3. [`workflow`] runs the intent's handler against the order store, using
//!    [`grammar`] for add-item instructions
//! 4. [`dispatch`] ties the steps together for one event

pub mod dispatch;
pub mod event;
pub mod grammar;
pub mod intent;
pub mod workflow;

pub use dispatch::*;
pub use event::{Envelope, InboundEvent, Message};
pub use intent::Intent;
pub use workflow::{OrderWorkflow, WorkflowError, WorkflowSettings};
