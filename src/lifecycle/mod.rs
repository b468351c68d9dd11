//! # System Lifecycle
//!
//! Wiring and process-level concerns:
//!
//! - [`BotConfig`] - defaults, TOML file, environment overrides
//! - [`OrderSystem`] - spawns the order actor with the pricing catalog injected as
//!   its context, and builds the [`Dispatcher`](crate::conversation::Dispatcher)
//! - [`setup_tracing`] - the `tracing` subscriber, installed once by the binary
//!
//! ## Shutdown
//!
//! The actor exits when the last client is dropped: `receiver.recv()` returns `None`,
//! it logs its final size and the task ends. [`OrderSystem::shutdown`] drops its own
//! clients and awaits that task.

pub mod config;
pub mod order_system;
pub mod telemetry;

pub use config::*;
pub use order_system::*;
pub use telemetry::*;
