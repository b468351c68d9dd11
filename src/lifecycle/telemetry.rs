//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing` subscriber filtered by `RUST_LOG`.
//!
//! ```bash
//! RUST_LOG=info order-bot < events.ndjson    # one line per step
//! RUST_LOG=debug order-bot < events.ndjson   # plus request payloads and updates
//! ```
//!
//! With `info`, handling a pickup reply reads roughly:
//!
//! ```text
//! INFO dispatch: Classified intent=pickup awaiting_address=false
//! INFO Updated entity_type="OrderSession" id=order_1
//! INFO dispatch:handle: Pickup service selected session_id=ord-482913
//! ```
//!
//! Spans carry `user` and `intent`, so one conversation can be followed by filtering
//! on the sender. The order actor runs in its own task, so its lines carry no span.

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
