//! Error types for the order session actor.

use thiserror::Error;

/// Errors that can occur during order session operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order session was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The write would break a session invariant.
    #[error("Order validation error: {0}")]
    ValidationError(String),

    /// The session was already ended.
    #[error("Order session already ended: {0}")]
    SessionEnded(String),

    /// The session id was issued before, possibly to a session since deleted.
    #[error("Session id already issued: {0}")]
    DuplicateSessionId(String),

    /// The tally write names an item the catalog does not have.
    #[error("Unknown catalog item: {0}")]
    UnknownItem(String),

    /// An error occurred while communicating with the actor.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}
