//! # Generic Messages
//!
//! Requests sent from a `ResourceClient` to its `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::query::{Query, Stored};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The variants are the store contract: create a record, read one by identity,
/// select many by filter, apply an update, delete. Each is generic over
/// `T: ActorEntity`, so a payload meant for one record type can't reach another's actor.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<Stored<T>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<Stored<T>>>,
    },
    Query {
        query: Query<T>,
        respond_to: Response<Vec<Stored<T>>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<Stored<T>>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}
