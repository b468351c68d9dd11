//! # Order Client
//!
//! High-level API over a `ResourceClient<OrderSession>`.
use crate::clients::{OrderRecord, OrderStore};
use crate::model::{OrderCreate, OrderFilter, OrderId, OrderSession, OrderUpdate};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use record_actor::{ActorClient, FrameworkError, Query, ResourceClient};
use tracing::{debug, info, instrument};

/// Client for interacting with the order session actor.
///
/// Invariant checks (valid session id, single service type, catalog items) happen in
/// the entity's hooks inside the actor, not here.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<OrderSession>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<OrderSession>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<OrderSession> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<OrderSession> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::EntityError(source) => match source.downcast::<OrderError>() {
                Ok(order_error) => *order_error,
                Err(other) => OrderError::ActorCommunicationError(other.to_string()),
            },
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[async_trait]
impl OrderStore for OrderClient {
    #[instrument(skip(self, params), fields(session_id = %params.session_id))]
    async fn create(&self, params: OrderCreate) -> Result<OrderRecord, OrderError> {
        debug!(?params, "create called");
        info!("Sending create to actor");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    async fn find_many(&self, query: Query<OrderSession>) -> Result<Vec<OrderRecord>, OrderError> {
        self.find(query).await
    }

    #[instrument(skip(self))]
    async fn find_one(&self, filter: OrderFilter) -> Result<Option<OrderRecord>, OrderError> {
        debug!("Sending request");
        self.inner.find_one(filter).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    async fn save(&self, id: OrderId, update: OrderUpdate) -> Result<OrderRecord, OrderError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    async fn delete(&self, id: OrderId) -> Result<(), OrderError> {
        self.remove(id).await
    }
}
