use crate::model::{OrderCreate, OrderFilter, OrderId, OrderSession, OrderUpdate};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use record_actor::{Query, Sort, Stored};

/// An order session together with its store identity and timestamps.
pub type OrderRecord = Stored<OrderSession>;

/// Keyed record store for order sessions.
///
/// Every call is atomic on its own. Callers that read, decide and write in separate
/// calls accept that a concurrent writer may land in between.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create(&self, params: OrderCreate) -> Result<OrderRecord, OrderError>;

    async fn find_many(&self, query: Query<OrderSession>) -> Result<Vec<OrderRecord>, OrderError>;

    /// First match in creation order.
    async fn find_one(&self, filter: OrderFilter) -> Result<Option<OrderRecord>, OrderError>;

    /// Applies one mutation and bumps `updated_at`.
    async fn save(&self, id: OrderId, update: OrderUpdate) -> Result<OrderRecord, OrderError>;

    async fn delete(&self, id: OrderId) -> Result<(), OrderError>;

    /// The user's most recently created session matching `filter`.
    async fn newest(&self, filter: OrderFilter) -> Result<Option<OrderRecord>, OrderError> {
        let mut hits = self
            .find_many(Query::new(filter).sorted(Sort::newest_created()).limit(1))
            .await?;
        Ok(hits.pop())
    }

    async fn latest_active(&self, user: &str) -> Result<Option<OrderRecord>, OrderError> {
        self.newest(OrderFilter::user(user).active()).await
    }
}
