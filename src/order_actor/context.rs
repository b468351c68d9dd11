//! Runtime context handed to the order actor's hooks.

use crate::model::{PricingCatalog, SessionId};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// The shared catalog, plus every session id the store has ever accepted.
///
/// Ids stay claimed after their session is deleted, so a cancelled session's id is
/// never handed to someone else.
pub struct OrderContext {
    pub catalog: Arc<PricingCatalog>,
    issued: Mutex<HashSet<SessionId>>,
}

impl OrderContext {
    pub fn new(catalog: Arc<PricingCatalog>) -> Self {
        Self {
            catalog,
            issued: Mutex::new(HashSet::new()),
        }
    }

    /// Records `session_id` as issued. False if it was already taken.
    pub async fn claim(&self, session_id: &SessionId) -> bool {
        self.issued.lock().await.insert(session_id.clone())
    }

    pub async fn is_issued(&self, session_id: &SessionId) -> bool {
        self.issued.lock().await.contains(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_claimed_once() {
        let context = OrderContext::new(Arc::new(PricingCatalog::laundry()));
        let id = SessionId::from_digits(424242);

        assert!(!context.is_issued(&id).await);
        assert!(context.claim(&id).await);
        assert!(!context.claim(&id).await);
        assert!(context.is_issued(&id).await);
    }
}
