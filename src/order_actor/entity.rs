//! [`ActorEntity`] implementation for [`OrderSession`].
//!
//! The actor's context is an [`OrderContext`]: tally writes are checked against its
//! catalog, and new sessions must carry a session id it has never issued.

use crate::model::{OrderCreate, OrderFilter, OrderId, OrderSession, OrderUpdate, SessionState};
use crate::order_actor::{OrderContext, OrderError};
use async_trait::async_trait;
use record_actor::ActorEntity;
use tracing::debug;

#[async_trait]
impl ActorEntity for OrderSession {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Filter = OrderFilter;
    type Context = OrderContext;
    type Error = OrderError;

    fn from_create_params(_id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        Ok(Self::new(params.session_id, params.user))
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        filter.matches(self)
    }

    /// Rejects sessions without a user, with a malformed session id, or reusing an id
    /// that was issued before.
    async fn on_create(&mut self, context: &OrderContext) -> Result<(), Self::Error> {
        if self.user.trim().is_empty() {
            return Err(OrderError::ValidationError("user must not be empty".into()));
        }
        if !self.session_id.is_well_formed() {
            return Err(OrderError::ValidationError(format!(
                "malformed session id {}",
                self.session_id
            )));
        }
        if !context.claim(&self.session_id).await {
            return Err(OrderError::DuplicateSessionId(self.session_id.to_string()));
        }
        Ok(())
    }

    async fn on_update(
        &mut self,
        update: OrderUpdate,
        context: &OrderContext,
    ) -> Result<(), Self::Error> {
        debug!(session_id = %self.session_id, ?update, "Applying update");
        match update {
            OrderUpdate::End => {
                if self.state == SessionState::Ended {
                    return Err(OrderError::SessionEnded(self.session_id.to_string()));
                }
                self.state = SessionState::Ended;
            }
            OrderUpdate::SetServiceType(service) => match self.service_type {
                Some(current) if current != service => {
                    return Err(OrderError::ValidationError(format!(
                        "session {} is already a {} order",
                        self.session_id, current
                    )));
                }
                _ => self.service_type = Some(service),
            },
            OrderUpdate::SetPickupAddress(address) => self.pickup_address = Some(address),
            OrderUpdate::SetItem { name, count } => {
                if !context.catalog.contains(&name) {
                    return Err(OrderError::UnknownItem(name.to_string()));
                }
                self.tally.set(name, count);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CatalogEntry, PricingCatalog, ServiceType, SessionId};
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn session() -> OrderSession {
        OrderSession::new(SessionId::from_digits(123456), "2348000000000")
    }

    fn laundry() -> OrderContext {
        OrderContext::new(Arc::new(PricingCatalog::laundry()))
    }

    #[tokio::test]
    async fn test_end_only_once() {
        let context = laundry();
        let mut order = session();
        order.on_update(OrderUpdate::End, &context).await.unwrap();
        assert_eq!(order.state, SessionState::Ended);

        let again = order.on_update(OrderUpdate::End, &context).await;
        assert_eq!(again, Err(OrderError::SessionEnded("ord-123456".into())));
    }

    #[tokio::test]
    async fn test_service_type_is_set_once() {
        let context = laundry();
        let mut order = session();
        order
            .on_update(OrderUpdate::SetServiceType(ServiceType::Pickup), &context)
            .await
            .unwrap();
        // Repeating the same choice is harmless.
        order
            .on_update(OrderUpdate::SetServiceType(ServiceType::Pickup), &context)
            .await
            .unwrap();

        let switched = order
            .on_update(OrderUpdate::SetServiceType(ServiceType::Dropoff), &context)
            .await;
        assert!(matches!(switched, Err(OrderError::ValidationError(_))));
        assert_eq!(order.service_type, Some(ServiceType::Pickup));
    }

    #[tokio::test]
    async fn test_items_from_another_catalog_are_rejected() {
        let context = laundry();
        let other = PricingCatalog::new(vec![CatalogEntry::new("Rug", Decimal::TEN)]).unwrap();
        let rug = other.item("1").unwrap().name.clone();

        let mut order = session();
        let result = order
            .on_update(
                OrderUpdate::SetItem {
                    name: rug,
                    count: "1".into(),
                },
                &context,
            )
            .await;
        assert_eq!(result, Err(OrderError::UnknownItem("Rug".into())));
        assert!(order.tally.is_empty());
    }

    #[tokio::test]
    async fn test_rejects_malformed_session_id() {
        let context = laundry();
        let mut order = OrderSession::new(SessionId::parse("ord-abc").unwrap(), "2348000000000");
        assert!(order.on_create(&context).await.is_err());

        let mut anonymous = OrderSession::new(SessionId::from_digits(1), " ");
        assert!(anonymous.on_create(&context).await.is_err());
        // Rejected sessions do not use up their id.
        assert!(!context.is_issued(&SessionId::from_digits(1)).await);
    }

    #[test]
    fn test_logged_entity_type() {
        assert_eq!(record_actor::actor::entity_type::<OrderSession>(), "OrderSession");
    }

    #[tokio::test]
    async fn test_session_id_issued_once() {
        let context = laundry();
        session().on_create(&context).await.unwrap();

        let result = session().on_create(&context).await;
        assert_eq!(
            result,
            Err(OrderError::DuplicateSessionId("ord-123456".into()))
        );
    }
}
