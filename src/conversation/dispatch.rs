use crate::clients::OrderStore;
use crate::conversation::event::InboundEvent;
use crate::conversation::intent::{classify, consults_pending_pickup, Intent};
use crate::conversation::workflow::{OrderWorkflow, WorkflowError};
use crate::response::Reply;
use tracing::{info, instrument};

/// Outcome of handling one inbound event.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub intent: Intent,
    pub reply: Reply,
}

/// Entry point for inbound events: classify, then hand off to the workflow.
#[derive(Clone)]
pub struct Dispatcher<S: OrderStore> {
    workflow: OrderWorkflow<S>,
}

impl<S: OrderStore> Dispatcher<S> {
    pub fn new(workflow: OrderWorkflow<S>) -> Self {
        Self { workflow }
    }

    pub fn workflow(&self) -> &OrderWorkflow<S> {
        &self.workflow
    }

    /// Handles one event. The reply is always addressed to `event.from`.
    ///
    /// The sender's pending pickup session is looked up at most once and shared by
    /// classification and handling.
    #[instrument(skip_all, fields(user = %event.from))]
    pub async fn dispatch(
        &self,
        event: &InboundEvent,
        display_name: &str,
    ) -> Result<Dispatched, WorkflowError> {
        let pending = if consults_pending_pickup(&event.message) {
            self.workflow.pending_pickup(&event.from).await?
        } else {
            None
        };

        let intent = classify(&event.message, pending.is_some());
        info!(%intent, awaiting_address = pending.is_some(), "Classified");

        let reply = self
            .workflow
            .handle(intent, event, display_name, pending)
            .await?;
        Ok(Dispatched { intent, reply })
    }
}
