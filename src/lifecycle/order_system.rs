use crate::clients::OrderClient;
use crate::conversation::{Dispatcher, OrderWorkflow};
use crate::lifecycle::{BotConfig, ConfigError};
use crate::order_actor::OrderContext;
use std::sync::Arc;
use tracing::{error, info};

/// The running bot: the order actor plus the dispatcher that talks to it.
///
/// # Example
///
/// ```rust
/// use order_bot::conversation::InboundEvent;
/// use order_bot::lifecycle::{BotConfig, OrderSystem};
///
/// #[tokio::main]
/// async fn main() {
///     let system = OrderSystem::new(BotConfig::default()).unwrap();
///
///     let event = InboundEvent::text("2348000000000", "hello");
///     let handled = system.dispatcher.dispatch(&event, "Ada").await.unwrap();
///     assert!(handled.reply.body_text().contains("Hello Ada!"));
///
///     system.shutdown().await.unwrap();
/// }
/// ```
pub struct OrderSystem {
    pub dispatcher: Dispatcher<OrderClient>,

    /// Direct access to the store, for inspection.
    pub order_client: OrderClient,

    handle: tokio::task::JoinHandle<()>,
}

impl OrderSystem {
    /// Validates the catalog and spawns the order actor with it as context.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: BotConfig) -> Result<Self, ConfigError> {
        let catalog = Arc::new(config.pricing_catalog()?);

        let (order_actor, order_client) = crate::order_actor::new(config.channel_buffer);
        let handle = tokio::spawn(order_actor.run(OrderContext::new(catalog.clone())));

        let workflow = OrderWorkflow::new(
            order_client.clone(),
            catalog,
            config.workflow_settings(),
        );
        info!(
            items = config.catalog.len(),
            offer_dropoff = config.offer_dropoff,
            "Order system started"
        );

        Ok(Self {
            dispatcher: Dispatcher::new(workflow),
            order_client,
            handle,
        })
    }

    /// Drops every client so the actor's channel closes, then waits for it to exit.
    ///
    /// Clones of the dispatcher or client held elsewhere keep the actor alive until
    /// they are dropped too.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        drop(self.dispatcher);
        drop(self.order_client);

        if let Err(e) = self.handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(format!("Actor task failed: {:?}", e));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
