//! # Order workflow
//!
//! Per-intent business logic. The handler holds no conversation state of its own:
//! everything it knows about an order is read from the [`OrderStore`] at the start of
//! a step and written back as explicit [`OrderUpdate`]s.
//!
//! Missing sessions and malformed commands become ordinary replies. Store and catalog
//! failures are returned as [`WorkflowError`] for the caller to report.

use crate::clients::{OrderRecord, OrderStore};
use crate::conversation::event::{InboundEvent, LocationShare, Message, REPLY_DELIMITER};
use crate::conversation::grammar::{parse_add_items, ADD_ITEMS_USAGE};
use crate::conversation::intent::Intent;
use crate::model::{
    Address, CatalogError, ItemName, OrderCreate, OrderFilter, OrderUpdate, PricingCatalog,
    ServiceType, SessionId,
};
use crate::order_actor::OrderError;
use crate::response::{self, Reply, ReplyButton};
use rand::Rng;
use record_actor::{Query, Sort};
use rust_decimal::Decimal;
use std::fmt::Write;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

const SESSION_ID_ATTEMPTS: usize = 8;

const GENERAL_HELP: &str = "Here are some things I can help with: ...
- `/help` - show the help message
- `/order` - Manage an order (create, update, end session)
- `/orders` - View orders
- `/info` - Show information about our services

Type  `/help <command>` for more information about a command
Eg. `/help order` to view more information about the order command";

const ORDER_HELP: &str = "You can create, update, and end an order using the `/order` command.
- `/order` - Create a new order session
- `/orders` - View all your orders
- `/order current` - View current order
- `/order <order_id>` - View a specific order
- `/order cancel` - End current order session and delete
- `/order end` - End current order session and submit
- `/order address` - Update order pickup address
- `/order add item-[itemId], count-[count]; item-[itemId], count-[count]; ...` - Update a property of an order
    Eg. order add item-2, count-2; item-3, count-4
    Use the `;` semicolon to add multiple items";

const ORDER_USAGE: &str = "Use the following format to make an order
`/order`
Use `/help order` to find out how to use other commands";

const NOT_UNDERSTOOD: &str = "Sorry, I didn't understand that.
Can you please rephrase?
Use `/help` to view my options.";

const PICKUP_SCHEDULED: &str =
    "Your pickup order has been scheduled. A delivery date will be communicated to you. Thank you.";

const DROPOFF_UNAVAILABLE: &str = "Service Not available";

const NO_ACTIVE_ORDER: &str = "No active order found.";

const NO_ORDER_TO_SHOW: &str = "No active order found.
Please create a new order
Use the command `/order` to create it.";

/// Failures the workflow does not turn into a reply.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Store(#[from] OrderError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("no free session id after {0} attempts")]
    SessionIdsExhausted(usize),
}

/// Tunables for replies.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowSettings {
    /// Maximum sessions shown by `/orders`.
    pub listing_limit: usize,
    /// Offer the "Dropoff Service" button when an order is created.
    pub offer_dropoff: bool,
    pub currency_symbol: String,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            listing_limit: 20,
            offer_dropoff: false,
            currency_symbol: "#".to_string(),
        }
    }
}

/// Shape of an `/order` command once tokenized.
#[derive(Debug, Clone, PartialEq)]
enum Command<'a> {
    /// `/order` or `/orders` on its own.
    Single(&'a str),
    /// `/order <keyword>`, or a reply whose title has two words (keyword = reply id).
    Lookup(&'a str),
    /// `/order <instruction> <rest...>`.
    Instruction { verb: &'a str, rest: String },
}

impl<'a> Command<'a> {
    fn from_message(message: &'a Message) -> Option<Self> {
        match message {
            Message::Text(body) => {
                let tokens: Vec<&str> = body.split_whitespace().collect();
                match tokens.as_slice() {
                    [] => None,
                    [single] => Some(Command::Single(*single)),
                    [_, keyword] => Some(Command::Lookup(*keyword)),
                    [_, verb, rest @ ..] => Some(Command::Instruction {
                        verb: *verb,
                        rest: rest.join(" "),
                    }),
                }
            }
            Message::ButtonReply { id, title } if title.split_whitespace().count() == 2 => {
                id.split_whitespace().next().map(Command::Lookup)
            }
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct OrderWorkflow<S: OrderStore> {
    store: S,
    catalog: Arc<PricingCatalog>,
    settings: WorkflowSettings,
}

impl<S: OrderStore> OrderWorkflow<S> {
    pub fn new(store: S, catalog: Arc<PricingCatalog>, settings: WorkflowSettings) -> Self {
        Self {
            store,
            catalog,
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The sender's newest active pickup session, if any. Such a session is waiting for
    /// its address, and any text or location from the sender continues the order.
    pub async fn pending_pickup(&self, user: &str) -> Result<Option<OrderRecord>, WorkflowError> {
        let filter = OrderFilter::user(user).active().service(ServiceType::Pickup);
        Ok(self.store.newest(filter).await?)
    }

    /// Runs the handler for `intent`.
    ///
    /// `pending` is the result of [`Self::pending_pickup`] when the caller already
    /// looked it up for classification.
    #[instrument(skip_all, fields(user = %event.from, %intent))]
    pub async fn handle(
        &self,
        intent: Intent,
        event: &InboundEvent,
        display_name: &str,
        pending: Option<OrderRecord>,
    ) -> Result<Reply, WorkflowError> {
        let to = event.from.as_str();
        match intent {
            Intent::Greeting => Ok(greeting(to, display_name)),
            Intent::Help => Ok(help(to, &event.message)),
            Intent::Info => Ok(self.info(to)),
            Intent::Order => self.order(event, pending).await,
            Intent::Pickup => self.pickup(event).await,
            Intent::Dropoff | Intent::Default => Ok(fallback(intent, to)),
        }
    }

    fn info(&self, to: &str) -> Reply {
        let mut body = String::from(
            "Welcome to our services. We offer:\n- Pick up services\n- Delivery services\n\nHere is our pricing information\n",
        );
        for (id, item) in self.catalog.iter() {
            let _ = writeln!(body, "- {}. {}: {:.2}", id, item.name, item.price);
        }
        response::text(to, body)
    }

    // =========================================================================
    // ORDER
    // =========================================================================

    async fn order(
        &self,
        event: &InboundEvent,
        pending: Option<OrderRecord>,
    ) -> Result<Reply, WorkflowError> {
        let to = event.from.as_str();

        if let (Message::LocationShare(location), Some(order)) = (&event.message, pending) {
            return self.set_pickup_address(to, order, location).await;
        }

        match Command::from_message(&event.message) {
            Some(Command::Single(token)) => match token.to_lowercase().as_str() {
                "order" | "/order" => self.open_session(to).await,
                "orders" | "/orders" => self.list_sessions(to).await,
                _ => Ok(fallback(Intent::Order, to)),
            },
            Some(Command::Lookup(keyword)) => self.lookup(to, keyword).await,
            Some(Command::Instruction { verb, rest }) if verb.eq_ignore_ascii_case("add") => {
                self.add_items(to, &rest).await
            }
            _ => Ok(fallback(Intent::Order, to)),
        }
    }

    async fn set_pickup_address(
        &self,
        to: &str,
        order: OrderRecord,
        location: &LocationShare,
    ) -> Result<Reply, WorkflowError> {
        let address = Address {
            address: location.address.clone().unwrap_or_default(),
            latitude: location.latitude.clone(),
            longitude: location.longitude.clone(),
        };
        let order = self
            .store
            .save(order.id, OrderUpdate::SetPickupAddress(address))
            .await?;
        let session_id = &order.value.session_id;
        info!(%session_id, "Pickup address set");

        let body = format!(
            "Your latest order has been updated with the pickup address: {}
Update your order details using
- `/order add item-[itemId], count-[count]; item-[itemId], count-[count]; ...`

  Eg. `/order add item-2, count-2; item-3, count-4`
    Use the `;` semicolon to add multiple items",
            location.address.as_deref().unwrap_or_default()
        );
        Ok(response::buttons(
            to,
            body,
            vec![
                ReplyButton::new(format!("button-{}", six_digits()), "Pricing"),
                ReplyButton::new(session_id.as_str(), "Order Details"),
            ],
        ))
    }

    /// Reuses the user's newest active session, or opens a new one.
    async fn open_session(&self, to: &str) -> Result<Reply, WorkflowError> {
        let order = match self.store.latest_active(to).await? {
            Some(order) => {
                debug!(session_id = %order.value.session_id, "Reusing active session");
                order
            }
            None => self.create_session(to).await?,
        };
        let session_id = &order.value.session_id;
        info!(%session_id, "Order session open");

        let mut options = vec![ReplyButton::new(
            format!("p{REPLY_DELIMITER}{session_id}"),
            "Pickup Service",
        )];
        if self.settings.offer_dropoff {
            options.push(ReplyButton::new(
                format!("d{REPLY_DELIMITER}{session_id}"),
                "Dropoff Service",
            ));
        }

        let body = format!(
            "Order session created.
Use the command `/order {session_id}` to access it.
Would you like the pickup service or the dropoff service?"
        );
        Ok(response::buttons(to, body, options))
    }

    /// Creates a session under a fresh random id. The store refuses any id it has
    /// issued before, deleted sessions included, so a refusal just means drawing again.
    async fn create_session(&self, to: &str) -> Result<OrderRecord, WorkflowError> {
        for _ in 0..SESSION_ID_ATTEMPTS {
            let session_id = SessionId::from_digits(six_digits());
            let created = self
                .store
                .create(OrderCreate {
                    session_id,
                    user: to.to_string(),
                })
                .await;
            match created {
                Err(OrderError::DuplicateSessionId(taken)) => {
                    warn!(session_id = %taken, "Session id collision, retrying")
                }
                other => return Ok(other?),
            }
        }
        Err(WorkflowError::SessionIdsExhausted(SESSION_ID_ATTEMPTS))
    }

    async fn list_sessions(&self, to: &str) -> Result<Reply, WorkflowError> {
        let query = Query::new(OrderFilter::user(to))
            .sorted(Sort::newest_updated())
            .limit(self.settings.listing_limit);
        let orders = self.store.find_many(query).await?;
        if orders.is_empty() {
            return Ok(response::text(to, "No active orders found."));
        }

        let mut body = format!("Here are your most recent {} orders:\n", orders.len());
        for order in &orders {
            let _ = writeln!(body, "- {} ({})", order.value.session_id, order.value.state);
        }
        Ok(response::text(to, body))
    }

    /// `/order <keyword>`: end, cancel, address, or show a session.
    async fn lookup(&self, to: &str, keyword: &str) -> Result<Reply, WorkflowError> {
        let found = match keyword.to_lowercase().as_str() {
            "end" | "complete" => return self.end_session(to).await,
            "cancel" | "delete" => return self.cancel_session(to).await,
            "address" => {
                return Ok(response::location_request(
                    to,
                    "Please provide the pick up address for your laundry order.",
                ))
            }
            "current" => self.store.latest_active(to).await?,
            _ => match SessionId::parse(keyword) {
                Some(session_id) => {
                    self.store
                        .find_one(OrderFilter::user(to).session(session_id))
                        .await?
                }
                None => return Ok(fallback(Intent::Order, to)),
            },
        };

        match found {
            Some(order) => Ok(response::text(to, self.render_summary(&order))),
            None => Ok(response::text(to, NO_ORDER_TO_SHOW)),
        }
    }

    async fn end_session(&self, to: &str) -> Result<Reply, WorkflowError> {
        let Some(order) = self.store.latest_active(to).await? else {
            return Ok(response::text(to, NO_ACTIVE_ORDER));
        };
        // A concurrent end or cancel may have got there first.
        let order = match self.store.save(order.id, OrderUpdate::End).await {
            Err(OrderError::SessionEnded(_) | OrderError::NotFound(_)) => {
                debug!(session_id = %order.value.session_id, "Session closed concurrently");
                return Ok(response::text(to, NO_ACTIVE_ORDER));
            }
            saved => saved?,
        };
        info!(session_id = %order.value.session_id, "Order session ended");

        Ok(response::buttons(
            to,
            "Your Order session has ended and been submitted.",
            vec![ReplyButton::new(
                order.value.session_id.as_str(),
                "Order Details",
            )],
        ))
    }

    async fn cancel_session(&self, to: &str) -> Result<Reply, WorkflowError> {
        let Some(order) = self.store.latest_active(to).await? else {
            return Ok(response::text(to, NO_ACTIVE_ORDER));
        };
        match self.store.delete(order.id).await {
            Err(OrderError::NotFound(_)) => {
                debug!(session_id = %order.value.session_id, "Session deleted concurrently");
                return Ok(response::text(to, NO_ACTIVE_ORDER));
            }
            deleted => deleted?,
        }
        info!(session_id = %order.value.session_id, "Order session cancelled");
        Ok(response::text(to, "Your Order has been cancelled."))
    }

    /// `/order add item-<id>, count-<n>; ...`
    ///
    /// Every item id is resolved before anything is written, so an unknown id leaves
    /// the tally untouched.
    async fn add_items(&self, to: &str, instruction: &str) -> Result<Reply, WorkflowError> {
        let requests = match parse_add_items(instruction) {
            Ok(requests) => requests,
            Err(e) => {
                debug!(error = %e, "Add instruction rejected");
                return Ok(response::text(to, ADD_ITEMS_USAGE));
            }
        };

        let Some(order) = self.store.latest_active(to).await? else {
            return Ok(response::text(to, NO_ACTIVE_ORDER));
        };

        let updates = requests
            .into_iter()
            .map(|request| -> Result<(ItemName, String), CatalogError> {
                let item = self.catalog.item(&request.item_id)?;
                Ok((item.name.clone(), request.count))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (name, count) in updates {
            self.store
                .save(order.id, OrderUpdate::SetItem { name, count })
                .await?;
        }
        let session_id = &order.value.session_id;
        info!(%session_id, "Order details updated");

        Ok(response::buttons(
            to,
            format!("Order details updated for session {session_id}."),
            vec![ReplyButton::new(session_id.as_str(), "Order Details")],
        ))
    }

    /// Human-readable summary of one session, items listed in catalog order.
    pub fn render_summary(&self, order: &OrderRecord) -> String {
        let session = &order.value;
        let currency = &self.settings.currency_symbol;
        let mut out = String::from("Here's your order\n");

        let _ = writeln!(out, "\nSession ID: {} *({})*", session.session_id, session.state);
        let _ = writeln!(
            out,
            "Created on: {}",
            order.created_at.format("%H:%M:%S, %a %b %d %Y")
        );
        out.push_str("\nOrder details:\n");

        if session.tally.is_empty() {
            out.push_str("\n*=====No Details=====*\n");
        } else {
            let mut total = Decimal::ZERO;
            for (_, item) in self.catalog.iter() {
                let Some(count) = session.tally.get(item.name.as_str()) else {
                    continue;
                };
                let _ = writeln!(
                    out,
                    "- {}  x{} @  {}{:.2} a piece",
                    item.name, count, currency, item.price
                );
                let subtotal = item.price.saturating_mul(Decimal::from(leading_quantity(count)));
                total = total.saturating_add(subtotal);
            }
            let _ = writeln!(out, "\n*Total: {}{:.2}*", currency, total);
        }
        out.push_str("\n*===================*\n");

        if let Some(service) = session.service_type {
            let _ = writeln!(out, "type: {service}");
        }
        if let Some(date) = session.pickup_date {
            let _ = writeln!(out, "pickupDate: {}", date.to_rfc2822());
        }
        if let Some(date) = session.dropoff_date {
            let _ = writeln!(out, "dropoffDate: {}", date.to_rfc2822());
        }
        for address in [&session.pickup_address, &session.dropoff_address]
            .into_iter()
            .flatten()
        {
            let _ = writeln!(out, "Address: {}", address.address);
        }
        out
    }

    // =========================================================================
    // PICKUP
    // =========================================================================

    /// Handles the "Pickup Service" reply, whose id is `p-*-<session id>`.
    async fn pickup(&self, event: &InboundEvent) -> Result<Reply, WorkflowError> {
        let to = event.from.as_str();
        let Some((id, title)) = event.message.reply() else {
            return Ok(fallback(Intent::Pickup, to));
        };
        if !title.to_lowercase().starts_with("pickup") {
            return Ok(fallback(Intent::Pickup, to));
        }

        let raw_session = id
            .split_once(REPLY_DELIMITER)
            .map(|(_, rest)| rest)
            .unwrap_or_default();
        let not_found = || response::text(to, format!("No active order with id {raw_session} found."));
        let Some(session_id) = SessionId::parse(raw_session) else {
            return Ok(not_found());
        };

        let filter = OrderFilter::user(to).active().session(session_id.clone());
        let Some(order) = self.store.find_one(filter).await? else {
            return Ok(not_found());
        };

        if let Some(existing) = order.value.service_type {
            if existing != ServiceType::Pickup {
                return Ok(response::text(
                    to,
                    format!("Order {session_id} is already set up for {existing}."),
                ));
            }
        }

        self.store
            .save(order.id, OrderUpdate::SetServiceType(ServiceType::Pickup))
            .await?;
        info!(%session_id, "Pickup service selected");

        Ok(response::location_request(
            to,
            format!("Please provide the pick up address for your laundry order {session_id}."),
        ))
    }
}

// =============================================================================
// STATIC REPLIES
// =============================================================================

fn greeting(to: &str, display_name: &str) -> Reply {
    response::text(
        to,
        format!(
            "Hello {display_name}!\nHow can I assist you today?\nUse the `/help` command to view my options"
        ),
    )
}

fn help(to: &str, message: &Message) -> Reply {
    let topic = match message {
        Message::Text(body) => body.split_whitespace().nth(1),
        _ => None,
    };
    match topic {
        Some(topic) if topic.eq_ignore_ascii_case("order") => response::text(to, ORDER_HELP),
        _ => response::text(to, GENERAL_HELP),
    }
}

/// The reply an intent gives when its handler has nothing more specific to say.
pub fn fallback(intent: Intent, to: &str) -> Reply {
    let body = match intent {
        Intent::Help => GENERAL_HELP,
        Intent::Order => ORDER_USAGE,
        Intent::Pickup => PICKUP_SCHEDULED,
        Intent::Dropoff => DROPOFF_UNAVAILABLE,
        Intent::Greeting | Intent::Info | Intent::Default => NOT_UNDERSTOOD,
    };
    response::text(to, body)
}

/// A random number in `100000..=999999`.
fn six_digits() -> u32 {
    rand::thread_rng().gen_range(100_000..=999_999)
}

/// Leading decimal digits of a quantity; anything else counts as zero. Quantities past
/// `u64::MAX` saturate.
fn leading_quantity(count: &str) -> u64 {
    let digits: String = count
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}
