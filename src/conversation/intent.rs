//! Intent classification.
//!
//! Each inbound message resolves to exactly one [`Intent`]. The predicates in
//! [`RULES`] are tried in order and the first match wins, so the priority is fixed
//! by the table rather than by any map's iteration order.

use crate::conversation::event::{Message, REPLY_DELIMITER};
use crate::model::SessionId;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Greeting,
    Help,
    Order,
    Pickup,
    Dropoff,
    Info,
    Default,
}

impl Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Intent::Greeting => "greeting",
            Intent::Help => "help",
            Intent::Order => "order",
            Intent::Pickup => "pickup",
            Intent::Dropoff => "dropoff",
            Intent::Info => "info",
            Intent::Default => "default",
        })
    }
}

/// What the predicates see: the lowercased projection of the message, and whether
/// the sender has an active pickup session still waiting for its address.
#[derive(Debug, Clone)]
pub struct Probe {
    text: String,
    awaiting_address: bool,
}

impl Probe {
    pub fn new(text: &str, awaiting_address: bool) -> Self {
        Self {
            text: text.to_lowercase(),
            awaiting_address,
        }
    }
}

type Predicate = fn(&Probe) -> bool;

/// Classification rules, highest priority first.
pub const RULES: [(Intent, Predicate); 6] = [
    (Intent::Help, is_help),
    (Intent::Order, is_order),
    (Intent::Pickup, is_pickup),
    (Intent::Dropoff, is_dropoff),
    (Intent::Info, is_info),
    (Intent::Greeting, is_greeting),
];

const GREETINGS: [&str; 6] = [
    "hello",
    "hi",
    "good day",
    "good morning",
    "good afternoon",
    "good evening",
];

fn is_help(probe: &Probe) -> bool {
    probe.text.starts_with("/help")
        || probe.text.contains("help")
        || probe.text.contains("can you do")
}

fn is_order(probe: &Probe) -> bool {
    probe.text.contains("order") || probe.awaiting_address
}

fn has_reply_prefix(probe: &Probe, service: &str) -> bool {
    let prefix = format!("{service}{REPLY_DELIMITER}{}", SessionId::PREFIX);
    probe.text.starts_with(&prefix)
}

fn is_pickup(probe: &Probe) -> bool {
    has_reply_prefix(probe, "p")
}

fn is_dropoff(probe: &Probe) -> bool {
    has_reply_prefix(probe, "d")
}

fn is_info(probe: &Probe) -> bool {
    let text = &probe.text;
    text.starts_with("/info")
        || text.starts_with("info")
        || ["pricing", "price", "list", "about"]
            .iter()
            .any(|token| text.contains(token))
}

fn is_greeting(probe: &Probe) -> bool {
    GREETINGS.iter().any(|token| probe.text.contains(token))
}

/// Whether classifying `message` depends on the sender's pending pickup session.
///
/// Only typed text and location shares continue an order implicitly; replies to
/// buttons and lists carry their own routing prefix.
pub fn consults_pending_pickup(message: &Message) -> bool {
    matches!(message, Message::Text(_) | Message::LocationShare(_))
}

/// Resolves `message` to an intent. `awaiting_address` is true when the sender's
/// newest active session is a pickup order.
pub fn classify(message: &Message, awaiting_address: bool) -> Intent {
    let awaiting_address = awaiting_address && consults_pending_pickup(message);
    let probe = Probe::new(&message.classification_text(), awaiting_address);

    match message {
        Message::ImageCaption(_) | Message::Unsupported => Intent::Default,
        Message::LocationShare(_) if is_order(&probe) => Intent::Order,
        Message::LocationShare(_) => Intent::Default,
        _ => RULES
            .iter()
            .find(|(_, predicate)| predicate(&probe))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Default),
    }
}
