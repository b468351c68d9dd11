//! Order sessions: one record per conversation thread about a single pickup/delivery order.
//!
//! # Actor Framework
//! [`OrderSession`] implements the [`ActorEntity`](record_actor::ActorEntity) trait,
//! allowing it to be kept by a [`ResourceActor`](record_actor::ResourceActor).
//!
//! See [`impl ActorEntity for OrderSession`](#impl-ActorEntity-for-OrderSession) for:
//! - Creation parameters ([`OrderCreate`])
//! - Mutations ([`OrderUpdate`])
//! - Query filters ([`OrderFilter`])

use crate::model::ItemName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

/// Store-assigned identity of an order session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// User-facing session token, `ord-` followed by six digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub const PREFIX: &'static str = "ord-";

    pub fn from_digits(digits: u32) -> Self {
        Self(format!("{}{:06}", Self::PREFIX, digits))
    }

    /// Accepts any token carrying the `ord-` prefix; lookups decide whether it exists.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim().to_lowercase();
        if token.len() > Self::PREFIX.len() && token.starts_with(Self::PREFIX) {
            Some(Self(token))
        } else {
            None
        }
    }

    /// True for the canonical generated shape.
    pub fn is_well_formed(&self) -> bool {
        let digits = &self.0[Self::PREFIX.len()..];
        digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Active,
    Ended,
}

impl Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SessionState::Active => "active",
            SessionState::Ended => "ended",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Pickup,
    Dropoff,
}

impl Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ServiceType::Pickup => "pickup",
            ServiceType::Dropoff => "dropoff",
        })
    }
}

/// A shared location: free text plus coordinates as the channel sent them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    pub latitude: String,
    pub longitude: String,
}

/// Quantities per catalog item. Setting an item replaces its previous quantity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemTally(HashMap<ItemName, String>);

impl ItemTally {
    pub fn set(&mut self, name: ItemName, count: impl Into<String>) {
        self.0.insert(name, count.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemName, &str)> {
        self.0.iter().map(|(k, v)| (k, v.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderSession {
    pub session_id: SessionId,
    pub user: String,
    pub state: SessionState,
    pub service_type: Option<ServiceType>,
    pub pickup_address: Option<Address>,
    pub dropoff_address: Option<Address>,
    pub pickup_date: Option<DateTime<Utc>>,
    pub dropoff_date: Option<DateTime<Utc>>,
    pub picked_up: bool,
    pub dropped_off: bool,
    pub tally: ItemTally,
}

impl OrderSession {
    /// A fresh, active session with nothing chosen yet.
    pub fn new(session_id: SessionId, user: impl Into<String>) -> Self {
        Self {
            session_id,
            user: user.into(),
            state: SessionState::Active,
            service_type: None,
            pickup_address: None,
            dropoff_address: None,
            pickup_date: None,
            dropoff_date: None,
            picked_up: false,
            dropped_off: false,
            tally: ItemTally::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }
}

/// Payload for creating a new order session.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub session_id: SessionId,
    pub user: String,
}

/// A single mutation of an order session.
#[derive(Debug, Clone)]
pub enum OrderUpdate {
    /// Close the session (`active` -> `ended`).
    End,
    /// Choose the service; only once per session.
    SetServiceType(ServiceType),
    SetPickupAddress(Address),
    /// Replace the quantity for one catalog item.
    SetItem { name: ItemName, count: String },
}

/// Selects order sessions; unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub user: Option<String>,
    pub session_id: Option<SessionId>,
    pub state: Option<SessionState>,
    pub service_type: Option<ServiceType>,
}

impl OrderFilter {
    pub fn user(user: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            ..Self::default()
        }
    }

    pub fn active(mut self) -> Self {
        self.state = Some(SessionState::Active);
        self
    }

    pub fn session(mut self, session_id: SessionId) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn service(mut self, service_type: ServiceType) -> Self {
        self.service_type = Some(service_type);
        self
    }

    pub fn matches(&self, order: &OrderSession) -> bool {
        self.user.as_ref().map_or(true, |u| *u == order.user)
            && self
                .session_id
                .as_ref()
                .map_or(true, |s| *s == order.session_id)
            && self.state.map_or(true, |s| s == order.state)
            && self
                .service_type
                .map_or(true, |t| Some(t) == order.service_type)
    }
}
