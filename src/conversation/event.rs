//! Inbound chat events.
//!
//! The channel delivers JSON envelopes (`contacts` + `messages`). They deserialize into
//! the wire structs below and are then normalized into [`InboundEvent`], whose
//! [`Message`] is the only shape the classifier and workflow look at.

use serde::Deserialize;

/// Separator used inside reply ids and in the projected text of interactive replies.
///
/// Chosen so it does not occur in anything a user would type.
pub const REPLY_DELIMITER: &str = "-*-";

// =============================================================================
// WIRE FORMAT
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub wa_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub from: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(flatten)]
    pub body: WireBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WireBody {
    Text { text: TextPayload },
    Image { image: ImagePayload },
    Location { location: LocationPayload },
    Interactive { interactive: InteractivePayload },
    /// Audio, video, stickers, reactions and anything newer.
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextPayload {
    pub body: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagePayload {
    #[serde(default)]
    pub caption: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationPayload {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub latitude: Coordinate,
    pub longitude: Coordinate,
}

/// Coordinates arrive as numbers from the channel and as strings from older clients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    fn into_text(self) -> String {
        match self {
            Coordinate::Number(n) => n.to_string(),
            Coordinate::Text(s) => s,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractivePayload {
    ButtonReply { button_reply: ButtonReplyPayload },
    ListReply { list_reply: ListReplyPayload },
    NfmReply { nfm_reply: FormReplyPayload },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ButtonReplyPayload {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListReplyPayload {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormReplyPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub body: String,
}

// =============================================================================
// NORMALIZED EVENT
// =============================================================================

/// A shared location as the channel reported it.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationShare {
    pub address: Option<String>,
    pub name: Option<String>,
    pub latitude: String,
    pub longitude: String,
}

/// What the user sent, one variant per kind of event the bot understands.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(String),
    LocationShare(LocationShare),
    ButtonReply { id: String, title: String },
    ListReply {
        id: String,
        title: String,
        description: String,
    },
    FormReply { name: String, body: String },
    ImageCaption(String),
    /// An event type the bot has no handling for; always answered with the default reply.
    Unsupported,
}

impl Message {
    /// The single string the intent predicates are evaluated against.
    ///
    /// Replies are flattened as `id-*-title-*-` (buttons) and
    /// `id-*-title-*-description` (list rows), so a reply id carrying a prefix such
    /// as `p-*-ord-` can be matched the same way as typed text.
    pub fn classification_text(&self) -> String {
        match self {
            Message::Text(body) => body.clone(),
            Message::ImageCaption(caption) => caption.clone(),
            Message::LocationShare(location) => location
                .address
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| "location".to_string()),
            Message::ButtonReply { id, title } => {
                format!("{id}{REPLY_DELIMITER}{title}{REPLY_DELIMITER}")
            }
            Message::ListReply {
                id,
                title,
                description,
            } => format!("{id}{REPLY_DELIMITER}{title}{REPLY_DELIMITER}{description}"),
            Message::FormReply { body, .. } => body.clone(),
            Message::Unsupported => String::new(),
        }
    }

    /// Id and title of a button or list reply.
    pub fn reply(&self) -> Option<(&str, &str)> {
        match self {
            Message::ButtonReply { id, title } | Message::ListReply { id, title, .. } => {
                Some((id, title))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub id: String,
    pub from: String,
    pub timestamp: String,
    pub message: Message,
}

impl InboundEvent {
    /// Shorthand for a typed text message.
    pub fn text(from: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(from, Message::Text(body.into()))
    }

    pub fn new(from: impl Into<String>, message: Message) -> Self {
        Self {
            id: String::new(),
            from: from.into(),
            timestamp: String::new(),
            message,
        }
    }
}

impl From<WireMessage> for InboundEvent {
    fn from(wire: WireMessage) -> Self {
        let message = match wire.body {
            WireBody::Text { text } => Message::Text(text.body),
            WireBody::Image { image } => Message::ImageCaption(image.caption),
            WireBody::Location { location } => Message::LocationShare(LocationShare {
                address: location.address,
                name: location.name,
                latitude: location.latitude.into_text(),
                longitude: location.longitude.into_text(),
            }),
            WireBody::Interactive { interactive } => match interactive {
                InteractivePayload::ButtonReply { button_reply } => Message::ButtonReply {
                    id: button_reply.id,
                    title: button_reply.title,
                },
                InteractivePayload::ListReply { list_reply } => Message::ListReply {
                    id: list_reply.id,
                    title: list_reply.title,
                    description: list_reply.description,
                },
                InteractivePayload::NfmReply { nfm_reply } => Message::FormReply {
                    name: nfm_reply.name,
                    body: nfm_reply.body,
                },
                InteractivePayload::Unsupported => Message::Unsupported,
            },
            WireBody::Unsupported => Message::Unsupported,
        };
        Self {
            id: wire.id,
            from: wire.from,
            timestamp: wire.timestamp,
            message,
        }
    }
}

impl Envelope {
    /// Name to greet the sender of `from` with: the contact's profile name, else its
    /// channel id, else the sender id itself.
    pub fn display_name(&self, from: &str) -> String {
        display_name_in(&self.contacts, from)
    }

    /// Normalized events paired with the sender's display name.
    pub fn into_events(self) -> Vec<(InboundEvent, String)> {
        let contacts = self.contacts;
        self.messages
            .into_iter()
            .map(|wire| {
                let name = display_name_in(&contacts, &wire.from);
                (InboundEvent::from(wire), name)
            })
            .collect()
    }
}

fn display_name_in(contacts: &[Contact], from: &str) -> String {
    let contact = contacts
        .iter()
        .find(|c| c.wa_id.as_deref() == Some(from))
        .or_else(|| contacts.first());

    contact
        .and_then(|c| {
            c.profile
                .as_ref()
                .map(|p| p.name.clone())
                .filter(|n| !n.trim().is_empty())
                .or_else(|| c.wa_id.clone())
        })
        .unwrap_or_else(|| from.to_string())
}
