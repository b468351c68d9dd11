//! Serializable reply payloads.

use serde::Serialize;

/// A reply addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    messaging_product: &'static str,
    to: String,
    #[serde(flatten)]
    content: Content,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: TextBody },
    Interactive { interactive: Interactive },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interactive {
    Button {
        header: String,
        body: Caption,
        footer: Caption,
        action: ButtonAction,
    },
    List {
        body: Caption,
        action: ListAction,
    },
    LocationRequestMessage {
        body: Caption,
        action: NamedAction,
    },
    AddressMessage {
        body: Caption,
        action: AddressAction,
    },
}

/// Discriminates the five reply shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Text,
    Button,
    List,
    LocationRequest,
    AddressRequest,
}

/// `{"body": ...}` of a text message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBody {
    pub body: String,
}

/// `{"text": ...}` used for interactive bodies and footers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Caption {
    pub text: String,
}

impl Caption {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonAction {
    pub buttons: Vec<ReplyButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyButton {
    #[serde(rename = "type")]
    kind: &'static str,
    pub reply: ButtonLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonLabel {
    pub id: String,
    pub title: String,
}

impl ReplyButton {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind: "reply",
            reply: ButtonLabel {
                id: id.into(),
                title: title.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListAction {
    pub sections: Vec<ListSection>,
    pub button: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSection {
    pub title: String,
    pub rows: Vec<ListRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedAction {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressAction {
    pub name: String,
    pub parameters: AddressParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressParameters {
    pub country: String,
    pub values: AddressValues,
    pub validation_errors: AddressValidationErrors,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressValues {
    pub name: String,
    pub phone_number: String,
    pub sg_post_code: String,
    pub address: String,
    pub city: String,
}

/// Caller-supplied address values; unset fields keep the defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddressOverrides {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub sg_post_code: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressValidationErrors {
    pub sg_post_code: String,
    pub phone_number: String,
}

impl Reply {
    pub(crate) fn new(to: impl Into<String>, content: Content) -> Self {
        Self {
            messaging_product: "whatsapp",
            to: to.into(),
            content,
        }
    }

    pub(crate) fn interactive(to: impl Into<String>, interactive: Interactive) -> Self {
        Self::new(to, Content::Interactive { interactive })
    }

    pub fn recipient(&self) -> &str {
        &self.to
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn kind(&self) -> ReplyKind {
        match &self.content {
            Content::Text { .. } => ReplyKind::Text,
            Content::Interactive { interactive } => match interactive {
                Interactive::Button { .. } => ReplyKind::Button,
                Interactive::List { .. } => ReplyKind::List,
                Interactive::LocationRequestMessage { .. } => ReplyKind::LocationRequest,
                Interactive::AddressMessage { .. } => ReplyKind::AddressRequest,
            },
        }
    }

    /// The main text of the reply, whatever its shape.
    pub fn body_text(&self) -> &str {
        match &self.content {
            Content::Text { text } => &text.body,
            Content::Interactive { interactive } => match interactive {
                Interactive::Button { body, .. }
                | Interactive::List { body, .. }
                | Interactive::LocationRequestMessage { body, .. }
                | Interactive::AddressMessage { body, .. } => &body.text,
            },
        }
    }

    /// Ids of the reply buttons, empty for other shapes.
    pub fn button_ids(&self) -> Vec<&str> {
        self.buttons().iter().map(|b| b.reply.id.as_str()).collect()
    }

    pub fn buttons(&self) -> &[ReplyButton] {
        match &self.content {
            Content::Interactive {
                interactive: Interactive::Button { action, .. },
            } => &action.buttons,
            _ => &[],
        }
    }
}
