//! # Outbound replies
//!
//! Five payload shapes, serialized in the channel's JSON format:
//!
//! | Builder | `type` / `interactive.type` |
//! |---------|-----------------------------|
//! | [`text`] | `text` |
//! | [`buttons`] | `interactive` / `button` |
//! | [`list`] | `interactive` / `list` |
//! | [`location_request`] | `interactive` / `location_request_message` |
//! | [`address_request`] | `interactive` / `address_message` |
//!
//! Builders only assemble data. They do not check business rules.

pub mod payload;

pub use payload::*;

/// Country used by [`address_request`] when the caller does not name one.
pub const DEFAULT_COUNTRY: &str = "NG";

const DEFAULT_ADDRESS: &str = "Some location";
const POST_CODE_ERROR: &str = "We could not locate this pin code.";
const PHONE_NUMBER_ERROR: &str =
    "Invalid Phone number. Make sure the country code prefix matches the specified country";

pub fn text(to: impl Into<String>, body: impl Into<String>) -> Reply {
    Reply::new(
        to,
        Content::Text {
            text: TextBody { body: body.into() },
        },
    )
}

/// Reply buttons under a body, with empty header and footer.
pub fn buttons(to: impl Into<String>, body: impl Into<String>, buttons: Vec<ReplyButton>) -> Reply {
    Reply::interactive(
        to,
        Interactive::Button {
            header: String::new(),
            body: Caption::new(body),
            footer: Caption::new(""),
            action: ButtonAction { buttons },
        },
    )
}

pub fn list(
    to: impl Into<String>,
    body: impl Into<String>,
    sections: Vec<ListSection>,
    button: impl Into<String>,
) -> Reply {
    Reply::interactive(
        to,
        Interactive::List {
            body: Caption::new(body),
            action: ListAction {
                sections,
                button: button.into(),
            },
        },
    )
}

/// Asks the channel to prompt the user for a location share.
pub fn location_request(to: impl Into<String>, body: impl Into<String>) -> Reply {
    Reply::interactive(
        to,
        Interactive::LocationRequestMessage {
            body: Caption::new(body),
            action: NamedAction {
                name: "send_location".to_string(),
            },
        },
    )
}

/// An address form prefilled from `display_name` and the recipient, with any value
/// in `overrides` taking precedence.
pub fn address_request(
    to: impl Into<String>,
    display_name: &str,
    body: impl Into<String>,
    country: Option<&str>,
    overrides: AddressOverrides,
) -> Reply {
    let to = to.into();
    let values = AddressValues {
        name: overrides.name.unwrap_or_else(|| display_name.to_string()),
        phone_number: overrides.phone_number.unwrap_or_else(|| to.clone()),
        sg_post_code: overrides.sg_post_code.unwrap_or_default(),
        address: overrides
            .address
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
        city: overrides.city.unwrap_or_default(),
    };

    Reply::interactive(
        to,
        Interactive::AddressMessage {
            body: Caption::new(body),
            action: AddressAction {
                name: "address_message".to_string(),
                parameters: AddressParameters {
                    country: country.unwrap_or(DEFAULT_COUNTRY).to_string(),
                    values,
                    validation_errors: AddressValidationErrors {
                        sg_post_code: POST_CODE_ERROR.to_string(),
                        phone_number: PHONE_NUMBER_ERROR.to_string(),
                    },
                },
            },
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_body_is_untouched() {
        let body = "  Here's your order\n*Total: #300.00*  ";
        let reply = text("2348000000000", body);
        assert_eq!(reply.body_text(), body);
        assert_eq!(reply.recipient(), "2348000000000");
        assert_eq!(reply.kind(), ReplyKind::Text);
    }

    #[test]
    fn test_text_wire_shape() {
        let value = serde_json::to_value(text("123", "hi")).unwrap();
        assert_eq!(
            value,
            json!({
                "messaging_product": "whatsapp",
                "to": "123",
                "type": "text",
                "text": { "body": "hi" }
            })
        );
    }

    #[test]
    fn test_button_wire_shape() {
        let reply = buttons(
            "123",
            "Pick one",
            vec![ReplyButton::new("ord-000001", "Order Details")],
        );
        assert_eq!(reply.kind(), ReplyKind::Button);
        assert_eq!(reply.button_ids(), vec!["ord-000001"]);

        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(
            value["interactive"],
            json!({
                "type": "button",
                "header": "",
                "body": { "text": "Pick one" },
                "footer": { "text": "" },
                "action": { "buttons": [
                    { "type": "reply", "reply": { "id": "ord-000001", "title": "Order Details" } }
                ]}
            })
        );
    }

    #[test]
    fn test_list_and_location_shapes() {
        let reply = list(
            "123",
            "Services",
            vec![ListSection {
                title: "Laundry".into(),
                rows: vec![ListRow {
                    id: "275812".into(),
                    title: "Pickup Service".into(),
                    description: "Select to opt for pickup service".into(),
                }],
            }],
            "Choose",
        );
        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["interactive"]["type"], "list");
        assert_eq!(value["interactive"]["action"]["button"], "Choose");
        assert_eq!(
            value["interactive"]["action"]["sections"][0]["rows"][0]["id"],
            "275812"
        );

        let location = location_request("123", "Where should we pick up?");
        assert_eq!(location.kind(), ReplyKind::LocationRequest);
        let value = serde_json::to_value(&location).unwrap();
        assert_eq!(value["interactive"]["type"], "location_request_message");
        assert_eq!(value["interactive"]["action"]["name"], "send_location");
    }

    #[test]
    fn test_address_request_merges_overrides() {
        let reply = address_request(
            "2348000000000",
            "Ada",
            "Where to?",
            None,
            AddressOverrides {
                city: Some("Lagos".into()),
                name: Some("Ada L.".into()),
                ..Default::default()
            },
        );
        assert_eq!(reply.kind(), ReplyKind::AddressRequest);

        let value = serde_json::to_value(&reply).unwrap();
        let parameters = &value["interactive"]["action"]["parameters"];
        assert_eq!(parameters["country"], "NG");
        assert_eq!(
            parameters["values"],
            json!({
                "name": "Ada L.",
                "phone_number": "2348000000000",
                "sg_post_code": "",
                "address": "Some location",
                "city": "Lagos"
            })
        );
        assert_eq!(
            parameters["validation_errors"]["sg_post_code"],
            "We could not locate this pin code."
        );
    }
}
