//! Webhook payload parsing into closed event and action sets.
//!
//! Every dispatch path is a tagged enum with an explicit `Unknown` default:
//! an unrecognized tag is handled and logged upstream, never silently
//! dropped by a missed string match.

use serde_json::Value;

use textline_relay::OperatorAction;

use crate::error::{Error, Result};

/// Top-level Events API request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushPayload {
    /// Endpoint ownership handshake; must be answered synchronously.
    UrlVerification { challenge: String },
    /// A subscribed event, to be acked and dispatched.
    EventCallback { event: InboundEvent },
    Unknown { kind: String },
}

/// Chat-platform events the bridge subscribes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Message {
        channel_id: String,
        text: String,
        subtype: Option<String>,
    },
    ChannelRename {
        channel_id: String,
        name: String,
    },
    ReactionAdded {
        channel_id: String,
        item_ts: String,
        item_type: String,
        reaction: String,
    },
    Unknown {
        kind: String,
    },
}

fn str_at<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value.pointer(pointer).and_then(Value::as_str)
}

impl PushPayload {
    pub fn parse(payload: &Value) -> Self {
        match str_at(payload, "/type") {
            Some("url_verification") => match str_at(payload, "/challenge") {
                Some(challenge) => Self::UrlVerification {
                    challenge: challenge.to_string(),
                },
                None => Self::Unknown {
                    kind: "url_verification".into(),
                },
            },
            Some("event_callback") => Self::EventCallback {
                event: payload
                    .get("event")
                    .map_or(InboundEvent::Unknown { kind: "missing".into() }, InboundEvent::parse),
            },
            other => Self::Unknown {
                kind: other.unwrap_or("missing").to_string(),
            },
        }
    }
}

impl InboundEvent {
    pub fn parse(event: &Value) -> Self {
        match str_at(event, "/type") {
            Some("message") => Self::Message {
                channel_id: str_at(event, "/channel").unwrap_or_default().to_string(),
                text: str_at(event, "/text").unwrap_or_default().to_string(),
                subtype: str_at(event, "/subtype").map(str::to_string),
            },
            Some("group_rename") | Some("channel_rename") => Self::ChannelRename {
                channel_id: str_at(event, "/channel/id").unwrap_or_default().to_string(),
                name: str_at(event, "/channel/name").unwrap_or_default().to_string(),
            },
            Some("reaction_added") => Self::ReactionAdded {
                channel_id: str_at(event, "/item/channel").unwrap_or_default().to_string(),
                item_ts: str_at(event, "/item/ts").unwrap_or_default().to_string(),
                item_type: str_at(event, "/item/type").unwrap_or_default().to_string(),
                reaction: str_at(event, "/reaction").unwrap_or_default().to_string(),
            },
            other => Self::Unknown {
                kind: other.unwrap_or("missing").to_string(),
            },
        }
    }
}

/// Parse an interactivity payload (the decoded `payload` form field) into an
/// operator action.
pub fn parse_interaction(payload_json: &str) -> Result<OperatorAction> {
    let payload: Value = serde_json::from_str(payload_json)
        .map_err(|e| Error::Payload(format!("malformed interaction payload: {e}")))?;

    let channel_id = str_at(&payload, "/channel/id").unwrap_or_default().to_string();
    let message_ts = str_at(&payload, "/message/ts").unwrap_or_default().to_string();

    // Message actions carry a callback id; block actions carry action ids.
    if str_at(&payload, "/callback_id") == Some("response:add") {
        let message = str_at(&payload, "/message/text").unwrap_or_default().to_string();
        return Ok(OperatorAction::SaveResponse { message });
    }

    let action = payload
        .pointer("/actions/0")
        .ok_or_else(|| Error::Payload("missing actions array".into()))?;

    match str_at(action, "/action_id") {
        Some("dismiss") => Ok(OperatorAction::Dismiss {
            channel_id,
            message_ts,
        }),
        Some("response:send") => Ok(OperatorAction::SendResponse {
            channel_id,
            message_ts,
            response_id: str_at(action, "/value").unwrap_or_default().to_string(),
        }),
        other => Ok(OperatorAction::Unknown {
            id: other.unwrap_or("missing").to_string(),
        }),
    }
}

/// Slash commands the bridge registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    /// `/respond`: open the canned-response picker.
    Respond { channel_id: String },
    /// `/chat <args>`: channel metadata commands.
    Chat { channel_id: String, text: String },
    Unknown { command: String },
}

impl SlashCommand {
    pub fn parse(command: &str, channel_id: &str, text: &str) -> Self {
        match command {
            "/respond" => Self::Respond {
                channel_id: channel_id.to_string(),
            },
            "/chat" => Self::Chat {
                channel_id: channel_id.to_string(),
                text: text.to_string(),
            },
            other => Self::Unknown {
                command: other.to_string(),
            },
        }
    }
}
