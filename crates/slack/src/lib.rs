//! Slack surface of the bridge: Web API client, webhook payload parsing,
//! Block Kit builders, and request-signature verification.

pub mod api;
pub mod blocks;
pub mod error;
pub mod events;
pub mod verify;

pub use {
    api::SlackApi,
    error::{Error, Result},
    events::{InboundEvent, PushPayload, SlashCommand, parse_interaction},
    verify::verify_signature,
};
