//! Conversation session manager and bidirectional relay.
//!
//! Binds SMS address pairs to chat channels and moves messages, reactions,
//! and channel metadata between the two surfaces. The chat platform, SMS
//! gateway, and session directory are consumed as capability interfaces;
//! handlers share no in-process mutable state, so the directory is the only
//! synchronization point.

use std::sync::Arc;

use {secrecy::Secret, textline_directory::Directory};

pub mod emoji;
pub mod inbound;
pub mod metadata;
pub mod outbound;
pub mod reaction;
pub mod resolver;
pub mod responses;
pub mod traits;
pub mod trigger;

pub use {
    responses::OperatorAction,
    traits::{ChannelHandle, ChatApi, ChatPost, HistoryMessage, PickerItem, SmsGateway},
    trigger::TriggerOutcome,
};

/// The bridge's own accounts within the chat platform.
#[derive(Debug, Clone)]
pub struct BridgeIdentity {
    /// User id invited into every newly created channel.
    pub user_id: String,
    /// Bot authorship marker; posts carrying this id are relay-originated.
    pub bot_id: String,
}

/// The relay core. Constructed once at startup and shared by every handler.
pub struct Relay {
    directory: Arc<dyn Directory>,
    chat: Arc<dyn ChatApi>,
    sms: Arc<dyn SmsGateway>,
    identity: BridgeIdentity,
    trigger_token: Secret<String>,
}

impl Relay {
    pub fn new(
        directory: Arc<dyn Directory>,
        chat: Arc<dyn ChatApi>,
        sms: Arc<dyn SmsGateway>,
        identity: BridgeIdentity,
        trigger_token: Secret<String>,
    ) -> Self {
        Self {
            directory,
            chat,
            sms,
            identity,
            trigger_token,
        }
    }
}
