use serde::{Deserialize, Serialize};

/// The binding record between an SMS address pair and a chat channel.
///
/// `sender` is the external contact's number, `receiver` the service number
/// the contact wrote to. The pair is unique across all conversations;
/// `channel_id` is not: several records may share one channel, and relay
/// fan-out across them is preserved rather than deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub sender: String,
    pub receiver: String,
    pub channel_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Fields for a conversation about to be persisted. The id is assigned by
/// the store.
#[derive(Debug, Clone)]
pub struct NewConversation {
    pub sender: String,
    pub receiver: String,
    pub channel_id: String,
    pub display_name: String,
}

/// A pre-declared, token-gated programmatic SMS send.
///
/// Created out-of-band; read-only to the relay core. `active = false`
/// permanently disables execution without deleting the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: String,
    pub active: bool,
    pub sender: String,
    pub receiver: String,
    pub message: String,
}

/// An operator-authored reusable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CannedResponse {
    pub id: String,
    pub message: String,
}
