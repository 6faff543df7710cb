use async_trait::async_trait;

use crate::{
    error::Result,
    types::{CannedResponse, Conversation, NewConversation, Trigger},
};

/// Outcome of a conditional conversation insert.
///
/// Two handlers racing to bind the same unseen address pair must not both
/// succeed: exactly one observes `Created`, every other caller gets
/// `Existing` carrying the winner's record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Created(Conversation),
    Existing(Conversation),
}

impl InsertOutcome {
    /// The persisted record, whichever side of the race we were on.
    #[must_use]
    pub fn into_conversation(self) -> Conversation {
        match self {
            Self::Created(c) | Self::Existing(c) => c,
        }
    }
}

/// Persistent storage contract for the session directory.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Look up the conversation bound to an exact (sender, receiver) pair.
    async fn conversation_by_pair(
        &self,
        sender: &str,
        receiver: &str,
    ) -> Result<Option<Conversation>>;

    /// All conversations bound to a channel. May return more than one.
    async fn conversations_by_channel(&self, channel_id: &str) -> Result<Vec<Conversation>>;

    /// Atomic insert keyed on (sender, receiver).
    async fn insert_conversation(&self, new: NewConversation) -> Result<InsertOutcome>;

    /// Update only the display name, leaving addresses and channel untouched.
    async fn update_display_name(&self, id: &str, display_name: &str) -> Result<()>;

    /// Update only the avatar URL. The value is stored as supplied.
    async fn update_avatar_url(&self, id: &str, avatar_url: &str) -> Result<()>;

    async fn trigger(&self, id: &str) -> Result<Option<Trigger>>;

    async fn canned_response(&self, id: &str) -> Result<Option<CannedResponse>>;

    async fn list_canned_responses(&self) -> Result<Vec<CannedResponse>>;

    async fn add_canned_response(&self, message: &str) -> Result<CannedResponse>;
}
