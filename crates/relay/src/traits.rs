use async_trait::async_trait;

/// A chat message to post into a channel, with optional author overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPost {
    pub channel_id: String,
    pub text: String,
    /// Display name shown for the post (derived from the conversation).
    pub username: Option<String>,
    /// Avatar shown for the post.
    pub icon_url: Option<String>,
}

/// A newly created chat channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelHandle {
    pub id: String,
    pub name: String,
}

/// A message from channel history, reduced to what the reaction relay needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub ts: String,
    pub text: String,
    pub subtype: Option<String>,
    pub bot_id: Option<String>,
}

/// One selectable entry in the canned-response picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerItem {
    pub id: String,
    pub message: String,
}

/// Chat platform operations the relay depends on.
///
/// Payload templating (picker layout, author overrides) is the
/// implementation's concern; the relay only supplies the data.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// Create a private channel with the given technical name.
    async fn create_channel(&self, name: &str) -> anyhow::Result<ChannelHandle>;

    /// Invite a user into a channel.
    async fn invite(&self, channel_id: &str, user_id: &str) -> anyhow::Result<()>;

    /// Post a message as the bridge bot.
    async fn post_message(&self, post: &ChatPost) -> anyhow::Result<()>;

    /// Post a message as the operator's own user. Such posts re-enter the
    /// message pipeline as ordinary human messages.
    async fn post_as_operator(&self, channel_id: &str, text: &str) -> anyhow::Result<()>;

    /// Post the canned-response picker listing.
    async fn post_picker(&self, channel_id: &str, items: &[PickerItem]) -> anyhow::Result<()>;

    /// Delete a previously posted message.
    async fn delete_message(&self, channel_id: &str, ts: &str) -> anyhow::Result<()>;

    /// Recent channel history, newest first.
    async fn history(&self, channel_id: &str) -> anyhow::Result<Vec<HistoryMessage>>;
}

/// SMS gateway send operation.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    async fn send(&self, from: &str, to: &str, body: &str) -> anyhow::Result<()>;
}
