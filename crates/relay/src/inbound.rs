//! Inbound SMS → chat channel.

use {anyhow::Result, tracing::error};

use crate::{Relay, traits::ChatPost};

impl Relay {
    /// Handle one inbound SMS. Never fails: the transport webhook must see a
    /// normal response whatever happened internally, so errors are logged and
    /// dropped here.
    pub async fn on_inbound_sms(&self, sender: &str, receiver: &str, body: &str) {
        if let Err(e) = self.relay_inbound(sender, receiver, body).await {
            error!(sender, receiver, error = %e, "inbound sms relay failed");
        }
    }

    async fn relay_inbound(&self, sender: &str, receiver: &str, body: &str) -> Result<()> {
        let conversation = self.resolve(sender, receiver).await?;

        let post = ChatPost {
            channel_id: conversation.channel_id.clone(),
            text: body.to_string(),
            username: Some(derive_display_name(&conversation.display_name)),
            icon_url: conversation.avatar_url.clone(),
        };
        self.chat.post_message(&post).await
    }
}

/// Derive the author name shown on inbound posts: split the conversation's
/// stored name on `-` and title-case each segment.
fn derive_display_name(name: &str) -> String {
    name.split('-')
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
