//! Chat reactions → SMS annotations.

use {anyhow::Result, tracing::error};

use crate::{Relay, emoji};

impl Relay {
    /// Handle a reaction-added event.
    ///
    /// Only reactions on relay-originated posts (our own bot's messages, i.e.
    /// messages that arrived as inbound SMS) are forwarded; reacting to a
    /// colleague's chat message stays inside the channel.
    pub async fn on_reaction(&self, channel_id: &str, item_ts: &str, item_type: &str, reaction: &str) {
        if item_type != "message" {
            return;
        }
        if let Err(e) = self.relay_reaction(channel_id, item_ts, reaction).await {
            error!(channel_id, error = %e, "reaction relay failed");
        }
    }

    async fn relay_reaction(&self, channel_id: &str, item_ts: &str, reaction: &str) -> Result<()> {
        let bound = self.directory.conversations_by_channel(channel_id).await?;
        if bound.is_empty() {
            return Ok(());
        }

        let history = self.chat.history(channel_id).await?;
        let Some(message) = history.iter().find(|m| m.ts == item_ts) else {
            return Ok(());
        };

        let from_inbound_sms = message.subtype.as_deref() == Some("bot_message")
            && message.bot_id.as_deref() == Some(self.identity.bot_id.as_str());
        if !from_inbound_sms {
            return Ok(());
        }

        let glyph = emoji::emojify(&format!(":{reaction}:"));
        let text = format!("Reacted with {glyph} to \"{}\"", emoji::emojify(&message.text));
        self.send_to_bound(channel_id, &text).await;
        Ok(())
    }
}
