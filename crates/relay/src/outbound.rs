//! Chat channel → outbound SMS, direction-swapped.

use std::sync::Arc;

use {tokio::task::JoinSet, tracing::{debug, error, warn}};

use crate::{Relay, emoji};

impl Relay {
    /// Handle a chat-side message event for a channel.
    ///
    /// Subtyped messages are system or bot posts, including our own relayed
    /// SMS; they are never sent back out. That check is what breaks the loop.
    pub async fn on_channel_message(&self, channel_id: &str, text: &str, subtype: Option<&str>) {
        if subtype.is_some() {
            debug!(channel_id, ?subtype, "ignoring subtyped message");
            return;
        }
        self.send_to_bound(channel_id, text).await;
    }

    /// Emoji-expand `text` and send one SMS per conversation bound to the
    /// channel. Sends are independent: each failure is logged on its own and
    /// the rest proceed.
    pub(crate) async fn send_to_bound(&self, channel_id: &str, text: &str) {
        let conversations = match self.directory.conversations_by_channel(channel_id).await {
            Ok(list) => list,
            Err(e) => {
                error!(channel_id, error = %e, "conversation lookup failed; message dropped");
                return;
            },
        };
        if conversations.is_empty() {
            return;
        }
        if conversations.len() > 1 {
            // Nothing enforces one conversation per channel; every bound
            // record gets its own send.
            warn!(
                channel_id,
                bound = conversations.len(),
                "channel bound to multiple conversations, fanning out"
            );
        }

        let body = emoji::emojify(text);
        let mut sends = JoinSet::new();
        for conversation in conversations {
            let sms = Arc::clone(&self.sms);
            let body = body.clone();
            sends.spawn(async move {
                // Replies are authored by the operator: the SMS originates
                // from the service number the contact wrote to, and goes to
                // the contact, the reverse of the inbound direction.
                let result = sms
                    .send(&conversation.receiver, &conversation.sender, &body)
                    .await;
                (conversation, result)
            });
        }

        while let Some(joined) = sends.join_next().await {
            match joined {
                Ok((_, Ok(()))) => {},
                Ok((conversation, Err(e))) => {
                    warn!(
                        conversation_id = %conversation.id,
                        error = %e,
                        "sms send failed; message lost"
                    );
                },
                Err(e) => warn!(error = %e, "sms send task aborted"),
            }
        }
    }
}
