//! Session resolution: address pair → conversation, created exactly once.

use {
    anyhow::Result,
    textline_directory::{Conversation, InsertOutcome, NewConversation},
    tracing::{info, warn},
};

use crate::Relay;

/// Prefix for technical channel names created on first contact.
const CHANNEL_NAME_PREFIX: &str = "sms";

impl Relay {
    /// Return the conversation bound to `(sender, receiver)`, creating a
    /// channel and record when the pair is unseen.
    ///
    /// Channel creation is externally visible before the record is persisted;
    /// a crash in between leaves an orphaned channel behind. The record write
    /// is a conditional insert, so of two concurrent resolutions for the same
    /// unseen pair exactly one creates the binding and the other adopts it.
    pub async fn resolve(&self, sender: &str, receiver: &str) -> Result<Conversation> {
        if let Some(existing) = self
            .directory
            .conversation_by_pair(sender, receiver)
            .await?
        {
            return Ok(existing);
        }

        let name = channel_name(sender);
        let channel = self.chat.create_channel(&name).await?;
        info!(
            channel_id = %channel.id,
            channel_name = %channel.name,
            "created channel for new address pair"
        );

        self.chat
            .invite(&channel.id, &self.identity.user_id)
            .await?;

        let outcome = self
            .directory
            .insert_conversation(NewConversation {
                sender: sender.to_string(),
                receiver: receiver.to_string(),
                channel_id: channel.id.clone(),
                display_name: channel.name.clone(),
            })
            .await?;

        match outcome {
            InsertOutcome::Created(conversation) => Ok(conversation),
            InsertOutcome::Existing(conversation) => {
                // Lost a concurrent first-contact race; the channel created
                // above has no record pointing at it.
                warn!(
                    orphaned_channel = %channel.id,
                    bound_channel = %conversation.channel_id,
                    "resolution race lost, adopting existing conversation"
                );
                Ok(conversation)
            },
        }
    }
}

fn channel_name(sender: &str) -> String {
    format!("{CHANNEL_NAME_PREFIX}-{}", sender.trim_start_matches('+'))
}
