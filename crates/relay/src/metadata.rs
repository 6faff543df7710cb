//! Channel metadata reconciliation: renames and avatar updates.

use std::sync::Arc;

use {
    tokio::task::JoinSet,
    tracing::{debug, error, warn},
};

use crate::{Relay, traits::ChatPost};

const PICTURE_USAGE: &str = "Please use this format `/chat picture [url]`";

impl Relay {
    /// Handle a channel-rename event: copy the new name onto every bound
    /// conversation's display name. Updates are issued independently per
    /// record; partial failure is tolerated and logged.
    pub async fn on_channel_rename(&self, channel_id: &str, new_name: &str) {
        let conversations = match self.directory.conversations_by_channel(channel_id).await {
            Ok(list) => list,
            Err(e) => {
                error!(channel_id, error = %e, "conversation lookup failed; rename dropped");
                return;
            },
        };

        let mut updates = JoinSet::new();
        for conversation in conversations {
            let directory = Arc::clone(&self.directory);
            let name = new_name.to_string();
            updates.spawn(async move {
                let result = directory.update_display_name(&conversation.id, &name).await;
                (conversation.id, result)
            });
        }

        while let Some(joined) = updates.join_next().await {
            match joined {
                Ok((_, Ok(()))) => {},
                Ok((id, Err(e))) => warn!(conversation_id = %id, error = %e, "rename sync failed"),
                Err(e) => warn!(error = %e, "rename sync task aborted"),
            }
        }
    }

    /// Handle the `chat` slash command from an operator.
    ///
    /// `picture <url>` sets the avatar on every conversation bound to the
    /// invoking channel; the value is stored as supplied. Invoked outside a
    /// bridged channel, the command does nothing at all.
    pub async fn chat_command(&self, channel_id: &str, text: &str) {
        let conversations = match self.directory.conversations_by_channel(channel_id).await {
            Ok(list) => list,
            Err(e) => {
                error!(channel_id, error = %e, "conversation lookup failed; command dropped");
                return;
            },
        };
        if conversations.is_empty() {
            return;
        }

        let args: Vec<&str> = text.split_whitespace().collect();
        match args.first().copied() {
            Some("picture") => {
                if args.len() != 2 {
                    self.reply(channel_id, PICTURE_USAGE).await;
                    return;
                }
                let url = args[1];

                let mut updates = JoinSet::new();
                for conversation in conversations {
                    let directory = Arc::clone(&self.directory);
                    let url = url.to_string();
                    updates.spawn(async move {
                        let result = directory.update_avatar_url(&conversation.id, &url).await;
                        (conversation.id, result)
                    });
                }
                while let Some(joined) = updates.join_next().await {
                    match joined {
                        Ok((_, Ok(()))) => {},
                        Ok((id, Err(e))) => {
                            warn!(conversation_id = %id, error = %e, "avatar update failed");
                        },
                        Err(e) => warn!(error = %e, "avatar update task aborted"),
                    }
                }

                self.reply(channel_id, "Profile picture has been updated.")
                    .await;
            },
            other => {
                debug!(channel_id, subcommand = ?other, "unhandled chat subcommand");
            },
        }
    }

    /// Post a plain bot reply into a channel, logging on failure.
    async fn reply(&self, channel_id: &str, text: &str) {
        let post = ChatPost {
            channel_id: channel_id.to_string(),
            text: text.to_string(),
            username: None,
            icon_url: None,
        };
        if let Err(e) = self.chat.post_message(&post).await {
            warn!(channel_id, error = %e, "command reply failed");
        }
    }
}
