//! Canned responses: picker listing and operator actions.

use {
    anyhow::Result,
    tracing::{debug, warn},
};

use crate::{Relay, traits::PickerItem};

/// Operator interactions on the picker and on freeform messages, as a closed
/// set. Unrecognized action ids land in `Unknown` and are logged, not
/// silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorAction {
    /// Remove the picker listing; no data changes.
    Dismiss {
        channel_id: String,
        message_ts: String,
    },
    /// Send the selected canned response into the channel.
    SendResponse {
        channel_id: String,
        message_ts: String,
        response_id: String,
    },
    /// Persist a freeform message as a new canned response.
    SaveResponse { message: String },
    Unknown { id: String },
}

impl Relay {
    /// Post the canned-response picker into a channel. Invoked outside a
    /// bridged channel, this is a no-op.
    pub async fn open_response_picker(&self, channel_id: &str) -> Result<()> {
        let bound = self.directory.conversations_by_channel(channel_id).await?;
        if bound.is_empty() {
            return Ok(());
        }

        let items: Vec<PickerItem> = self
            .directory
            .list_canned_responses()
            .await?
            .into_iter()
            .map(|r| PickerItem {
                id: r.id,
                message: r.message,
            })
            .collect();

        self.chat.post_picker(channel_id, &items).await
    }

    /// Handle one operator action; failures are logged and dropped.
    pub async fn on_operator_action(&self, action: OperatorAction) {
        if let Err(e) = self.handle_action(&action).await {
            warn!(?action, error = %e, "operator action failed");
        }
    }

    async fn handle_action(&self, action: &OperatorAction) -> Result<()> {
        match action {
            OperatorAction::Dismiss {
                channel_id,
                message_ts,
            } => self.chat.delete_message(channel_id, message_ts).await,

            OperatorAction::SendResponse {
                channel_id,
                message_ts,
                response_id,
            } => {
                self.chat.delete_message(channel_id, message_ts).await?;

                let Some(response) = self.directory.canned_response(response_id).await? else {
                    warn!(%response_id, "selected response no longer exists");
                    return Ok(());
                };

                // Posting as the operator re-enters the message pipeline: the
                // outbound relay picks the text up from the resulting message
                // event. Deliberately not a direct SMS send.
                self.chat
                    .post_as_operator(channel_id, &response.message)
                    .await
            },

            OperatorAction::SaveResponse { message } => {
                if message.is_empty() {
                    return Ok(());
                }
                self.directory.add_canned_response(message).await?;
                Ok(())
            },

            OperatorAction::Unknown { id } => {
                debug!(action_id = %id, "unhandled operator action");
                Ok(())
            },
        }
    }
}
