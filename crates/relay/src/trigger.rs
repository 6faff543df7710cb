//! Token-gated programmatic sends, independent of chat state.

use {secrecy::ExposeSecret, tracing::error};

use crate::{Relay, emoji};

/// Result of a trigger execution attempt. Every variant maps to a
/// success-shaped response body; the transport status is 200 either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    Sent,
    InvalidAuthToken,
    InvalidTriggerId,
    TriggerInactive,
    DirectoryUnavailable,
}

impl TriggerOutcome {
    /// The error code carried in the response body, or `None` on success.
    #[must_use]
    pub fn error_code(self) -> Option<&'static str> {
        match self {
            Self::Sent => None,
            Self::InvalidAuthToken => Some("invalid_auth_token"),
            Self::InvalidTriggerId => Some("invalid_trigger_id"),
            Self::TriggerInactive => Some("trigger_inactive"),
            Self::DirectoryUnavailable => Some("directory_unavailable"),
        }
    }
}

impl Relay {
    /// Execute a pre-declared trigger. Validation order: auth token, trigger
    /// existence, active flag; the first failing check wins. This path never
    /// touches the chat platform.
    pub async fn execute_trigger(&self, trigger_id: &str, auth_token: &str) -> TriggerOutcome {
        if auth_token != self.trigger_token.expose_secret() {
            return TriggerOutcome::InvalidAuthToken;
        }

        let trigger = match self.directory.trigger(trigger_id).await {
            Ok(Some(t)) => t,
            Ok(None) => return TriggerOutcome::InvalidTriggerId,
            Err(e) => {
                error!(trigger_id, error = %e, "trigger lookup failed");
                return TriggerOutcome::DirectoryUnavailable;
            },
        };

        if !trigger.active {
            return TriggerOutcome::TriggerInactive;
        }

        // Unswapped: a programmatic send originates from the stored sender.
        let body = emoji::emojify(&trigger.message);
        if let Err(e) = self
            .sms
            .send(&trigger.sender, &trigger.receiver, &body)
            .await
        {
            error!(trigger_id, error = %e, "trigger sms send failed");
        }
        TriggerOutcome::Sent
    }
}
