use {
    anyhow::{Context, Result},
    secrecy::Secret,
};

const DEFAULT_PORT: u16 = 3000;

/// Process configuration, loaded once at startup. Every value except the
/// port is required; a missing variable is startup-fatal, never a runtime
/// error.
pub struct Config {
    pub slack_signing_secret: Secret<String>,
    pub slack_bot_token: Secret<String>,
    pub slack_user_token: Secret<String>,
    /// User id invited into newly created channels.
    pub slack_bot_user_id: String,
    /// Bot authorship marker used by the reaction relay.
    pub slack_bot_id: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: Secret<String>,
    pub trigger_api_token: Secret<String>,
    /// SQLite database path.
    pub database_path: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &'static str| {
            lookup(key).with_context(|| format!("missing required environment variable {key}"))
        };

        let port = match lookup("TEXTLINE_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid TEXTLINE_PORT: {raw}"))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            slack_signing_secret: Secret::new(required("TEXTLINE_SLACK_SIGNING_SECRET")?),
            slack_bot_token: Secret::new(required("TEXTLINE_SLACK_BOT_TOKEN")?),
            slack_user_token: Secret::new(required("TEXTLINE_SLACK_USER_TOKEN")?),
            slack_bot_user_id: required("TEXTLINE_SLACK_BOT_USER_ID")?,
            slack_bot_id: required("TEXTLINE_SLACK_BOT_ID")?,
            twilio_account_sid: required("TEXTLINE_TWILIO_ACCOUNT_SID")?,
            twilio_auth_token: Secret::new(required("TEXTLINE_TWILIO_AUTH_TOKEN")?),
            trigger_api_token: Secret::new(required("TEXTLINE_TRIGGER_API_TOKEN")?),
            database_path: required("TEXTLINE_DB")?,
            port,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("slack_bot_user_id", &self.slack_bot_user_id)
            .field("slack_bot_id", &self.slack_bot_id)
            .field("twilio_account_sid", &self.twilio_account_sid)
            .field("database_path", &self.database_path)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}
