/// Crate-wide result type for Slack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed Slack client errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request exceeded the request-scoped timeout.
    #[error("slack request timed out")]
    Timeout {
        #[source]
        source: reqwest::Error,
    },

    /// Transport-level failure (connect, TLS, malformed response).
    #[error("slack transport failure")]
    Http {
        #[source]
        source: reqwest::Error,
    },

    /// The API answered 200 but rejected the call (`ok: false`).
    #[error("slack api error: {code}")]
    Api { code: String },

    /// A webhook payload did not have the expected shape.
    #[error("unexpected slack payload: {0}")]
    Payload(String),
}

impl Error {
    /// Classify a reqwest failure, separating timeouts from other transport
    /// errors.
    #[must_use]
    pub fn from_transport(source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { source }
        } else {
            Self::Http { source }
        }
    }

    #[must_use]
    pub fn api(code: impl Into<String>) -> Self {
        Self::Api { code: code.into() }
    }

    /// Timeouts are the retryable failure class; no retry layer exists, but
    /// callers can tell the difference.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
