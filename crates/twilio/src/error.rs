/// Crate-wide result type for Twilio operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed Twilio client errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request exceeded the request-scoped timeout.
    #[error("twilio request timed out")]
    Timeout {
        #[source]
        source: reqwest::Error,
    },

    /// Transport-level failure (connect, TLS, malformed response).
    #[error("twilio transport failure")]
    Http {
        #[source]
        source: reqwest::Error,
    },

    /// The API rejected the send.
    #[error("twilio api error ({status}): {message}")]
    Api { status: u16, message: String },
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

    /// Timeouts are the retryable failure class; no retry layer exists, but
    /// callers can tell the difference.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
