use std::error::Error as StdError;

/// Crate-wide result type for directory operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed directory errors.
///
/// `NotFound` and `Unavailable` are deliberately distinct variants: callers
/// must be able to tell a legitimate absence from a store outage.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested record does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The store could not be reached or rejected the operation.
    #[error("directory unavailable: {context}: {source}")]
    Unavailable {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn unavailable(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Unavailable {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// True for legitimate absence, false for infrastructure failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
