//! Unified error types for prefstore.
//!
//! The error surface is deliberately small: opening a backing store can
//! fail at startup, and persistence mutations can fail with I/O or
//! serialization errors, which are propagated verbatim. A read that finds
//! a value of the wrong type is not an error (callers fall back to their
//! default), and removing an absent key is a no-op.

use thiserror::Error;

/// All prefstore errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The backing store for a domain could not be opened.
    ///
    /// This is a startup error: there is no retry path, and callers are
    /// expected to treat it as unrecoverable.
    #[error("cannot open store for domain {domain:?}: {reason}")]
    OpenFailed {
        /// Domain that failed to open (`None` is the global domain).
        domain: Option<String>,
        /// Human-readable cause from the persistence layer.
        reason: String,
    },

    /// A persistence collaborator was already installed for this process.
    #[error("persistence collaborator already installed")]
    AlreadyInstalled,

    /// I/O error from the persistence layer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error from the persistence layer.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for prefstore operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a startup (open) failure.
    pub fn is_startup(&self) -> bool {
        matches!(self, Error::OpenFailed { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
