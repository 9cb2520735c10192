//! Error types for the dvsweep application.

use thiserror::Error;

/// A shared error type for the entire dvsweep application.
///
/// Variants distinguish run-fatal failures (retrieval, configuration) from
/// per-item failures (deletion, notification) so callers can decide whether
/// to abort or continue by type, not by message inspection.
#[derive(Error, Debug, Clone)]
pub enum SweepError {
    /// Bulk fetch of saved objects failed or returned a non-success status.
    /// Fatal for the run: without the fetched data there is nothing to
    /// reconcile.
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// A single deletion attempt failed. Recorded per item; the run
    /// continues with the remaining items.
    #[error("Deletion error for data view '{id}': {message}")]
    Deletion { id: String, message: String },

    /// Alert or summary delivery failed. Logged, never retried, and never
    /// rolls back a completed deletion.
    #[error("Notification error: {0}")]
    Notification(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },
}

impl SweepError {
    /// Creates a Retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval(message.into())
    }

    /// Creates a Deletion error
    pub fn deletion(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Deletion {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates a Notification error
    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this error aborts the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Retrieval(_) | Self::Config(_) | Self::Serialization { .. }
        )
    }

    /// Check if this is a Deletion error
    pub fn is_deletion(&self) -> bool {
        matches!(self, Self::Deletion { .. })
    }

    /// Check if this is a Notification error
    pub fn is_notification(&self) -> bool {
        matches!(self, Self::Notification(_))
    }
}

impl From<serde_json::Error> for SweepError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, SweepError>`.
pub type Result<T> = std::result::Result<T, SweepError>;
