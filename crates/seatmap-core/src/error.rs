//! Error types for the Seatmap engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire Seatmap workspace.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeatmapError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The venue layout could not be fetched
    #[error("Layout load failed: {0}")]
    LayoutLoad(String),

    /// The session record could not be fetched
    #[error("Session load failed: {0}")]
    SessionLoad(String),

    /// One of the two table reconciliation calls was rejected
    #[error("Table reconciliation failed during {stage}: {message}")]
    Reconciliation {
        stage: ReconciliationStage,
        message: String,
    },

    /// The session has ended and is read-only
    #[error("Session '{0}' has ended")]
    SessionEnded(String),

    /// Remote call failed below the domain level (HTTP, connection, status)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Which half of the two-call save failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStage {
    AddTables,
    RemoveTables,
}

impl std::fmt::Display for ReconciliationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddTables => write!(f, "add tables"),
            Self::RemoveTables => write!(f, "remove tables"),
        }
    }
}

impl SeatmapError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Reconciliation error for the given stage
    pub fn reconciliation(stage: ReconciliationStage, message: impl Into<String>) -> Self {
        Self::Reconciliation {
            stage,
            message: message.into(),
        }
    }

    /// Creates a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a reconciliation error
    pub fn is_reconciliation(&self) -> bool {
        matches!(self, Self::Reconciliation { .. })
    }

    /// Check if this error stems from fetching the session or its layout.
    ///
    /// These failures degrade the view to a passive, non-interactive state.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::LayoutLoad(_) | Self::SessionLoad(_) | Self::NotFound { .. }
        )
    }

    /// Check if this is a config error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for SeatmapError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

/// A type alias for `Result<T, SeatmapError>`.
pub type Result<T> = std::result::Result<T, SeatmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconciliation_error_message_names_stage() {
        let err = SeatmapError::reconciliation(ReconciliationStage::RemoveTables, "503");
        assert_eq!(
            err.to_string(),
            "Table reconciliation failed during remove tables: 503"
        );
        assert!(err.is_reconciliation());
        assert!(!err.is_load_failure());
    }

    #[test]
    fn test_not_found_counts_as_load_failure() {
        let err = SeatmapError::not_found("Venue", "v-1");
        assert!(err.is_not_found());
        assert!(err.is_load_failure());
    }
}
