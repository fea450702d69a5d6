//! # Domain Error System
//!
//! A single, flat error enum for the document-flow domain. Each variant
//! corresponds to one failure kind from the error-handling taxonomy:
//! validation, not-found, permission-denied, adapter transient/parse
//! failures, configuration, and internal failures.
//!
//! Adapter parse failures do not abort a run: the flow engine accumulates
//! them into a run's `errors` list rather than propagating a `FlowError`
//! for every bad row. This enum exists for failures that do abort an
//! operation.

use thiserror::Error;

/// Domain-specific errors for the document-flow system.
#[derive(Error, Debug, Clone)]
pub enum FlowError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Brak dostępu: {0}")]
    PermissionDenied(String),

    #[error("Adapter transient failure: {0}")]
    AdapterTransient(String),

    #[error("Adapter parse failure at row {row}: {message}")]
    AdapterParse { row: usize, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FlowError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    pub fn adapter_parse(row: usize, message: impl Into<String>) -> Self {
        Self::AdapterParse {
            row,
            message: message.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the failure represents a transient condition worth a retry
    /// (not auto-retried anywhere in this system; informational only).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FlowError::AdapterTransient(_) | FlowError::Io(_))
    }

    /// Coarse category, useful for logging and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            FlowError::Validation(_) => "validation",
            FlowError::NotFound(_) => "not_found",
            FlowError::PermissionDenied(_) => "permission",
            FlowError::AdapterTransient(_) => "adapter_transient",
            FlowError::AdapterParse { .. } => "adapter_parse",
            FlowError::Configuration(_) => "configuration",
            FlowError::Database(_) => "database",
            FlowError::Serialization(_) => "serialization",
            FlowError::Io(_) => "io",
            FlowError::Internal(_) => "internal",
        }
    }

    /// The HTTP status a boundary layer would use for this error, per the
    /// documented error taxonomy. Not wired to any transport here — this
    /// system stops at the use-case boundary.
    pub fn http_status_hint(&self) -> u16 {
        match self {
            FlowError::Validation(_) => 400,
            FlowError::NotFound(_) => 404,
            FlowError::PermissionDenied(_) => 403,
            FlowError::AdapterTransient(_) => 200,
            FlowError::AdapterParse { .. } => 200,
            FlowError::Configuration(_) => 200,
            FlowError::Database(_) | FlowError::Serialization(_) | FlowError::Io(_) | FlowError::Internal(_) => 500,
        }
    }
}

impl From<std::io::Error> for FlowError {
    fn from(err: std::io::Error) -> Self {
        FlowError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        FlowError::Serialization(err.to_string())
    }
}
