//! Error types for tfplug

use crate::types::{Diagnostic, DiagnosticSeverity, DynamicValue};

/// Error type for tfplug operations
#[derive(Debug, thiserror::Error)]
pub enum TfplugError {
    #[error("Resource type not found: {0}")]
    ResourceNotFound(String),

    #[error("Data source type not found: {0}")]
    DataSourceNotFound(String),

    #[error("Provider not configured")]
    ProviderNotConfigured,

    #[error("Missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("Type mismatch for '{attribute}': expected {expected}, got {actual}")]
    TypeMismatch {
        attribute: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid attribute path: {0}")]
    InvalidPath(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("Import failed: {0}")]
    ImportFailed(String),

    #[error("{}", summarize(.0))]
    Diagnostics(Vec<Diagnostic>),

    /// The operation failed after the remote object was created; `state`
    /// identifies it so it can be kept (tainted) rather than orphaned
    #[error("{}", summarize(.diagnostics))]
    PartialApply {
        state: DynamicValue,
        diagnostics: Vec<Diagnostic>,
    },

    #[error("{0}")]
    Custom(String),
}

fn summarize(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .filter(|d| d.severity == DiagnosticSeverity::Error)
        .map(|d| {
            if d.detail.is_empty() {
                d.summary.clone()
            } else {
                format!("{}: {}", d.summary, d.detail)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias for tfplug operations
pub type Result<T> = std::result::Result<T, TfplugError>;

impl TfplugError {
    /// State recorded before the failure, if the remote object exists
    pub fn partial_state(&self) -> Option<&DynamicValue> {
        match self {
            TfplugError::PartialApply { state, .. } => Some(state),
            _ => None,
        }
    }
}

impl From<String> for TfplugError {
    fn from(s: String) -> Self {
        TfplugError::Custom(s)
    }
}

impl From<&str> for TfplugError {
    fn from(s: &str) -> Self {
        TfplugError::Custom(s.to_string())
    }
}

impl From<serde_json::Error> for TfplugError {
    fn from(e: serde_json::Error) -> Self {
        TfplugError::DecodingError(e.to_string())
    }
}
