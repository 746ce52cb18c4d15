//! Error taxonomy for discovery rule operations

use std::fmt;
use thiserror::Error;

/// A single schema violation in a configuration record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Attribute path, e.g. `preprocessor.1.type`
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Errors surfaced by the discovery rule lifecycle
#[derive(Debug, Error)]
pub enum LldError {
    /// Local configuration failed the schema; no API call was made
    #[error("invalid configuration: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// Record handed over by the driver is not a JSON object
    #[error("invalid resource record: {0}")]
    InvalidRecord(String),

    /// Error returned by the API client, passed through unchanged
    #[error(transparent)]
    Api(#[from] anyhow::Error),

    /// Lookup by identifier matched more than one remote rule
    #[error("multiple discovery rules found for id {id} ({count} matches)")]
    Ambiguous { id: String, count: usize },
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, LldError>;
