//! Storage/model error model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result type used by stores and model hooks.
pub type ModelResult<T> = Result<T, ModelError>;

/// One field that failed schema validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
    /// The offending value as received (`null` when the field was missing).
    pub value: Value,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value,
        }
    }
}

/// Error raised by the storage layer or a model hook.
///
/// Only `Validation` and `Duplicate` are caller-caused; every other variant is
/// a defect from the API's point of view.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// One or more fields failed schema validation.
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<FieldViolation>),

    /// A unique field already holds this value on another item.
    #[error("duplicate value for unique field `{field}`")]
    Duplicate { field: String, value: Value },

    /// An identifier was malformed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The storage backend failed.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl ModelError {
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self::Validation(violations)
    }

    pub fn duplicate(field: impl Into<String>, value: Value) -> Self {
        Self::Duplicate {
            field: field.into(),
            value,
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validation_display_lists_every_field() {
        let err = ModelError::validation(vec![
            FieldViolation::new("title", "is required", Value::Null),
            FieldViolation::new("priority", "expected integer", json!("high")),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: title: is required; priority: expected integer"
        );
    }

    #[test]
    fn duplicate_display_names_field() {
        let err = ModelError::duplicate("slug", json!("hello"));
        assert_eq!(err.to_string(), "duplicate value for unique field `slug`");
    }
}
