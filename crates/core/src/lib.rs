//! `exposer-core`: identifiers and the storage error model.
//!
//! Pure building blocks shared by the model contract, stores and the API.

pub mod error;
pub mod id;

pub use error::{FieldViolation, ModelError, ModelResult};
pub use id::{OBJECT_ID_LEN, ObjectId, UserId};

/// A stored item's fields as a JSON object (identifier excluded).
pub type Document = serde_json::Map<String, serde_json::Value>;
