//! The capability contract every exposed model implements.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use exposer_auth::User;
use exposer_core::{Document, ModelError, ModelResult, ObjectId};

use crate::Schema;

/// Key under which the identifier travels inside a serialized item.
pub const ID_KEY: &str = "id";

/// Which fields a caller may see on one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadDecision {
    AllFields,
    Fields(Vec<String>),
}

impl ReadDecision {
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fields(names.into_iter().map(Into::into).collect())
    }

    pub fn permits(&self, field: &str) -> bool {
        match self {
            ReadDecision::AllFields => true,
            ReadDecision::Fields(names) => names.iter().any(|n| n == field),
        }
    }
}

/// Whether a caller may change one item, and which fields, in application order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteDecision {
    Denied,
    Allowed(Vec<String>),
}

impl WriteDecision {
    pub fn allowed<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Allowed(names.into_iter().map(Into::into).collect())
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, WriteDecision::Allowed(_))
    }
}

/// An exposed data model.
///
/// Items serialize to a JSON object carrying their identifier under
/// [`ID_KEY`] plus the schema fields. Capability hooks are recomputed on every
/// request; nothing here is cached between calls.
#[async_trait]
pub trait Model: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Model name as shown in listings and used for the default mount point.
    const NAME: &'static str;

    fn schema() -> Schema;

    fn id(&self) -> &ObjectId;

    /// Gate for creating new items. Anyone may create unless overridden.
    fn can_create(_user: Option<&User>) -> bool {
        true
    }

    fn can_read(&self, user: Option<&User>) -> ReadDecision;

    /// Errors are internal failures, not denials.
    async fn can_update(&self, user: Option<&User>) -> ModelResult<WriteDecision>;

    async fn can_delete(&self, user: Option<&User>) -> ModelResult<bool>;

    /// Assign one incoming field onto a document being created or updated.
    ///
    /// Models with dependent fields override this. On update, assignments run
    /// in the order of the settable-field sequence; on create, in schema
    /// order. A later field may overwrite state derived by an earlier one.
    fn set_field(document: &mut Document, field: &str, value: Value) {
        document.insert(field.to_string(), value);
    }
}

/// Serialize an item into its field document (identifier removed).
pub fn to_document<M: Model>(item: &M) -> ModelResult<Document> {
    match serde_json::to_value(item) {
        Ok(Value::Object(mut map)) => {
            map.remove(ID_KEY);
            Ok(map)
        }
        Ok(other) => Err(ModelError::storage(format!(
            "{} serialized to a non-object: {other}",
            M::NAME
        ))),
        Err(e) => Err(ModelError::storage(format!("{} failed to serialize: {e}", M::NAME))),
    }
}

/// Build an item from an already validated document.
pub fn from_document<M: Model>(id: &ObjectId, mut document: Document) -> ModelResult<M> {
    document.insert(ID_KEY.to_string(), Value::String(id.to_string()));
    serde_json::from_value(Value::Object(document))
        .map_err(|e| ModelError::storage(format!("{} failed to deserialize: {e}", M::NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    use crate::FieldSpec;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: ObjectId,
        text: String,
    }

    #[async_trait]
    impl Model for Note {
        const NAME: &'static str = "Note";

        fn schema() -> Schema {
            Schema::new().field(FieldSpec::string("text").required())
        }

        fn id(&self) -> &ObjectId {
            &self.id
        }

        fn can_read(&self, _user: Option<&User>) -> ReadDecision {
            ReadDecision::AllFields
        }

        async fn can_update(&self, _user: Option<&User>) -> ModelResult<WriteDecision> {
            Ok(WriteDecision::allowed(["text"]))
        }

        async fn can_delete(&self, _user: Option<&User>) -> ModelResult<bool> {
            Ok(true)
        }
    }

    #[test]
    fn document_round_trip_strips_and_restores_id() {
        let note = Note { id: ObjectId::new(), text: "hi".into() };
        let doc = to_document(&note).unwrap();
        assert_eq!(Value::Object(doc.clone()), json!({"text": "hi"}));
        let back: Note = from_document(&note.id, doc).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn from_document_reports_shape_mismatch_as_storage_error() {
        let mut doc = Document::new();
        doc.insert("text".into(), json!(5));
        let err = from_document::<Note>(&ObjectId::new(), doc).unwrap_err();
        assert!(matches!(err, ModelError::Storage(_)));
    }

    #[test]
    fn read_decision_permits() {
        let d = ReadDecision::fields(["title"]);
        assert!(d.permits("title"));
        assert!(!d.permits("notes"));
        assert!(ReadDecision::AllFields.permits("anything"));
    }

    #[test]
    fn default_setter_inserts() {
        let mut doc = Document::new();
        Note::set_field(&mut doc, "text", json!("x"));
        assert_eq!(doc.get("text"), Some(&json!("x")));
    }
}
