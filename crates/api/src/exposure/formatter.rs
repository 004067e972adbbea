//! Projection of stored items to what a given caller may see.

use serde_json::{Map, Value};

use exposer_auth::User;
use exposer_model::{Model, ReadDecision, to_document};

use super::ApiError;

/// `_id` and `id` plus every permitted field of `item`.
pub fn format_item<M: Model>(item: &M, decision: &ReadDecision) -> Result<Value, ApiError> {
    let id = Value::String(item.id().to_string());
    let mut out = Map::new();
    out.insert("_id".to_string(), id.clone());
    out.insert("id".to_string(), id);

    for (field, value) in to_document(item)? {
        if decision.permits(&field) {
            out.insert(field, value);
        }
    }
    Ok(Value::Object(out))
}

/// Format `item` for `user`, recomputing the read decision.
pub fn format_for<M: Model>(item: &M, user: Option<&User>) -> Result<Value, ApiError> {
    format_item(item, &item.can_read(user))
}

/// A formatted page plus the union of visible fields, in schema order.
pub fn format_page<M: Model>(items: &[M], user: Option<&User>) -> Result<(Vec<Value>, Vec<String>), ApiError> {
    let decisions: Vec<ReadDecision> = items.iter().map(|item| item.can_read(user)).collect();

    let data = items
        .iter()
        .zip(&decisions)
        .map(|(item, decision)| format_item(item, decision))
        .collect::<Result<Vec<_>, _>>()?;

    let readable = M::schema()
        .fields()
        .iter()
        .filter(|spec| decisions.iter().any(|d| d.permits(spec.name)))
        .map(|spec| spec.name.to_string())
        .collect();

    Ok((data, readable))
}
