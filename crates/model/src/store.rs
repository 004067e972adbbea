//! Async persistence contract.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use exposer_core::{Document, ModelResult, ObjectId};

use crate::Model;

/// Conjunction of field equality conditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Filter {
    conditions: Document,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &Document {
        &self.conditions
    }

    /// Whether `document` satisfies every condition (numbers compare by value).
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions.iter().all(|(field, expected)| {
            document
                .get(field)
                .is_some_and(|actual| values_equal(actual, expected))
        })
    }
}

/// Ordering on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub descending: bool,
}

impl Sort {
    /// Parse `field` (ascending) or `-field` (descending).
    pub fn parse(raw: &str) -> Option<Self> {
        let (field, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };
        if field.is_empty() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            descending,
        })
    }

    pub fn compare(&self, a: &Document, b: &Document) -> Ordering {
        let ord = compare_values(a.get(&self.field), b.get(&self.field));
        if self.descending { ord.reverse() } else { ord }
    }
}

/// A filtered, ordered window over a model's items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub filter: Filter,
    pub sort: Option<Sort>,
    pub skip: u64,
    /// `None` means no upper bound.
    pub limit: Option<u64>,
}

impl Query {
    pub fn filtered(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }
}

/// Storage layer for one model.
///
/// `create` and `save` validate the document against `M::schema()` and enforce
/// unique fields; failures surface as `ModelError::Validation` /
/// `ModelError::Duplicate`.
#[async_trait]
pub trait Store<M: Model>: Send + Sync {
    async fn find_by_id(&self, id: &ObjectId) -> ModelResult<Option<M>>;

    async fn find_all(&self, query: &Query) -> ModelResult<Vec<M>>;

    async fn count(&self, filter: &Filter) -> ModelResult<u64>;

    /// Validate and insert a new item under a freshly assigned identifier.
    async fn create(&self, document: Document) -> ModelResult<M>;

    /// Validate and persist `document` as the full state of item `id`.
    ///
    /// No version check: the last save wins.
    async fn save(&self, id: &ObjectId, document: Document) -> ModelResult<M>;

    /// Remove an item. Returns `false` when nothing was stored under `id`.
    async fn remove(&self, id: &ObjectId) -> ModelResult<bool>;
}

#[async_trait]
impl<M, S> Store<M> for Arc<S>
where
    M: Model,
    S: Store<M> + ?Sized,
{
    async fn find_by_id(&self, id: &ObjectId) -> ModelResult<Option<M>> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self, query: &Query) -> ModelResult<Vec<M>> {
        (**self).find_all(query).await
    }

    async fn count(&self, filter: &Filter) -> ModelResult<u64> {
        (**self).count(filter).await
    }

    async fn create(&self, document: Document) -> ModelResult<M> {
        (**self).create(document).await
    }

    async fn save(&self, id: &ObjectId, document: Document) -> ModelResult<M> {
        (**self).save(id, document).await
    }

    async fn remove(&self, id: &ObjectId) -> ModelResult<bool> {
        (**self).remove(id).await
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

/// Total order for sorting: missing/null < bool < number < string < other.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(_) => 4,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test documents are objects"),
        }
    }

    #[test]
    fn filter_compares_numbers_by_value() {
        let filter = Filter::new().eq("priority", json!(5.0));
        assert!(filter.matches(&doc(json!({"priority": 5}))));
        assert!(!filter.matches(&doc(json!({"priority": 6}))));
        assert!(!filter.matches(&doc(json!({}))));
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(Filter::new().matches(&doc(json!({"a": 1}))));
    }

    #[test]
    fn sort_parses_direction() {
        assert_eq!(
            Sort::parse("-priority"),
            Some(Sort { field: "priority".into(), descending: true })
        );
        assert_eq!(
            Sort::parse("title"),
            Some(Sort { field: "title".into(), descending: false })
        );
        assert_eq!(Sort::parse("-"), None);
    }

    #[test]
    fn sort_puts_missing_first_and_reverses() {
        let a = doc(json!({"p": 1}));
        let b = doc(json!({"p": 2}));
        let none = doc(json!({}));
        let asc = Sort::parse("p").unwrap();
        assert_eq!(asc.compare(&a, &b), Ordering::Less);
        assert_eq!(asc.compare(&none, &a), Ordering::Less);
        let desc = Sort::parse("-p").unwrap();
        assert_eq!(desc.compare(&a, &b), Ordering::Greater);
    }
}
