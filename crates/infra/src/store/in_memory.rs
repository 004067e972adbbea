use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use exposer_core::{Document, ModelError, ModelResult, ObjectId};
use exposer_model::{Filter, Model, Query, Store, from_document, to_document};

/// In-memory store for tests/dev.
///
/// Items are kept in identifier order, which is creation order for ids minted
/// by this process. Locks are never held across an await.
#[derive(Debug)]
pub struct InMemoryStore<M> {
    inner: RwLock<BTreeMap<ObjectId, M>>,
    _model: PhantomData<fn() -> M>,
}

impl<M> InMemoryStore<M> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
            _model: PhantomData,
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl<M> Default for InMemoryStore<M> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> ModelError {
    ModelError::storage("in-memory store lock poisoned")
}

/// Reject `document` if a unique field collides with any item other than `current`.
fn check_unique<M: Model>(
    items: &BTreeMap<ObjectId, M>,
    current: Option<&ObjectId>,
    document: &Document,
) -> ModelResult<()> {
    let schema = M::schema();
    for spec in schema.unique_fields() {
        let Some(value) = document.get(spec.name) else {
            continue;
        };
        for (id, item) in items {
            if Some(id) == current {
                continue;
            }
            let other = to_document(item)?;
            if other.get(spec.name) == Some(value) {
                return Err(ModelError::duplicate(spec.name, value.clone()));
            }
        }
    }
    Ok(())
}

#[async_trait]
impl<M: Model> Store<M> for InMemoryStore<M> {
    async fn find_by_id(&self, id: &ObjectId) -> ModelResult<Option<M>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(id).cloned())
    }

    async fn find_all(&self, query: &Query) -> ModelResult<Vec<M>> {
        let map = self.inner.read().map_err(|_| poisoned())?;

        let mut matched = Vec::new();
        for item in map.values() {
            let document = to_document(item)?;
            if query.filter.matches(&document) {
                matched.push((document, item));
            }
        }
        if let Some(sort) = &query.sort {
            matched.sort_by(|(a, _), (b, _)| sort.compare(a, b));
        }

        let skip = usize::try_from(query.skip).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map(|l| usize::try_from(l).unwrap_or(usize::MAX))
            .unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn count(&self, filter: &Filter) -> ModelResult<u64> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut count = 0u64;
        for item in map.values() {
            if filter.matches(&to_document(item)?) {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn create(&self, mut document: Document) -> ModelResult<M> {
        M::schema().validate(&mut document)?;

        let mut map = self.inner.write().map_err(|_| poisoned())?;
        check_unique(&map, None, &document)?;

        let id = ObjectId::new();
        let item: M = from_document(&id, document)?;
        map.insert(id.clone(), item.clone());

        tracing::debug!(model = M::NAME, %id, "item created");
        Ok(item)
    }

    async fn save(&self, id: &ObjectId, mut document: Document) -> ModelResult<M> {
        M::schema().validate(&mut document)?;

        let mut map = self.inner.write().map_err(|_| poisoned())?;
        if !map.contains_key(id) {
            return Err(ModelError::storage(format!("{} {id} no longer exists", M::NAME)));
        }
        check_unique(&map, Some(id), &document)?;

        let item: M = from_document(id, document)?;
        map.insert(id.clone(), item.clone());

        tracing::debug!(model = M::NAME, %id, "item saved");
        Ok(item)
    }

    async fn remove(&self, id: &ObjectId) -> ModelResult<bool> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let removed = map.remove(id).is_some();
        if removed {
            tracing::debug!(model = M::NAME, %id, "item removed");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use exposer_auth::User;
    use exposer_model::{FieldSpec, ReadDecision, Schema, Sort, WriteDecision};
    use serde::{Deserialize, Serialize};
    use serde_json::{Value, json};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Tag {
        id: ObjectId,
        name: String,
        #[serde(default)]
        weight: i64,
    }

    #[async_trait]
    impl Model for Tag {
        const NAME: &'static str = "Tag";

        fn schema() -> Schema {
            Schema::new()
                .field(FieldSpec::string("name").required().unique())
                .field(FieldSpec::integer("weight").default_value(0))
        }

        fn id(&self) -> &ObjectId {
            &self.id
        }

        fn can_read(&self, _user: Option<&User>) -> ReadDecision {
            ReadDecision::AllFields
        }

        async fn can_update(&self, _user: Option<&User>) -> ModelResult<WriteDecision> {
            Ok(WriteDecision::allowed(["name", "weight"]))
        }

        async fn can_delete(&self, _user: Option<&User>) -> ModelResult<bool> {
            Ok(true)
        }
    }

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test documents are objects"),
        }
    }

    async fn seed(store: &InMemoryStore<Tag>, names: &[(&str, i64)]) -> Vec<Tag> {
        let mut out = Vec::new();
        for (name, weight) in names {
            out.push(store.create(doc(json!({"name": name, "weight": weight}))).await.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn create_assigns_id_and_applies_defaults() {
        let store = InMemoryStore::<Tag>::new();
        let tag = store.create(doc(json!({"name": "rust"}))).await.unwrap();
        assert!(ObjectId::is_valid(tag.id.as_str()));
        assert_eq!(tag.weight, 0);
        assert_eq!(store.find_by_id(&tag.id).await.unwrap(), Some(tag));
    }

    #[tokio::test]
    async fn create_rejects_invalid_document() {
        let store = InMemoryStore::<Tag>::new();
        let err = store.create(doc(json!({"weight": "heavy"}))).await.unwrap_err();
        let ModelError::Validation(violations) = err else {
            panic!("expected validation error");
        };
        assert_eq!(violations.len(), 2);
        assert_eq!(store.count(&Filter::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unique_field_conflicts_on_create_and_save() {
        let store = InMemoryStore::<Tag>::new();
        let tags = seed(&store, &[("a", 1), ("b", 2)]).await;

        let err = store.create(doc(json!({"name": "a"}))).await.unwrap_err();
        assert_eq!(err, ModelError::duplicate("name", json!("a")));

        let err = store
            .save(&tags[1].id, doc(json!({"name": "a", "weight": 2})))
            .await
            .unwrap_err();
        assert_eq!(err, ModelError::duplicate("name", json!("a")));

        // Saving an item with its own unique value is fine.
        store
            .save(&tags[0].id, doc(json!({"name": "a", "weight": 9})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn last_save_wins() {
        let store = InMemoryStore::<Tag>::new();
        let tag = seed(&store, &[("a", 1)]).await.remove(0);

        let mut first = to_document(&tag).unwrap();
        let mut second = to_document(&tag).unwrap();
        first.insert("weight".into(), json!(10));
        second.insert("name".into(), json!("renamed"));

        store.save(&tag.id, first).await.unwrap();
        store.save(&tag.id, second).await.unwrap();

        let stored = store.find_by_id(&tag.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "renamed");
        assert_eq!(stored.weight, 1);
    }

    #[tokio::test]
    async fn save_of_removed_item_fails() {
        let store = InMemoryStore::<Tag>::new();
        let tag = seed(&store, &[("a", 1)]).await.remove(0);
        assert!(store.remove(&tag.id).await.unwrap());
        assert!(!store.remove(&tag.id).await.unwrap());
        let err = store.save(&tag.id, to_document(&tag).unwrap()).await.unwrap_err();
        assert!(matches!(err, ModelError::Storage(_)));
    }

    #[tokio::test]
    async fn find_all_filters_sorts_and_pages() {
        let store = InMemoryStore::<Tag>::new();
        seed(&store, &[("a", 3), ("b", 1), ("c", 3), ("d", 2)]).await;

        let all = store.find_all(&Query::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);

        let heavy = Filter::new().eq("weight", 3);
        let page = store
            .find_all(&Query {
                filter: heavy.clone(),
                sort: Sort::parse("-name"),
                skip: 0,
                limit: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].name, "c");
        assert_eq!(store.count(&heavy).await.unwrap(), 2);

        let tail = store
            .find_all(&Query {
                sort: Sort::parse("weight"),
                skip: 2,
                limit: Some(10),
                ..Query::default()
            })
            .await
            .unwrap();
        let weights: Vec<_> = tail.iter().map(|t| t.weight).collect();
        assert_eq!(weights, vec![3, 3]);
    }
}
