use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use exposer_auth::User;
use exposer_core::{Document, ModelResult, ObjectId};
use exposer_model::{FieldSpec, Model, ReadDecision, Schema, WriteDecision};

/// A published (or draft) piece of writing owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ObjectId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub priority: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

const PUBLIC_FIELDS: [&str; 5] = ["title", "slug", "body", "published", "owner"];
const MEMBER_FIELDS: [&str; 6] = ["title", "slug", "body", "published", "priority", "owner"];
const OWNER_SETTABLE: [&str; 5] = ["title", "slug", "body", "published", "notes"];
const ADMIN_SETTABLE: [&str; 7] = ["title", "slug", "body", "published", "priority", "notes", "owner"];

impl Article {
    fn is_owned_by(&self, user: &User) -> bool {
        user.owns(self.owner.as_deref())
    }
}

#[async_trait]
impl Model for Article {
    const NAME: &'static str = "Article";

    fn schema() -> Schema {
        Schema::new()
            .field(FieldSpec::string("title").required())
            .field(FieldSpec::string("slug").unique())
            .field(FieldSpec::string("body").default_value(""))
            .field(FieldSpec::boolean("published").default_value(false))
            .field(FieldSpec::integer("priority").default_value(0))
            .field(FieldSpec::string("notes"))
            .field(FieldSpec::string("owner"))
    }

    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn can_create(user: Option<&User>) -> bool {
        user.is_some()
    }

    fn can_read(&self, user: Option<&User>) -> ReadDecision {
        match user {
            Some(u) if u.is_admin() || self.is_owned_by(u) => ReadDecision::AllFields,
            Some(_) => ReadDecision::fields(MEMBER_FIELDS),
            None if self.published => ReadDecision::fields(PUBLIC_FIELDS),
            None => ReadDecision::fields(["title"]),
        }
    }

    async fn can_update(&self, user: Option<&User>) -> ModelResult<WriteDecision> {
        Ok(match user {
            Some(u) if u.is_admin() => WriteDecision::allowed(ADMIN_SETTABLE),
            Some(u) if self.is_owned_by(u) => WriteDecision::allowed(OWNER_SETTABLE),
            _ => WriteDecision::Denied,
        })
    }

    async fn can_delete(&self, user: Option<&User>) -> ModelResult<bool> {
        Ok(user.is_some_and(|u| u.is_admin() || self.is_owned_by(u)))
    }

    /// Setting `title` also derives `slug`; an explicit `slug` later in the
    /// sequence replaces the derived one.
    fn set_field(document: &mut Document, field: &str, value: Value) {
        if field == "title" {
            if let Value::String(title) = &value {
                document.insert("slug".to_string(), Value::String(slugify(title)));
            }
        }
        document.insert(field.to_string(), value);
    }
}

/// Lower-case, ASCII-alphanumeric words joined by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use exposer_auth::Role;
    use exposer_core::UserId;
    use proptest::prelude::*;
    use serde_json::json;

    fn user() -> User {
        User::new(UserId::new(), vec![])
    }

    fn admin() -> User {
        User::new(UserId::new(), vec![Role::admin()])
    }

    fn article(owner: &User, published: bool) -> Article {
        Article {
            id: ObjectId::new(),
            title: "Hello".into(),
            slug: Some("hello".into()),
            body: "text".into(),
            published,
            priority: 1,
            notes: Some("private".into()),
            owner: Some(owner.id().to_string()),
        }
    }

    #[test]
    fn read_decisions_by_audience() {
        let owner = user();
        let draft = article(&owner, false);
        let live = article(&owner, true);

        assert_eq!(draft.can_read(Some(&owner)), ReadDecision::AllFields);
        assert_eq!(draft.can_read(Some(&admin())), ReadDecision::AllFields);

        let member = draft.can_read(Some(&user()));
        assert!(member.permits("priority"));
        assert!(!member.permits("notes"));

        assert_eq!(draft.can_read(None), ReadDecision::fields(["title"]));
        let public = live.can_read(None);
        assert!(public.permits("body"));
        assert!(!public.permits("priority"));
        assert!(!public.permits("notes"));
    }

    #[tokio::test]
    async fn write_decisions_by_audience() {
        let owner = user();
        let a = article(&owner, false);

        assert_eq!(a.can_update(None).await.unwrap(), WriteDecision::Denied);
        assert_eq!(a.can_update(Some(&user())).await.unwrap(), WriteDecision::Denied);

        let WriteDecision::Allowed(fields) = a.can_update(Some(&owner)).await.unwrap() else {
            panic!("owner must be allowed");
        };
        assert!(!fields.iter().any(|f| f == "priority" || f == "owner"));

        let WriteDecision::Allowed(fields) = a.can_update(Some(&admin())).await.unwrap() else {
            panic!("admin must be allowed");
        };
        assert_eq!(fields.last().map(String::as_str), Some("owner"));
    }

    #[tokio::test]
    async fn delete_requires_owner_or_admin() {
        let owner = user();
        let a = article(&owner, true);
        assert!(a.can_delete(Some(&owner)).await.unwrap());
        assert!(a.can_delete(Some(&admin())).await.unwrap());
        assert!(!a.can_delete(Some(&user())).await.unwrap());
        assert!(!a.can_delete(None).await.unwrap());
    }

    #[test]
    fn creation_requires_a_user() {
        assert!(!Article::can_create(None));
        assert!(Article::can_create(Some(&user())));
    }

    #[test]
    fn title_setter_derives_slug_and_later_slug_wins() {
        let mut doc = Document::new();
        Article::set_field(&mut doc, "title", json!("Hello, Big World!"));
        assert_eq!(doc.get("slug"), Some(&json!("hello-big-world")));

        Article::set_field(&mut doc, "slug", json!("custom"));
        assert_eq!(doc.get("slug"), Some(&json!("custom")));
        assert_eq!(doc.get("title"), Some(&json!("Hello, Big World!")));
    }

    #[test]
    fn slugify_edges() {
        assert_eq!(slugify("  --Rust 2024--  "), "rust-2024");
        assert_eq!(slugify("!!!"), "");
    }

    proptest! {
        #[test]
        fn slugs_are_url_safe(title in ".{0,60}") {
            let slug = slugify(&title);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }
    }
}
