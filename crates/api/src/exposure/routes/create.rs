use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::Value;

use exposer_core::Document;
use exposer_model::{Model, Schema};

use crate::context::CurrentUser;
use crate::exposure::dto::Envelope;
use crate::exposure::extract::JsonBody;
use crate::exposure::formatter::format_for;
use crate::exposure::{ApiError, Exposure};

pub async fn create<M: Model>(
    State(exposure): State<Exposure<M>>,
    user: CurrentUser,
    JsonBody(body): JsonBody<Document>,
) -> Result<Response, ApiError> {
    let user = user.user();
    if !M::can_create(user) {
        tracing::warn!(model = M::NAME, "create denied");
        return Err(ApiError::denied(user));
    }

    let schema = M::schema();
    let mut document = assign_fields::<M>(&schema, body);

    // The owner field is never taken from the body.
    let owner_field = exposure.descriptor().owner_field();
    if schema.has_field(owner_field) {
        match user {
            Some(u) => {
                document.insert(owner_field.to_string(), Value::String(u.id().to_string()));
            }
            None => {
                document.remove(owner_field);
            }
        }
    }

    let item = exposure.store().create(document).await?;
    tracing::info!(model = M::NAME, id = %item.id(), "item created");

    Ok(Envelope::ok(StatusCode::CREATED, format_for(&item, user)?).into_response())
}

/// Run each incoming schema field through `M::set_field`, in schema order,
/// so derived state is computed the same way as on update.
fn assign_fields<M: Model>(schema: &Schema, mut body: Document) -> Document {
    let mut document = Document::new();
    for spec in schema.fields() {
        if let Some(value) = body.remove(spec.name) {
            M::set_field(&mut document, spec.name, value);
        }
    }
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use exposer_articles::Article;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test documents are objects"),
        }
    }

    #[test]
    fn create_input_goes_through_setters() {
        let out = assign_fields::<Article>(&Article::schema(), doc(json!({"title": "Fresh Start", "rogue": 1})));
        assert_eq!(Value::Object(out), json!({"title": "Fresh Start", "slug": "fresh-start"}));
    }

    #[test]
    fn explicit_slug_follows_title_in_schema_order() {
        let out = assign_fields::<Article>(
            &Article::schema(),
            doc(json!({"slug": "chosen", "title": "Fresh Start"})),
        );
        assert_eq!(out.get("slug"), Some(&json!("chosen")));
    }
}
