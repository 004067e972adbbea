use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use exposer_core::Document;
use exposer_model::{Model, WriteDecision, to_document};

use crate::context::CurrentUser;
use crate::exposure::dto::Envelope;
use crate::exposure::extract::{ItemId, JsonBody};
use crate::exposure::formatter::format_for;
use crate::exposure::{ApiError, Exposure};

/// Check, apply, save. Not atomic: a concurrent save between the fetch and
/// ours is overwritten (last writer wins).
pub async fn update<M: Model>(
    State(exposure): State<Exposure<M>>,
    user: CurrentUser,
    ItemId(id): ItemId,
    JsonBody(body): JsonBody<Document>,
) -> Result<Response, ApiError> {
    let store = exposure.store();
    let Some(item) = store.find_by_id(&id).await? else {
        return Err(ApiError::NotFound);
    };

    let user = user.user();
    let settable = match item.can_update(user).await.map_err(ApiError::internal)? {
        WriteDecision::Allowed(fields) => fields,
        WriteDecision::Denied => {
            tracing::warn!(model = M::NAME, %id, "update denied");
            return Err(ApiError::denied(user));
        }
    };

    let mut document = to_document(&item)?;
    for field in &settable {
        if let Some(value) = body.get(field) {
            M::set_field(&mut document, field, value.clone());
        }
    }

    let saved = store.save(&id, document).await?;
    tracing::info!(model = M::NAME, %id, "item updated");

    Ok(Envelope::ok(StatusCode::OK, format_for(&saved, user)?).into_response())
}

/// `POST /:id` is never an update, whatever the body or caller.
pub async fn method_not_allowed(ItemId(_id): ItemId) -> ApiError {
    ApiError::MethodNotAllowed
}
