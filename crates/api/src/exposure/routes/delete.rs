use axum::{extract::State, response::IntoResponse, response::Response};

use exposer_model::Model;

use crate::context::CurrentUser;
use crate::exposure::dto::Acknowledgement;
use crate::exposure::extract::ItemId;
use crate::exposure::{ApiError, Exposure};

pub async fn delete<M: Model>(
    State(exposure): State<Exposure<M>>,
    user: CurrentUser,
    ItemId(id): ItemId,
) -> Result<Response, ApiError> {
    let store = exposure.store();
    let Some(item) = store.find_by_id(&id).await? else {
        return Err(ApiError::NotFound);
    };

    let user = user.user();
    if !item.can_delete(user).await.map_err(ApiError::internal)? {
        tracing::warn!(model = M::NAME, %id, "delete denied");
        return Err(ApiError::denied(user));
    }

    // A concurrent delete may have won the race.
    if !store.remove(&id).await? {
        return Err(ApiError::NotFound);
    }
    tracing::info!(model = M::NAME, %id, "item deleted");

    Ok(Acknowledgement::ok("Deleted").into_response())
}
