use axum::{extract::State, http::StatusCode, response::Response, response::IntoResponse};

use exposer_model::Model;

use crate::context::CurrentUser;
use crate::exposure::dto::Envelope;
use crate::exposure::extract::ItemId;
use crate::exposure::formatter::format_for;
use crate::exposure::{ApiError, Exposure};

pub async fn read<M: Model>(
    State(exposure): State<Exposure<M>>,
    user: CurrentUser,
    ItemId(id): ItemId,
) -> Result<Response, ApiError> {
    let Some(item) = exposure.store().find_by_id(&id).await? else {
        return Err(ApiError::NotFound);
    };
    Ok(Envelope::ok(StatusCode::OK, format_for(&item, user.user())?).into_response())
}
