use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::context::CurrentUser;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Identity the request was resolved to; `null` for anonymous callers.
pub async fn whoami(user: CurrentUser) -> impl IntoResponse {
    Json(match user.user() {
        Some(u) => json!({
            "user_id": u.id().to_string(),
            "roles": u.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
        }),
        None => json!({ "user_id": null, "roles": [] }),
    })
}
