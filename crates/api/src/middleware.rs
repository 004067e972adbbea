use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use exposer_auth::{JwtValidator, User};

use crate::context::CurrentUser;
use crate::exposure::ApiError;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Resolve the bearer token (if any) into a [`CurrentUser`] extension.
///
/// No `Authorization` header means an anonymous caller; a header that is
/// present but unusable is rejected with 401.
pub async fn resolve_user(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    let user = match extract_bearer(req.headers()) {
        Ok(None) => None,
        Ok(Some(token)) => match state.jwt.validate(token, Utc::now()) {
            Ok(claims) => Some(User::from(claims)),
            Err(e) => {
                tracing::warn!(error = %e, "rejected bearer token");
                return ApiError::Unauthorized.into_response();
            }
        },
        Err(e) => return e.into_response(),
    };

    req.extensions_mut().insert(CurrentUser::new(user));
    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header.to_str().map_err(|_| ApiError::Unauthorized)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?
        .trim();
    if token.is_empty() {
        return Err(ApiError::Unauthorized);
    }

    Ok(Some(token))
}

/// Log the outcome of every request routed to an exposed model.
pub async fn error_stage(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if response.status().is_server_error() {
        tracing::error!(%method, %path, status, elapsed_ms, "request failed");
    } else if response.status().is_client_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, "request rejected");
    } else {
        tracing::debug!(%method, %path, status, elapsed_ms, "request handled");
    }

    response
}
