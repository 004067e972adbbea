//! Extractors whose rejections speak the engine's error envelope.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use exposer_core::ObjectId;

use super::ApiError;

/// Item identifier from the `:id` path segment.
///
/// Segments that are not well-formed identifiers never reach a handler; they
/// are answered like any unknown endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemId(pub ObjectId);

#[async_trait]
impl<S> FromRequestParts<S> for ItemId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::EndpointNotFound)?;
        raw.parse().map(ItemId).map_err(|_| ApiError::EndpointNotFound)
    }
}

/// JSON request body; malformed input is a 400 envelope.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}
