//! Error taxonomy of the exposure engine and its JSON envelope.
//!
//! Every failure leaving an exposed route goes through [`ApiError`]; the
//! `From` impls below are the translation from model/method errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use thiserror::Error;

use exposer_auth::User;
use exposer_core::{FieldViolation, ModelError};
use exposer_model::MethodError;

use super::dto::{ErrorEntry, ErrorEnvelope};

pub const ENDPOINT_NOT_FOUND_MESSAGE: &str = "This API endpoint do not exists!";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    #[error("duplicate value for `{field}`")]
    Duplicate { field: String, value: Value },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("authentication required")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("method `{0}` is not exposed")]
    MethodNotExposed(String),

    #[error("endpoint does not exist")]
    EndpointNotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("not implemented")]
    NotImplemented,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// `Unauthorized` for anonymous callers, `Forbidden` otherwise.
    pub fn denied(user: Option<&User>) -> Self {
        if user.is_some() {
            Self::Forbidden
        } else {
            Self::Unauthorized
        }
    }

    /// Wrap a failure that must never be classified as a client error
    /// (capability checks, invariant breaks).
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Duplicate { .. } | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound | Self::MethodNotExposed(_) | Self::EndpointNotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotImplemented => StatusCode::NOT_IMPLEMENTED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        let code = self.status().as_u16();
        match self {
            Self::Validation(violations) => ErrorEnvelope::new(code, "Validation failed").with_errors(
                violations
                    .iter()
                    .map(|v| ErrorEntry::for_field(code, &v.message, &v.field, v.value.clone()))
                    .collect(),
            ),
            Self::Duplicate { field, value } => ErrorEnvelope::new(code, "Duplicate entry")
                .with_errors(vec![ErrorEntry::for_field(code, "Duplicate entry", field, value.clone())]),
            Self::BadRequest(detail) => {
                ErrorEnvelope::new(code, "Bad Request").with_errors(vec![ErrorEntry::new(code, detail)])
            }
            Self::Unauthorized => ErrorEnvelope::new(code, "Unauthorized"),
            Self::Forbidden => ErrorEnvelope::new(code, "Forbidden"),
            Self::NotFound => ErrorEnvelope::new(code, "Not found"),
            Self::MethodNotExposed(name) => {
                ErrorEnvelope::new(code, format!("Method {name} is not exposed"))
            }
            Self::EndpointNotFound => {
                ErrorEnvelope::bare(vec![ErrorEntry::new(code, ENDPOINT_NOT_FOUND_MESSAGE)])
            }
            Self::MethodNotAllowed => ErrorEnvelope::new(code, "Method Not Allowed"),
            Self::NotImplemented => ErrorEnvelope::new(code, "Not Implemented"),
            Self::Internal(_) => ErrorEnvelope::new(code, "Internal Server Error"),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(violations) => Self::Validation(violations),
            ModelError::Duplicate { field, value } => Self::Duplicate { field, value },
            other => Self::internal(other),
        }
    }
}

impl From<MethodError> for ApiError {
    fn from(err: MethodError) -> Self {
        match err {
            MethodError::Model(e) => e.into(),
            MethodError::Unauthorized => Self::Unauthorized,
            MethodError::Forbidden => Self::Forbidden,
            MethodError::InvalidArguments(msg) => Self::BadRequest(msg),
            MethodError::NotImplemented => Self::NotImplemented,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "unclassified failure");
        }
        (self.status(), axum::Json(self.envelope())).into_response()
    }
}
