//! Typed methods a model may expose over the API.
//!
//! Methods are plain async functions registered by name on the exposure
//! descriptor; nothing is looked up by reflection.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use exposer_auth::User;
use exposer_core::ModelError;

use crate::{Model, Store};

/// What a method hands back. Items are projected per caller before leaving the API.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodOutput<M> {
    Item(M),
    Items(Vec<M>),
    Value(Value),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MethodError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("authentication required")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("not implemented")]
    NotImplemented,
}

impl MethodError {
    /// `Unauthorized` for anonymous callers, `Forbidden` otherwise.
    pub fn denied(user: Option<&User>) -> Self {
        if user.is_some() {
            Self::Forbidden
        } else {
            Self::Unauthorized
        }
    }

    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}

pub type MethodFuture<M> = Pin<Box<dyn Future<Output = Result<MethodOutput<M>, MethodError>> + Send>>;

/// Invocation of a method on one stored item.
pub struct InstanceCall<M: Model> {
    pub item: M,
    pub user: Option<User>,
    pub args: Value,
    pub store: Arc<dyn Store<M>>,
}

/// Invocation of a model-level method.
pub struct StaticCall<M: Model> {
    pub user: Option<User>,
    pub args: Value,
    pub store: Arc<dyn Store<M>>,
}

pub type InstanceMethod<M> = Arc<dyn Fn(InstanceCall<M>) -> MethodFuture<M> + Send + Sync>;

pub type StaticMethod<M> = Arc<dyn Fn(StaticCall<M>) -> MethodFuture<M> + Send + Sync>;
