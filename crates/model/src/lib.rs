//! `exposer-model`: the storage/model contract consumed by the exposure engine.
//!
//! - [`Model`]: schema plus per-request read/write/delete capability decisions
//! - [`Store`]: async persistence (`find_by_id`, `find_all`, `create`, `save`, ...)
//! - [`method`]: typed instance/static methods a descriptor may expose

pub mod method;
pub mod model;
pub mod schema;
pub mod store;

pub use method::{
    InstanceCall, InstanceMethod, MethodError, MethodFuture, MethodOutput, StaticCall, StaticMethod,
};
pub use model::{ID_KEY, Model, ReadDecision, WriteDecision, from_document, to_document};
pub use schema::{FieldKind, FieldSpec, Schema};
pub use store::{Filter, Query, Sort, Store};

pub use exposer_auth::User;
pub use exposer_core::{Document, FieldViolation, ModelError, ModelResult, ObjectId};
