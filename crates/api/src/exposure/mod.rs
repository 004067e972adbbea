//! Model exposure engine.
//!
//! [`mount`] turns an [`ExposedModel`] descriptor plus a [`Store`] into REST
//! routes under the descriptor's mount point:
//! - `GET /` list, `POST /` create
//! - `GET /:id` read, `PUT /:id` update, `DELETE /:id` delete, `POST /:id` 405
//! - `POST /method` and `POST /:id/method` for registered methods
//! - anything else under the mount point gets the catch-all 404 envelope

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use exposer_model::{Model, Store};

pub mod descriptor;
pub mod dto;
pub mod errors;
pub mod extract;
pub mod formatter;
pub mod pagination;
pub mod routes;

pub use descriptor::ExposedModel;
pub use errors::ApiError;
pub use pagination::{DEFAULT_ITEMS_PER_PAGE, Pagination};

/// Shared state of one mounted model.
pub struct Exposure<M: Model> {
    descriptor: Arc<ExposedModel<M>>,
    store: Arc<dyn Store<M>>,
}

impl<M: Model> Clone for Exposure<M> {
    fn clone(&self) -> Self {
        Self {
            descriptor: Arc::clone(&self.descriptor),
            store: Arc::clone(&self.store),
        }
    }
}

impl<M: Model> Exposure<M> {
    pub fn new(descriptor: ExposedModel<M>, store: Arc<dyn Store<M>>) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            store,
        }
    }

    pub fn descriptor(&self) -> &ExposedModel<M> {
        &self.descriptor
    }

    pub fn store(&self) -> &Arc<dyn Store<M>> {
        &self.store
    }
}

/// Nest the routes of `descriptor` into `router`.
///
/// Mounting the same descriptor twice registers its routes twice; axum will
/// reject the overlap, so callers mount each model once.
pub fn mount<M: Model>(router: Router, descriptor: ExposedModel<M>, store: Arc<dyn Store<M>>) -> Router {
    let mount_point = descriptor.mount_point().to_string();
    tracing::info!(
        model = M::NAME,
        mount_point = %mount_point,
        instance_methods = ?descriptor.instance_method_names().collect::<Vec<_>>(),
        static_methods = ?descriptor.static_method_names().collect::<Vec<_>>(),
        "exposing model"
    );

    let exposure = Exposure::new(descriptor, store);
    let routes = Router::new()
        .route(
            "/",
            get(routes::list::<M>)
                .post(routes::create::<M>)
                .fallback(endpoint_not_found),
        )
        .route(
            "/:id",
            get(routes::read::<M>)
                .post(routes::method_not_allowed)
                .put(routes::update::<M>)
                .delete(routes::delete::<M>)
                .fallback(endpoint_not_found),
        )
        .route(
            "/:id/method",
            post(routes::invoke_instance::<M>).fallback(endpoint_not_found),
        )
        .route(
            "/method",
            post(routes::invoke_static::<M>).fallback(endpoint_not_found),
        )
        .fallback(endpoint_not_found)
        .layer(axum::middleware::from_fn(crate::middleware::error_stage))
        .with_state(exposure);

    router.nest(&mount_point, routes)
}

/// Catch-all for paths and verbs no exposed route handles.
pub async fn endpoint_not_found() -> ApiError {
    ApiError::EndpointNotFound
}
