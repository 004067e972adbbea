//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: stores and the exposure descriptors of each model
//! - `routes/`: handlers that are not generated by the exposure engine

use std::sync::Arc;

use axum::{Router, routing::get};
use tower::ServiceBuilder;

use crate::config::ApiConfig;
use crate::exposure;
use crate::middleware;

pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the black-box tests).
pub fn build_app(config: &ApiConfig) -> Router {
    let jwt = Arc::new(exposer_auth::Hs256JwtValidator::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState { jwt };

    let services = services::build_services();

    let router = Router::new()
        .route("/health", get(routes::system::health))
        .route("/whoami", get(routes::system::whoami));

    services
        .mount(router, config)
        .fallback(exposure::endpoint_not_found)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::resolve_user,
        )))
}
