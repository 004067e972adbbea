//! HTTP API: the model exposure engine plus the server that hosts it.

pub mod app;
pub mod config;
pub mod context;
pub mod exposure;
pub mod middleware;
