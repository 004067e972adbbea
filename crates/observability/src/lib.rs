//! Process-wide tracing/logging setup.

pub mod tracing;

pub use self::tracing::{LogFormat, init};
