//! Infrastructure layer: storage backends for exposed models.

pub mod store;

pub use store::InMemoryStore;
