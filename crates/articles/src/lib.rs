//! `exposer-articles`: a sample exposed model with owner-based capabilities.

pub mod article;
pub mod methods;

pub use article::{Article, slugify};
pub use methods::{count_published, publish, search};
