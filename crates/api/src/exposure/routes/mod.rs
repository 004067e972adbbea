//! Handlers behind the routes registered by [`super::mount`].

mod create;
mod delete;
mod list;
mod methods;
mod read;
mod update;

pub use create::create;
pub use delete::delete;
pub use list::list;
pub use methods::{invoke_instance, invoke_static};
pub use read::read;
pub use update::{method_not_allowed, update};
