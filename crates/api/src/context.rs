use core::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use exposer_auth::User;

/// The caller of the current request, if any.
///
/// Inserted as a request extension by [`crate::middleware::resolve_user`];
/// requests that never went through it are treated as anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentUser(Option<User>);

impl CurrentUser {
    pub fn new(user: Option<User>) -> Self {
        Self(user)
    }

    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> Option<User> {
        self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<CurrentUser>().cloned().unwrap_or_default())
    }
}
