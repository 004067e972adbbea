//! The resolved caller identity.

use serde::{Deserialize, Serialize};

use exposer_core::UserId;

use crate::{JwtClaims, Role};

/// An authenticated user, as resolved for one request.
///
/// Anonymous callers are represented by the absence of a `User`
/// (`Option<&User>` throughout the model contract).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    roles: Vec<Role>,
}

impl User {
    pub fn new(id: UserId, roles: Vec<Role>) -> Self {
        Self { id, roles }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::ADMIN)
    }

    /// Whether `owner` (as stored in an owner field) names this user.
    pub fn owns(&self, owner: Option<&str>) -> bool {
        owner.is_some_and(|o| o == self.id.to_string())
    }
}

impl From<JwtClaims> for User {
    fn from(claims: JwtClaims) -> Self {
        Self::new(claims.sub, claims.roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_compares_textual_id() {
        let user = User::new(UserId::new(), vec![]);
        let id = user.id().to_string();
        assert!(user.owns(Some(&id)));
        assert!(!user.owns(Some("someone-else")));
        assert!(!user.owns(None));
    }

    #[test]
    fn admin_role_is_detected() {
        let user = User::new(UserId::new(), vec![Role::new("viewer"), Role::admin()]);
        assert!(user.is_admin());
        assert!(user.has_role("viewer"));
        assert!(!User::new(UserId::new(), vec![]).is_admin());
    }
}
