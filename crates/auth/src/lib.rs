//! `exposer-auth`: the resolved caller identity and bearer-token validation.
//!
//! Decoupled from HTTP: the API layer turns a validated token into a [`User`]
//! and hands it to the exposure engine.

pub mod claims;
pub mod jwt;
pub mod roles;
pub mod user;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use roles::Role;
pub use user::User;
