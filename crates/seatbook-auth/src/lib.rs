//! # seatbook-auth
//!
//! Resolves a bearer credential into an employee [`Identity`]. The
//! production provider verifies ID tokens against a JSON Web Key Set that
//! is fetched on demand and cached per key id.

pub mod claims;
pub mod identity;
pub mod jwks;
pub mod provider;

pub use identity::{Identity, IdentityProvider};
pub use jwks::{HttpJwksSource, JwksCache, JwksSource, StaticJwksSource};
pub use provider::JwksIdentityProvider;
