//! JSON Web Key Set retrieval and caching.

pub mod cache;
pub mod source;

pub use cache::JwksCache;
pub use source::{HttpJwksSource, JwksSource, StaticJwksSource};
