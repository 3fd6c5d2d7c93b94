//! # auth-adapters
//!
//! Implementations of the `domains` identity port. The JWT provider
//! (feature `auth-jwt`) trusts HS256 tokens minted by the platform's login
//! service; Quarterdeck never sees credentials, only asserted identity.

#[cfg(feature = "auth-jwt")]
pub mod jwt;

#[cfg(feature = "auth-jwt")]
pub use jwt::{Claims, JwtIdentityProvider};
