//! # domains
//!
//! The central models, port contracts, and policy for Quarterdeck. Adapter
//! crates implement the ports; the services crate composes them.

pub mod authz;
pub mod error;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use authz::*;
pub use error::*;
pub use models::*;
pub use ports::*;
