//! # storage-adapters
//!
//! Implementations of the `domains` storage ports. [`MemoryStore`] backs
//! tests and single-node trials; [`postgres::PgStore`] (feature
//! `db-postgres`) is the production backend.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::MemoryStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PgStore;
