//! # api-adapters
//!
//! The HTTP edge of Quarterdeck: axum routes, wire DTOs, error mapping, and
//! the Prometheus operation counters. Everything axum-facing sits behind the
//! `web-axum` feature; the metrics registry is feature-independent so other
//! fronts can share it.

pub mod metrics;

#[cfg(feature = "web-axum")]
pub mod dto;
#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod router;

pub use metrics::ApiMetrics;

#[cfg(feature = "web-axum")]
pub use error::ApiError;
#[cfg(feature = "web-axum")]
pub use handlers::AppState;
#[cfg(feature = "web-axum")]
pub use router::router;
