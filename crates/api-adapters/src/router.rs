//! Route table and middleware stack.
//!
//! Paths are relative so the host binary picks the mount point (the server
//! nests this under `/api`). Request ids are minted here and propagated back
//! on the response so log lines and client reports can be matched up.

use axum::routing::{get, patch, post, put};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::metrics))
        .route(
            "/forum/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/forum/categories/{id}/topics",
            get(handlers::list_topics),
        )
        .route(
            "/forum/categories/{id}/recount",
            post(handlers::reconcile_category),
        )
        .route("/forum/topics", post(handlers::create_topic))
        .route("/forum/topics/{id}", get(handlers::get_topic))
        .route("/forum/topics/{id}/posts", get(handlers::list_posts))
        .route("/forum/topics/{id}/reply", post(handlers::create_reply))
        .route("/forum/topics/{id}/lock", patch(handlers::set_locked))
        .route("/forum/topics/{id}/pin", patch(handlers::set_pinned))
        .route("/notifications", get(handlers::list_notifications))
        .route(
            "/notifications/{id}/read",
            put(handlers::mark_notification_read),
        )
        .route(
            "/notifications/read-all",
            put(handlers::mark_all_notifications_read),
        )
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
