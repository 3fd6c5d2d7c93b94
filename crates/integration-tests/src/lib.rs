//! # integration-tests
//!
//! Shared harness for the cross-crate tests: the real router wired to the
//! in-memory store, plus helpers to mint tokens and drive requests through
//! `tower::ServiceExt::oneshot` without opening a socket.

#![cfg(feature = "web-axum")]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use api_adapters::{router, ApiMetrics, AppState};
use auth_adapters::JwtIdentityProvider;
use domains::{Actor, Role};
use services::{ForumService, NotificationService};
use storage_adapters::MemoryStore;

const SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    /// Direct handle to the backing store, for inducing states the HTTP
    /// surface cannot (counter drift, pre-seeded notifications).
    pub store: Arc<MemoryStore>,
    identity: Arc<JwtIdentityProvider>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(JwtIdentityProvider::new(SECRET));
        let state = AppState {
            forum: Arc::new(ForumService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store.clone(),
            )),
            notifications: Arc::new(NotificationService::new(store.clone())),
            identity: identity.clone(),
            metrics: ApiMetrics::new(),
        };
        Self {
            router: router(state),
            store,
            identity,
        }
    }

    /// A fresh actor of the given role together with a valid bearer token.
    pub fn actor(&self, role: Role) -> (Actor, String) {
        let actor = Actor::new(Uuid::new_v4(), role);
        let token = self.identity.issue(&actor, Duration::hours(1)).unwrap();
        (actor, token)
    }

    pub fn token(&self, role: Role) -> String {
        self.actor(role).1
    }

    /// Issues one request; the body comes back as JSON when it parses,
    /// otherwise as a plain string value.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
        (status, value)
    }

    /// Creates a category through the API and returns its id.
    pub async fn create_category(&self, admin_token: &str, name: &str) -> Uuid {
        let (status, body) = self
            .send(
                Method::POST,
                "/forum/categories",
                Some(admin_token),
                Some(serde_json::json!({
                    "name": name,
                    "description": format!("{name} discussions"),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        id_of(&body)
    }

    /// Creates a topic through the API and returns its id.
    pub async fn create_topic(
        &self,
        token: &str,
        category_id: Uuid,
        title: &str,
        content: &str,
    ) -> Uuid {
        let (status, body) = self
            .send(
                Method::POST,
                "/forum/topics",
                Some(token),
                Some(serde_json::json!({
                    "title": title,
                    "content": content,
                    "categoryId": category_id,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        id_of(&body)
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Pulls the `id` field out of a creation response.
pub fn id_of(body: &Value) -> Uuid {
    body["id"]
        .as_str()
        .unwrap_or_else(|| panic!("no id in {body}"))
        .parse()
        .unwrap()
}
