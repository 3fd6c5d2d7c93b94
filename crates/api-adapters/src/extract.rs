//! Actor extraction from `Authorization: Bearer` headers.
//!
//! Two extractors: [`RequireActor`] rejects the request with 401 when no
//! valid token is presented, [`MaybeActor`] resolves to `None` instead so
//! public reads can still attribute views when a viewer happens to be
//! signed in.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use domains::{Actor, DomainError};

use crate::error::ApiError;
use crate::handlers::AppState;

/// The authenticated caller; absence is a 401.
pub struct RequireActor(pub Actor);

/// The caller if a valid token was sent; anonymous otherwise.
pub struct MaybeActor(pub Option<Actor>);

fn bearer_actor(parts: &Parts, state: &AppState) -> Option<Actor> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;
    state.identity.authenticate(token).ok()
}

impl FromRequestParts<AppState> for RequireActor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        bearer_actor(parts, state)
            .map(RequireActor)
            .ok_or_else(|| DomainError::Unauthorized("Unauthorized".to_string()).into())
    }
}

impl FromRequestParts<AppState> for MaybeActor {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeActor(bearer_actor(parts, state)))
    }
}
