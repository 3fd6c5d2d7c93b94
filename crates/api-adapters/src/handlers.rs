//! Route handlers.
//!
//! Handlers stay thin: decode the wire shape, call the service, record the
//! outcome metric, and map the result back out. All policy (validation,
//! authorization, counter sequencing) lives in the services.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use domains::{DomainError, IdentityProvider};
use services::{
    ForumService, NewCategory, NewTopic, NotificationService, POSTS_PER_PAGE, TOPICS_PER_PAGE,
};

use crate::dto::{
    CategoryCreatedDto, CategoryDto, CountsDto, CreateCategoryRequest, CreateReplyRequest,
    CreateTopicRequest, LockRequest, NotificationDto, PinRequest, PostListQuery, PostPageDto,
    ReplyCreatedDto, SuccessDto, TopicCreatedDto, TopicDto, TopicListQuery, TopicPageDto,
};
use crate::error::ApiError;
use crate::extract::{MaybeActor, RequireActor};
use crate::metrics::ApiMetrics;

/// Everything the routes need, shared across workers.
#[derive(Clone)]
pub struct AppState {
    pub forum: Arc<ForumService>,
    pub notifications: Arc<NotificationService>,
    pub identity: Arc<dyn IdentityProvider>,
    pub metrics: ApiMetrics,
}

/// An unparseable id cannot reference anything, so it reports as the same
/// `NotFound` an unknown-but-well-formed id would.
fn parse_id(entity: &'static str, raw: &str) -> domains::Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| DomainError::NotFound(entity, Uuid::nil()))
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn metrics(State(state): State<AppState>) -> Result<String, ApiError> {
    state
        .metrics
        .encode_text()
        .map_err(|err| DomainError::storage(err).into())
}

// ── Categories ───────────────────────────────────────────────────────────

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryDto>>, ApiError> {
    let result = state.forum.list_categories().await;
    state.metrics.record("list_categories", &result);
    Ok(Json(result?.into_iter().map(CategoryDto::from).collect()))
}

pub async fn create_category(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryCreatedDto>), ApiError> {
    let result = state
        .forum
        .create_category(
            &actor,
            NewCategory {
                name: req.name.unwrap_or_default(),
                description: req.description.unwrap_or_default(),
                icon: req.icon,
                color: req.color,
            },
        )
        .await;
    state.metrics.record("create_category", &result);
    Ok((StatusCode::CREATED, Json(CategoryCreatedDto::from(result?))))
}

pub async fn list_topics(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
    Query(query): Query<TopicListQuery>,
) -> Result<Json<TopicPageDto>, ApiError> {
    let result = async {
        let category_id = parse_id("Category", &category_id)?;
        state
            .forum
            .list_topics(
                category_id,
                query.sort,
                query.page.unwrap_or(1),
                query.per_page.unwrap_or(TOPICS_PER_PAGE),
            )
            .await
    }
    .await;
    state.metrics.record("list_topics", &result);
    Ok(Json(TopicPageDto::from(result?)))
}

pub async fn reconcile_category(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(category_id): Path<String>,
) -> Result<Json<CountsDto>, ApiError> {
    let result = async {
        let category_id = parse_id("Category", &category_id)?;
        state.forum.reconcile_category(&actor, category_id).await
    }
    .await;
    state.metrics.record("reconcile_category", &result);
    Ok(Json(CountsDto::from(result?)))
}

// ── Topics ───────────────────────────────────────────────────────────────

pub async fn create_topic(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Json(req): Json<CreateTopicRequest>,
) -> Result<(StatusCode, Json<TopicCreatedDto>), ApiError> {
    let result = async {
        // The legacy API reports any missing field as one validation failure.
        let (title, content, category_id) = match (req.title, req.content, req.category_id) {
            (Some(title), Some(content), Some(category_id)) if !category_id.trim().is_empty() => {
                (title, content, category_id)
            }
            _ => {
                return Err(DomainError::Validation(
                    "Title, content, and category are required".to_string(),
                ))
            }
        };
        let category_id = parse_id("Category", &category_id)?;
        state
            .forum
            .create_topic(
                &actor,
                NewTopic {
                    title,
                    content,
                    category_id,
                },
            )
            .await
    }
    .await;
    state.metrics.record("create_topic", &result);
    Ok((StatusCode::CREATED, Json(TopicCreatedDto::from(result?))))
}

pub async fn get_topic(
    State(state): State<AppState>,
    MaybeActor(viewer): MaybeActor,
    Path(topic_id): Path<String>,
) -> Result<Json<TopicDto>, ApiError> {
    let result = async {
        let topic_id = parse_id("Topic", &topic_id)?;
        state.forum.get_topic(viewer.as_ref(), topic_id).await
    }
    .await;
    state.metrics.record("get_topic", &result);
    Ok(Json(TopicDto::from(result?)))
}

pub async fn list_posts(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<PostPageDto>, ApiError> {
    let result = async {
        let topic_id = parse_id("Topic", &topic_id)?;
        state
            .forum
            .list_posts(
                topic_id,
                query.page.unwrap_or(1),
                query.per_page.unwrap_or(POSTS_PER_PAGE),
            )
            .await
    }
    .await;
    state.metrics.record("list_posts", &result);
    Ok(Json(PostPageDto::from(result?)))
}

pub async fn create_reply(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(topic_id): Path<String>,
    Json(req): Json<CreateReplyRequest>,
) -> Result<(StatusCode, Json<ReplyCreatedDto>), ApiError> {
    let result = async {
        let topic_id = parse_id("Topic", &topic_id)?;
        state
            .forum
            .create_reply(&actor, topic_id, req.content.as_deref().unwrap_or_default())
            .await
    }
    .await;
    state.metrics.record("create_reply", &result);
    Ok((StatusCode::CREATED, Json(ReplyCreatedDto::from(result?))))
}

pub async fn set_locked(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(topic_id): Path<String>,
    Json(req): Json<LockRequest>,
) -> Result<Json<TopicDto>, ApiError> {
    let result = async {
        let topic_id = parse_id("Topic", &topic_id)?;
        state.forum.set_locked(&actor, topic_id, req.locked).await
    }
    .await;
    state.metrics.record("set_locked", &result);
    Ok(Json(TopicDto::from(result?)))
}

pub async fn set_pinned(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(topic_id): Path<String>,
    Json(req): Json<PinRequest>,
) -> Result<Json<TopicDto>, ApiError> {
    let result = async {
        let topic_id = parse_id("Topic", &topic_id)?;
        state.forum.set_pinned(&actor, topic_id, req.pinned).await
    }
    .await;
    state.metrics.record("set_pinned", &result);
    Ok(Json(TopicDto::from(result?)))
}

// ── Notifications ────────────────────────────────────────────────────────

pub async fn list_notifications(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
) -> Result<Json<Vec<NotificationDto>>, ApiError> {
    let result = state.notifications.list(&actor).await;
    state.metrics.record("list_notifications", &result);
    Ok(Json(
        result?.into_iter().map(NotificationDto::from).collect(),
    ))
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
    Path(id): Path<String>,
) -> Result<Json<SuccessDto>, ApiError> {
    // Marking an unknown id silently succeeds, and an unparseable id cannot
    // name any record, so it takes the same path.
    let result = match Uuid::parse_str(&id) {
        Ok(id) => state.notifications.mark_read(&actor, id).await,
        Err(_) => Ok(()),
    };
    state.metrics.record("mark_notification_read", &result);
    result?;
    Ok(Json(SuccessDto::ok()))
}

pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    RequireActor(actor): RequireActor,
) -> Result<Json<SuccessDto>, ApiError> {
    let result = state.notifications.mark_all_read(&actor).await;
    state.metrics.record("mark_all_notifications_read", &result);
    result?;
    Ok(Json(SuccessDto::ok()))
}
