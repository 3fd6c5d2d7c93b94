//! Wire shapes.
//!
//! The platform's clients speak camelCase JSON (`topicsCount`, `isLocked`),
//! so every response goes through a DTO here instead of serializing domain
//! structs directly. Creation responses echo only the fields the legacy API
//! returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domains::{Category, Notification, NotificationKind, Post, Topic, TopicSortKey};
use services::{CategoryCounts, PostPage, TopicPage};

// ── Requests ─────────────────────────────────────────────────────────────

/// Fields are optional so that an absent field reports as a 400 validation
/// failure rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    /// Kept as a string: an unparseable id is "no such category", not a
    /// malformed request.
    pub category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReplyRequest {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LockRequest {
    pub locked: bool,
}

#[derive(Debug, Deserialize)]
pub struct PinRequest {
    pub pinned: bool,
}

#[derive(Debug, Deserialize)]
pub struct TopicListQuery {
    #[serde(default)]
    pub sort: TopicSortKey,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PostListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// ── Responses ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub topics_count: i64,
    pub posts_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            icon: c.icon,
            color: c.color,
            topics_count: c.topics_count,
            posts_count: c.posts_count,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreatedDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
}

impl From<Category> for CategoryCreatedDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            icon: c.icon,
            color: c.color,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDto {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub category_id: Uuid,
    pub replies_count: i64,
    pub views_count: i64,
    pub likes_count: i64,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Topic> for TopicDto {
    fn from(t: Topic) -> Self {
        Self {
            id: t.id,
            title: t.title,
            author_id: t.author_id,
            category_id: t.category_id,
            replies_count: t.replies_count,
            views_count: t.views_count,
            likes_count: t.likes_count,
            is_pinned: t.is_pinned,
            is_locked: t.is_locked,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicCreatedDto {
    pub id: Uuid,
    pub title: String,
    pub category_id: Uuid,
}

impl From<Topic> for TopicCreatedDto {
    fn from(t: Topic) -> Self {
        Self {
            id: t.id,
            title: t.title,
            category_id: t.category_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicPageDto {
    pub topics: Vec<TopicDto>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

impl From<TopicPage> for TopicPageDto {
    fn from(p: TopicPage) -> Self {
        Self {
            topics: p.topics.into_iter().map(TopicDto::from).collect(),
            total: p.total,
            page: p.page,
            per_page: p.per_page,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDto {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub likes_count: i64,
    pub is_original_post: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostDto {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            topic_id: p.topic_id,
            content: p.content,
            author_id: p.author_id,
            likes_count: p.likes_count,
            is_original_post: p.is_original_post,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyCreatedDto {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub content: String,
}

impl From<Post> for ReplyCreatedDto {
    fn from(p: Post) -> Self {
        Self {
            id: p.id,
            topic_id: p.topic_id,
            content: p.content,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPageDto {
    pub posts: Vec<PostDto>,
    pub total_replies: i64,
    pub total_pages: i64,
    pub page: i64,
    pub per_page: i64,
}

impl From<PostPage> for PostPageDto {
    fn from(p: PostPage) -> Self {
        Self {
            posts: p.posts.into_iter().map(PostDto::from).collect(),
            total_replies: p.total_replies,
            total_pages: p.total_pages,
            page: p.page,
            per_page: p.per_page,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: Uuid,
    pub user_id: Uuid,
    /// The legacy wire name for the kind discriminator.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_user: Option<Uuid>,
    pub urgent: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationDto {
    fn from(n: Notification) -> Self {
        Self {
            id: n.id,
            user_id: n.user_id,
            kind: n.kind,
            message: n.message,
            read: n.read,
            link: n.link,
            from_user: n.from_user,
            urgent: n.urgent,
            created_at: n.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountsDto {
    pub topics_count: i64,
    pub posts_count: i64,
}

impl From<CategoryCounts> for CountsDto {
    fn from(c: CategoryCounts) -> Self {
        Self {
            topics_count: c.topics_count,
            posts_count: c.posts_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessDto {
    pub success: bool,
}

impl SuccessDto {
    pub fn ok() -> Self {
        Self { success: true }
    }
}
