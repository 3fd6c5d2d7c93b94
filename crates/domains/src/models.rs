//! # Domain Models
//!
//! Core entities of the Quarterdeck forum. Identifiers are UUID v7 so that
//! ids sort in creation order — reply ordering ties on equal timestamps are
//! broken by id without a separate sequence column.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A top-level forum grouping (e.g., "Navigation & Equipment").
///
/// `topics_count` and `posts_count` are denormalized: they are bumped
/// incrementally on write and only recomputed by reconciliation, so they can
/// briefly undercount after a partial failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Symbolic icon name rendered by the UI (e.g., "Compass").
    pub icon: String,
    /// Symbolic color name rendered by the UI (e.g., "blue").
    pub color: String,
    pub topics_count: i64,
    pub posts_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub const DEFAULT_ICON: &'static str = "MessageCircle";
    pub const DEFAULT_COLOR: &'static str = "blue";

    /// Builds a fresh category with zeroed counters and defaulted icon/color.
    pub fn new(
        name: String,
        description: String,
        icon: Option<String>,
        color: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            description,
            icon: icon.unwrap_or_else(|| Self::DEFAULT_ICON.to_string()),
            color: color.unwrap_or_else(|| Self::DEFAULT_COLOR.to_string()),
            topics_count: 0,
            posts_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A discussion thread within a category.
///
/// `is_pinned` and `is_locked` are two independent toggles, not one combined
/// status: a topic can be pinned-and-locked, pinned-and-unlocked, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub id: Uuid,
    pub category_id: Uuid,
    /// Reference into the external identity provider; not owned here.
    pub author_id: Uuid,
    pub title: String,
    /// Number of non-original posts under this topic.
    pub replies_count: i64,
    pub views_count: i64,
    pub likes_count: i64,
    /// Pinned topics sort before unpinned ones regardless of sort key.
    pub is_pinned: bool,
    /// While locked, reply creation is rejected.
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Topic {
    /// Builds a fresh topic: counters at zero, unpinned and unlocked.
    pub fn new(title: String, author_id: Uuid, category_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            category_id,
            author_id,
            title,
            replies_count: 0,
            views_count: 0,
            likes_count: 0,
            is_pinned: false,
            is_locked: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Either the original post of a topic or a reply to it.
///
/// Exactly one post per topic carries `is_original_post = true`, written in
/// the same storage operation as the topic itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub likes_count: i64,
    pub is_original_post: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// The opening post, created together with its topic.
    pub fn original(topic_id: Uuid, author_id: Uuid, content: String, now: DateTime<Utc>) -> Self {
        Self::build(topic_id, author_id, content, true, now)
    }

    /// A reply to an existing, unlocked topic.
    pub fn reply(topic_id: Uuid, author_id: Uuid, content: String, now: DateTime<Utc>) -> Self {
        Self::build(topic_id, author_id, content, false, now)
    }

    fn build(
        topic_id: Uuid,
        author_id: Uuid,
        content: String,
        is_original_post: bool,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            topic_id,
            author_id,
            content,
            likes_count: 0,
            is_original_post,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Classifies a notification for rendering and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    Message,
    System,
    Support,
}

impl NotificationKind {
    /// Wire/storage spelling of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Follow => "follow",
            Self::Message => "message",
            Self::System => "system",
            Self::Support => "support",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "comment" => Ok(Self::Comment),
            "follow" => Ok(Self::Follow),
            "message" => Ok(Self::Message),
            "system" => Ok(Self::System),
            "support" => Ok(Self::Support),
            other => Err(format!("unknown notification kind: {other}")),
        }
    }
}

/// A per-user notification record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    /// Owning user; only they may read or mutate this record.
    pub user_id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub link: Option<String>,
    pub from_user: Option<Uuid>,
    pub urgent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: Uuid,
        kind: NotificationKind,
        message: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            kind,
            message,
            read: false,
            link: None,
            from_user: None,
            urgent: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_link(mut self, link: String) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_from_user(mut self, from_user: Uuid) -> Self {
        self.from_user = Some(from_user);
        self
    }
}

/// Actor role as asserted by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        };
        f.write_str(s)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "moderator" => Ok(Self::Moderator),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// The authenticated caller of an operation.
///
/// Quarterdeck trusts the id and role exactly as the identity provider
/// asserted them; there is no second lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub name: Option<String>,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self {
            id,
            role,
            name: None,
        }
    }

    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }
}

/// Secondary sort key for topic listings. Pinned topics always come first;
/// the key only orders topics within the pinned and unpinned groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicSortKey {
    /// `updated_at` descending.
    #[default]
    Recent,
    /// `created_at` ascending.
    Oldest,
    /// `replies_count` descending.
    MostReplies,
    /// `views_count` descending.
    MostViews,
    /// `likes_count` descending.
    MostLikes,
}
