//! # Core Traits (Ports)
//!
//! Storage and identity contracts implemented by the adapter crates. The
//! services compose these; nothing in this crate performs I/O itself.
//!
//! Counter mutations are expressed as increments so adapters can use their
//! engine's atomic add primitive rather than read-modify-write.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Actor, Category, Notification, Post, Topic, TopicSortKey};

/// Persistence contract for forum categories.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CategoryRepo: Send + Sync {
    /// All categories, insertion order.
    async fn list(&self) -> Result<Vec<Category>>;

    async fn insert(&self, category: Category) -> Result<()>;

    async fn find(&self, id: Uuid) -> Result<Option<Category>>;

    /// Atomic add on both denormalized counters plus `updated_at = now`.
    /// Succeeds silently when the id does not exist; callers pre-validate.
    async fn increment_counts(
        &self,
        id: Uuid,
        topics: i64,
        posts: i64,
        now: DateTime<Utc>,
    ) -> Result<()>;

    /// Absolute counter write used by reconciliation.
    async fn set_counts(
        &self,
        id: Uuid,
        topics_count: i64,
        posts_count: i64,
        now: DateTime<Utc>,
    ) -> Result<()>;
}

/// Persistence contract for topics.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TopicRepo: Send + Sync {
    /// Persists a topic together with its original post in a single storage
    /// operation, so a topic can never exist without its opening post.
    async fn insert_with_original(&self, topic: Topic, original_post: Post) -> Result<()>;

    async fn find(&self, id: Uuid) -> Result<Option<Topic>>;

    /// Atomic `replies_count + 1` and `updated_at = now`. `NotFound` when the
    /// topic does not exist.
    async fn increment_replies(&self, id: Uuid, now: DateTime<Utc>) -> Result<()>;

    /// Atomic `views_count + 1`. Views are not activity, so `updated_at` is
    /// left untouched.
    async fn increment_views(&self, id: Uuid) -> Result<()>;

    /// Absolute flag write; setting the current value again is a no-op
    /// success. Returns the topic as stored afterwards.
    async fn set_locked(&self, id: Uuid, locked: bool, now: DateTime<Utc>) -> Result<Topic>;

    /// Same contract as [`TopicRepo::set_locked`] for the pin flag.
    async fn set_pinned(&self, id: Uuid, pinned: bool, now: DateTime<Utc>) -> Result<Topic>;

    /// Topics of a category: pinned first, then `sort`, ties broken by id.
    /// `page` is 1-based.
    async fn list_by_category(
        &self,
        category_id: Uuid,
        sort: TopicSortKey,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<Topic>>;

    /// Source-of-truth topic count for reconciliation.
    async fn count_in_category(&self, category_id: Uuid) -> Result<i64>;
}

/// Persistence contract for posts (original posts and replies alike).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn insert(&self, post: Post) -> Result<()>;

    /// The post created together with the topic, if present.
    async fn find_original(&self, topic_id: Uuid) -> Result<Option<Post>>;

    /// Replies in creation order ascending (id tie-break), paginated.
    /// `page` is 1-based.
    async fn list_replies(&self, topic_id: Uuid, page: i64, per_page: i64) -> Result<Vec<Post>>;

    async fn count_replies(&self, topic_id: Uuid) -> Result<i64>;

    /// Posts under all topics of a category; reconciliation input.
    async fn count_in_category(&self, category_id: Uuid) -> Result<i64>;
}

/// Persistence contract for per-user notifications.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait NotificationRepo: Send + Sync {
    async fn insert(&self, notification: Notification) -> Result<()>;

    /// Newest first, capped at `limit`.
    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Notification>>;

    /// Owner-scoped read marking; silently succeeds when the id is unknown
    /// or owned by someone else.
    async fn mark_read(&self, user_id: Uuid, id: Uuid, now: DateTime<Utc>) -> Result<()>;

    async fn mark_all_read(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<()>;
}

/// Identity and role contract. Quarterdeck never verifies credentials itself;
/// it consumes the identity the provider asserts.
pub trait IdentityProvider: Send + Sync {
    /// Resolves a bearer token into the acting user.
    fn authenticate(&self, bearer_token: &str) -> Result<Actor>;
}
