//! # PostgreSQL Store
//!
//! Maps the relational schema under `migrations/` to the domain models.
//! Counter bumps are single `UPDATE ... SET n = n + 1` statements so the
//! database serializes concurrent writers; no read-modify-write cycles.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use domains::{
    Category, CategoryRepo, DomainError, Notification, NotificationRepo, Post, PostRepo, Result,
    Topic, TopicRepo, TopicSortKey,
};

pub struct PgStore {
    pool: PgPool,
}

fn db_err(err: sqlx::Error) -> DomainError {
    DomainError::storage(err)
}

fn category_from_row(row: &PgRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        icon: row.get("icon"),
        color: row.get("color"),
        topics_count: row.get("topics_count"),
        posts_count: row.get("posts_count"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn topic_from_row(row: &PgRow) -> Topic {
    Topic {
        id: row.get("id"),
        category_id: row.get("category_id"),
        author_id: row.get("author_id"),
        title: row.get("title"),
        replies_count: row.get("replies_count"),
        views_count: row.get("views_count"),
        likes_count: row.get("likes_count"),
        is_pinned: row.get("is_pinned"),
        is_locked: row.get("is_locked"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn post_from_row(row: &PgRow) -> Post {
    Post {
        id: row.get("id"),
        topic_id: row.get("topic_id"),
        author_id: row.get("author_id"),
        content: row.get("content"),
        likes_count: row.get("likes_count"),
        is_original_post: row.get("is_original_post"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn notification_from_row(row: &PgRow) -> Result<Notification> {
    Ok(Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        kind: row
            .get::<String, _>("kind")
            .parse()
            .map_err(DomainError::storage)?,
        message: row.get("message"),
        read: row.get("is_read"),
        link: row.get("link"),
        from_user: row.get("from_user"),
        urgent: row.get("urgent"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(db_err)?;
        Ok(Self::new(pool))
    }

    /// Saturating so an absurd page number becomes a huge-but-valid OFFSET
    /// (an empty page) instead of a negative one the database rejects.
    fn page_offset(page: i64, per_page: i64) -> i64 {
        page.saturating_sub(1).max(0).saturating_mul(per_page.max(0))
    }

    /// Applies the embedded migrations. Idempotent across restarts.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .map_err(DomainError::storage)?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CategoryRepo for PgStore {
    /// All categories; v7 ids make id order creation order.
    async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM forum_categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows.iter().map(category_from_row).collect())
    }

    async fn insert(&self, category: Category) -> Result<()> {
        sqlx::query(
            "INSERT INTO forum_categories \
             (id, name, description, icon, color, topics_count, posts_count, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(category.id)
        .bind(category.name)
        .bind(category.description)
        .bind(category.icon)
        .bind(category.color)
        .bind(category.topics_count)
        .bind(category.posts_count)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Category>> {
        let row = sqlx::query("SELECT * FROM forum_categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(category_from_row))
    }

    async fn increment_counts(
        &self,
        id: Uuid,
        topics: i64,
        posts: i64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE forum_categories \
             SET topics_count = topics_count + $2, posts_count = posts_count + $3, updated_at = $4 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(topics)
        .bind(posts)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn set_counts(
        &self,
        id: Uuid,
        topics_count: i64,
        posts_count: i64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE forum_categories \
             SET topics_count = $2, posts_count = $3, updated_at = $4 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(topics_count)
        .bind(posts_count)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}

#[async_trait]
impl TopicRepo for PgStore {
    /// Topic and original post in one transaction: neither row can exist
    /// without the other.
    async fn insert_with_original(&self, topic: Topic, original_post: Post) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // 1. Insert the topic
        sqlx::query(
            "INSERT INTO forum_topics \
             (id, category_id, author_id, title, replies_count, views_count, likes_count, \
              is_pinned, is_locked, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(topic.id)
        .bind(topic.category_id)
        .bind(topic.author_id)
        .bind(topic.title)
        .bind(topic.replies_count)
        .bind(topic.views_count)
        .bind(topic.likes_count)
        .bind(topic.is_pinned)
        .bind(topic.is_locked)
        .bind(topic.created_at)
        .bind(topic.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        // 2. Insert its original post
        sqlx::query(
            "INSERT INTO forum_posts \
             (id, topic_id, author_id, content, likes_count, is_original_post, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(original_post.id)
        .bind(original_post.topic_id)
        .bind(original_post.author_id)
        .bind(original_post.content)
        .bind(original_post.likes_count)
        .bind(original_post.is_original_post)
        .bind(original_post.created_at)
        .bind(original_post.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Topic>> {
        let row = sqlx::query("SELECT * FROM forum_topics WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(topic_from_row))
    }

    async fn increment_replies(&self, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        let result = sqlx::query(
            "UPDATE forum_topics \
             SET replies_count = replies_count + 1, updated_at = $2 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Topic", id));
        }
        Ok(())
    }

    async fn increment_views(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE forum_topics SET views_count = views_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Topic", id));
        }
        Ok(())
    }

    async fn set_locked(&self, id: Uuid, locked: bool, now: DateTime<Utc>) -> Result<Topic> {
        let row = sqlx::query(
            "UPDATE forum_topics SET is_locked = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(locked)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref()
            .map(topic_from_row)
            .ok_or(DomainError::NotFound("Topic", id))
    }

    async fn set_pinned(&self, id: Uuid, pinned: bool, now: DateTime<Utc>) -> Result<Topic> {
        let row = sqlx::query(
            "UPDATE forum_topics SET is_pinned = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(pinned)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref()
            .map(topic_from_row)
            .ok_or(DomainError::NotFound("Topic", id))
    }

    async fn list_by_category(
        &self,
        category_id: Uuid,
        sort: TopicSortKey,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<Topic>> {
        // Fixed clause per sort key; nothing user-supplied is interpolated.
        let order = match sort {
            TopicSortKey::Recent => "updated_at DESC, id DESC",
            TopicSortKey::Oldest => "created_at ASC, id ASC",
            TopicSortKey::MostReplies => "replies_count DESC, id DESC",
            TopicSortKey::MostViews => "views_count DESC, id DESC",
            TopicSortKey::MostLikes => "likes_count DESC, id DESC",
        };
        let sql = format!(
            "SELECT * FROM forum_topics WHERE category_id = $1 \
             ORDER BY is_pinned DESC, {order} LIMIT $2 OFFSET $3"
        );

        let rows = sqlx::query(&sql)
            .bind(category_id)
            .bind(per_page.max(0))
            .bind(Self::page_offset(page, per_page))
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(rows.iter().map(topic_from_row).collect())
    }

    async fn count_in_category(&self, category_id: Uuid) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM forum_topics WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)
    }
}

#[async_trait]
impl PostRepo for PgStore {
    async fn insert(&self, post: Post) -> Result<()> {
        sqlx::query(
            "INSERT INTO forum_posts \
             (id, topic_id, author_id, content, likes_count, is_original_post, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(post.id)
        .bind(post.topic_id)
        .bind(post.author_id)
        .bind(post.content)
        .bind(post.likes_count)
        .bind(post.is_original_post)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn find_original(&self, topic_id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query("SELECT * FROM forum_posts WHERE topic_id = $1 AND is_original_post")
            .bind(topic_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(row.as_ref().map(post_from_row))
    }

    async fn list_replies(&self, topic_id: Uuid, page: i64, per_page: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query(
            "SELECT * FROM forum_posts \
             WHERE topic_id = $1 AND NOT is_original_post \
             ORDER BY created_at ASC, id ASC LIMIT $2 OFFSET $3",
        )
        .bind(topic_id)
        .bind(per_page.max(0))
        .bind(Self::page_offset(page, per_page))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(rows.iter().map(post_from_row).collect())
    }

    async fn count_replies(&self, topic_id: Uuid) -> Result<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM forum_posts WHERE topic_id = $1 AND NOT is_original_post",
        )
        .bind(topic_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }

    async fn count_in_category(&self, category_id: Uuid) -> Result<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM forum_posts p \
             JOIN forum_topics t ON p.topic_id = t.id \
             WHERE t.category_id = $1",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }
}

#[async_trait]
impl NotificationRepo for PgStore {
    async fn insert(&self, notification: Notification) -> Result<()> {
        sqlx::query(
            "INSERT INTO notifications \
             (id, user_id, kind, message, is_read, link, from_user, urgent, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(notification.id)
        .bind(notification.user_id)
        .bind(notification.kind.as_str())
        .bind(notification.message)
        .bind(notification.read)
        .bind(notification.link)
        .bind(notification.from_user)
        .bind(notification.urgent)
        .bind(notification.created_at)
        .bind(notification.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT * FROM notifications WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;
        rows.iter().map(notification_from_row).collect()
    }

    async fn mark_read(&self, user_id: Uuid, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "UPDATE notifications SET is_read = TRUE, updated_at = $3 \
             WHERE id = $2 AND user_id = $1",
        )
        .bind(user_id)
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            "UPDATE notifications SET is_read = TRUE, updated_at = $2 \
             WHERE user_id = $1 AND NOT is_read",
        )
        .bind(user_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
