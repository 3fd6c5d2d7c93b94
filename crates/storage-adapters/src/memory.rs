//! # In-Memory Store
//!
//! A process-local implementation of all four storage ports over
//! [`DashMap`]. Counter updates mutate entries in place under the map's
//! shard lock, which gives the same atomic-increment guarantee the SQL
//! backend gets from `SET n = n + 1`.
//!
//! Listing order relies on ids being UUID v7: sorting by id is sorting by
//! creation time.

use std::cmp::Ordering;
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use domains::{
    Category, CategoryRepo, DomainError, Notification, NotificationRepo, Post, PostRepo, Result,
    Topic, TopicRepo, TopicSortKey,
};

#[derive(Default)]
pub struct MemoryStore {
    categories: DashMap<Uuid, Category>,
    topics: DashMap<Uuid, Topic>,
    posts: DashMap<Uuid, Post>,
    notifications: DashMap<Uuid, Notification>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Saturating so an absurd client-supplied page is an empty page, not an
/// overflow.
fn page_bounds(page: i64, per_page: i64) -> (usize, usize) {
    let offset = page
        .saturating_sub(1)
        .max(0)
        .saturating_mul(per_page.max(0));
    (offset as usize, per_page.max(0) as usize)
}

/// Within a pinned/unpinned group, order by the sort key with id tie-break
/// following the key's direction.
fn topic_order(sort: TopicSortKey, a: &Topic, b: &Topic) -> Ordering {
    match sort {
        TopicSortKey::Recent => b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)),
        TopicSortKey::Oldest => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
        TopicSortKey::MostReplies => b.replies_count.cmp(&a.replies_count).then(b.id.cmp(&a.id)),
        TopicSortKey::MostViews => b.views_count.cmp(&a.views_count).then(b.id.cmp(&a.id)),
        TopicSortKey::MostLikes => b.likes_count.cmp(&a.likes_count).then(b.id.cmp(&a.id)),
    }
}

#[async_trait]
impl CategoryRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Category>> {
        let mut all: Vec<Category> = self.categories.iter().map(|e| e.value().clone()).collect();
        all.sort_by_key(|c| c.id);
        Ok(all)
    }

    async fn insert(&self, category: Category) -> Result<()> {
        self.categories.insert(category.id, category);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.categories.get(&id).map(|e| e.value().clone()))
    }

    async fn increment_counts(
        &self,
        id: Uuid,
        topics: i64,
        posts: i64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if let Some(mut category) = self.categories.get_mut(&id) {
            category.topics_count += topics;
            category.posts_count += posts;
            category.updated_at = now;
        }
        Ok(())
    }

    async fn set_counts(
        &self,
        id: Uuid,
        topics_count: i64,
        posts_count: i64,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if let Some(mut category) = self.categories.get_mut(&id) {
            category.topics_count = topics_count;
            category.posts_count = posts_count;
            category.updated_at = now;
        }
        Ok(())
    }
}

#[async_trait]
impl TopicRepo for MemoryStore {
    async fn insert_with_original(&self, topic: Topic, original_post: Post) -> Result<()> {
        // Post first: no reader can observe the topic without its opening
        // post.
        self.posts.insert(original_post.id, original_post);
        self.topics.insert(topic.id, topic);
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Topic>> {
        Ok(self.topics.get(&id).map(|e| e.value().clone()))
    }

    async fn increment_replies(&self, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        match self.topics.get_mut(&id) {
            Some(mut topic) => {
                topic.replies_count += 1;
                topic.updated_at = now;
                Ok(())
            }
            None => Err(DomainError::NotFound("Topic", id)),
        }
    }

    async fn increment_views(&self, id: Uuid) -> Result<()> {
        match self.topics.get_mut(&id) {
            Some(mut topic) => {
                topic.views_count += 1;
                Ok(())
            }
            None => Err(DomainError::NotFound("Topic", id)),
        }
    }

    async fn set_locked(&self, id: Uuid, locked: bool, now: DateTime<Utc>) -> Result<Topic> {
        match self.topics.get_mut(&id) {
            Some(mut topic) => {
                topic.is_locked = locked;
                topic.updated_at = now;
                Ok(topic.clone())
            }
            None => Err(DomainError::NotFound("Topic", id)),
        }
    }

    async fn set_pinned(&self, id: Uuid, pinned: bool, now: DateTime<Utc>) -> Result<Topic> {
        match self.topics.get_mut(&id) {
            Some(mut topic) => {
                topic.is_pinned = pinned;
                topic.updated_at = now;
                Ok(topic.clone())
            }
            None => Err(DomainError::NotFound("Topic", id)),
        }
    }

    async fn list_by_category(
        &self,
        category_id: Uuid,
        sort: TopicSortKey,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<Topic>> {
        let mut matching: Vec<Topic> = self
            .topics
            .iter()
            .filter(|e| e.value().category_id == category_id)
            .map(|e| e.value().clone())
            .collect();
        matching.sort_by(|a, b| {
            b.is_pinned
                .cmp(&a.is_pinned)
                .then_with(|| topic_order(sort, a, b))
        });

        let (offset, per) = page_bounds(page, per_page);
        Ok(matching.into_iter().skip(offset).take(per).collect())
    }

    async fn count_in_category(&self, category_id: Uuid) -> Result<i64> {
        Ok(self
            .topics
            .iter()
            .filter(|e| e.value().category_id == category_id)
            .count() as i64)
    }
}

#[async_trait]
impl PostRepo for MemoryStore {
    async fn insert(&self, post: Post) -> Result<()> {
        self.posts.insert(post.id, post);
        Ok(())
    }

    async fn find_original(&self, topic_id: Uuid) -> Result<Option<Post>> {
        Ok(self
            .posts
            .iter()
            .find(|e| e.value().topic_id == topic_id && e.value().is_original_post)
            .map(|e| e.value().clone()))
    }

    async fn list_replies(&self, topic_id: Uuid, page: i64, per_page: i64) -> Result<Vec<Post>> {
        let mut replies: Vec<Post> = self
            .posts
            .iter()
            .filter(|e| e.value().topic_id == topic_id && !e.value().is_original_post)
            .map(|e| e.value().clone())
            .collect();
        replies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let (offset, per) = page_bounds(page, per_page);
        Ok(replies.into_iter().skip(offset).take(per).collect())
    }

    async fn count_replies(&self, topic_id: Uuid) -> Result<i64> {
        Ok(self
            .posts
            .iter()
            .filter(|e| e.value().topic_id == topic_id && !e.value().is_original_post)
            .count() as i64)
    }

    async fn count_in_category(&self, category_id: Uuid) -> Result<i64> {
        let topic_ids: HashSet<Uuid> = self
            .topics
            .iter()
            .filter(|e| e.value().category_id == category_id)
            .map(|e| *e.key())
            .collect();
        Ok(self
            .posts
            .iter()
            .filter(|e| topic_ids.contains(&e.value().topic_id))
            .count() as i64)
    }
}

#[async_trait]
impl NotificationRepo for MemoryStore {
    async fn insert(&self, notification: Notification) -> Result<()> {
        self.notifications.insert(notification.id, notification);
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid, limit: i64) -> Result<Vec<Notification>> {
        let mut mine: Vec<Notification> = self
            .notifications
            .iter()
            .filter(|e| e.value().user_id == user_id)
            .map(|e| e.value().clone())
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        mine.truncate(limit.max(0) as usize);
        Ok(mine)
    }

    async fn mark_read(&self, user_id: Uuid, id: Uuid, now: DateTime<Utc>) -> Result<()> {
        if let Some(mut notification) = self.notifications.get_mut(&id) {
            if notification.user_id == user_id {
                notification.read = true;
                notification.updated_at = now;
            }
        }
        Ok(())
    }

    async fn mark_all_read(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<()> {
        for mut entry in self.notifications.iter_mut() {
            if entry.user_id == user_id && !entry.read {
                entry.read = true;
                entry.updated_at = now;
            }
        }
        Ok(())
    }
}
