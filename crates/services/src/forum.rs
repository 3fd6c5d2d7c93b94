//! # Forum Service
//!
//! The counter synchronizer: composes the category, topic, and post stores
//! and keeps their denormalized counters consistent across what are logically
//! three separate writes.
//!
//! Both creation protocols order the dependent insert before the counters
//! that describe it, so a failure mid-protocol leaves counters undercounting
//! (detectable, repairable via [`ForumService::reconcile_category`]) rather
//! than overcounting. No compensating rollback is attempted.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use domains::{
    require, Actor, Capability, Category, CategoryRepo, DomainError, Notification,
    NotificationKind, NotificationRepo, Post, PostRepo, Result, Topic, TopicRepo, TopicSortKey,
};

use crate::views::ViewTracker;

/// Topics shown per listing page, as the legacy forum paginates.
pub const TOPICS_PER_PAGE: i64 = 20;
/// Posts shown per topic page.
pub const POSTS_PER_PAGE: i64 = 10;
const MAX_PER_PAGE: i64 = 100;

/// New-category input; icon/color fall back to the category defaults.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

/// New-topic input. The content becomes the topic's original post.
#[derive(Debug, Clone)]
pub struct NewTopic {
    pub title: String,
    pub content: String,
    pub category_id: Uuid,
}

/// One page of a category's topics.
#[derive(Debug, Clone)]
pub struct TopicPage {
    pub topics: Vec<Topic>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

/// One page of a topic's posts. The original post is prepended to every
/// page, so it is always first regardless of the pagination offset.
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total_replies: i64,
    pub total_pages: i64,
    pub page: i64,
    pub per_page: i64,
}

/// Reconciled counter values for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCounts {
    pub topics_count: i64,
    pub posts_count: i64,
}

pub struct ForumService {
    categories: Arc<dyn CategoryRepo>,
    topics: Arc<dyn TopicRepo>,
    posts: Arc<dyn PostRepo>,
    notifications: Arc<dyn NotificationRepo>,
    views: ViewTracker,
}

impl ForumService {
    pub fn new(
        categories: Arc<dyn CategoryRepo>,
        topics: Arc<dyn TopicRepo>,
        posts: Arc<dyn PostRepo>,
        notifications: Arc<dyn NotificationRepo>,
    ) -> Self {
        Self {
            categories,
            topics,
            posts,
            notifications,
            views: ViewTracker::default(),
        }
    }

    /// Replaces the view throttle; used by tests to shrink the window.
    pub fn with_view_tracker(mut self, views: ViewTracker) -> Self {
        self.views = views;
        self
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.categories.list().await
    }

    /// Admin-only. Inserts a category with both counters at zero.
    pub async fn create_category(&self, actor: &Actor, input: NewCategory) -> Result<Category> {
        require(actor, Capability::ManageCategories)?;

        if input.name.trim().is_empty() || input.description.trim().is_empty() {
            return Err(DomainError::Validation(
                "Name and description are required".to_string(),
            ));
        }

        let category = Category::new(
            input.name,
            input.description,
            input.icon,
            input.color,
            Utc::now(),
        );
        self.categories.insert(category.clone()).await?;

        info!(category = %category.id, name = %category.name, "category created");
        Ok(category)
    }

    /// Create-topic protocol. Any authenticated actor.
    ///
    /// The category is validated before any write so no orphaned topic can
    /// appear; the topic and its original post go down in one storage
    /// operation; the category counters are bumped last.
    pub async fn create_topic(&self, actor: &Actor, input: NewTopic) -> Result<Topic> {
        // 1. Validate input
        if input.title.trim().is_empty() || input.content.trim().is_empty() {
            return Err(DomainError::Validation(
                "Title, content, and category are required".to_string(),
            ));
        }

        // 2. Category must exist before anything is written
        let category = self
            .categories
            .find(input.category_id)
            .await?
            .ok_or(DomainError::NotFound("Category", input.category_id))?;

        // 3. Topic + original post share one timestamp and one storage op
        let now = Utc::now();
        let topic = Topic::new(input.title, actor.id, category.id, now);
        let original = Post::original(topic.id, actor.id, input.content, now);
        self.topics
            .insert_with_original(topic.clone(), original)
            .await?;

        // 4. Category counters last: a failure above never double-counts
        self.categories
            .increment_counts(category.id, 1, 1, now)
            .await?;

        info!(topic = %topic.id, category = %category.id, "topic created");
        Ok(topic)
    }

    /// Create-reply protocol. Any authenticated actor, unlocked topics only.
    pub async fn create_reply(&self, actor: &Actor, topic_id: Uuid, content: &str) -> Result<Post> {
        // 1. Validate input
        if content.trim().is_empty() {
            return Err(DomainError::Validation("Content is required".to_string()));
        }

        // 2. Topic must exist and be unlocked, checked immediately before the
        //    insert. A lock landing between this check and step 3 is not
        //    defended against; the window is accepted.
        let topic = self
            .topics
            .find(topic_id)
            .await?
            .ok_or(DomainError::NotFound("Topic", topic_id))?;
        if topic.is_locked {
            return Err(DomainError::Locked(topic_id));
        }

        // 3. Insert the reply
        let now = Utc::now();
        let reply = Post::reply(topic_id, actor.id, content.to_string(), now);
        self.posts.insert(reply.clone()).await?;

        // 4. Bump the topic, then 5. the category it belongs to
        self.topics.increment_replies(topic_id, now).await?;
        self.categories
            .increment_counts(topic.category_id, 0, 1, now)
            .await?;

        // 6. Best-effort fan-out to the topic author; never fails the reply
        if topic.author_id != actor.id {
            let who = actor.name.as_deref().unwrap_or("A fellow sailor");
            let notification = Notification::new(
                topic.author_id,
                NotificationKind::Comment,
                format!("{who} replied to \"{}\"", topic.title),
                now,
            )
            .with_link(format!("/forum/topic/{topic_id}"))
            .with_from_user(actor.id);
            if let Err(err) = self.notifications.insert(notification).await {
                warn!(error = %err, topic = %topic_id, "reply notification failed");
            }
        }

        info!(topic = %topic_id, reply = %reply.id, "reply created");
        Ok(reply)
    }

    /// Fetches a topic; an authenticated viewer bumps `views_count` at most
    /// once per throttle window. The bump lands after this read, so the
    /// returned count may lag it by one.
    pub async fn get_topic(&self, viewer: Option<&Actor>, id: Uuid) -> Result<Topic> {
        let topic = self
            .topics
            .find(id)
            .await?
            .ok_or(DomainError::NotFound("Topic", id))?;

        if let Some(viewer) = viewer {
            if self.views.should_count(id, viewer.id) {
                self.topics.increment_views(id).await?;
            }
        }

        Ok(topic)
    }

    /// Topics of a category, pinned first, then the requested sort key.
    pub async fn list_topics(
        &self,
        category_id: Uuid,
        sort: TopicSortKey,
        page: i64,
        per_page: i64,
    ) -> Result<TopicPage> {
        if self.categories.find(category_id).await?.is_none() {
            return Err(DomainError::NotFound("Category", category_id));
        }

        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let topics = self
            .topics
            .list_by_category(category_id, sort, page, per_page)
            .await?;
        let total = self.topics.count_in_category(category_id).await?;

        Ok(TopicPage {
            topics,
            total,
            page,
            per_page,
        })
    }

    /// A page of posts with the original post prepended.
    pub async fn list_posts(&self, topic_id: Uuid, page: i64, per_page: i64) -> Result<PostPage> {
        if self.topics.find(topic_id).await?.is_none() {
            return Err(DomainError::NotFound("Topic", topic_id));
        }

        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);

        let mut posts = Vec::new();
        if let Some(original) = self.posts.find_original(topic_id).await? {
            posts.push(original);
        }
        posts.extend(self.posts.list_replies(topic_id, page, per_page).await?);

        let total_replies = self.posts.count_replies(topic_id).await?;
        let total_pages = (total_replies + per_page - 1) / per_page;

        Ok(PostPage {
            posts,
            total_replies,
            total_pages: total_pages.max(1),
            page,
            per_page,
        })
    }

    /// Admin/moderator. Idempotent: re-locking a locked topic succeeds.
    pub async fn set_locked(&self, actor: &Actor, topic_id: Uuid, locked: bool) -> Result<Topic> {
        require(actor, Capability::ModerateTopics)?;
        let topic = self.topics.set_locked(topic_id, locked, Utc::now()).await?;
        info!(topic = %topic_id, locked, "lock flag set");
        Ok(topic)
    }

    /// Admin/moderator. Pin state affects sort order only.
    pub async fn set_pinned(&self, actor: &Actor, topic_id: Uuid, pinned: bool) -> Result<Topic> {
        require(actor, Capability::ModerateTopics)?;
        let topic = self.topics.set_pinned(topic_id, pinned, Utc::now()).await?;
        info!(topic = %topic_id, pinned, "pin flag set");
        Ok(topic)
    }

    /// Admin-only repair path: recomputes both category counters from the
    /// source-of-truth topic and post collections. Idempotent.
    pub async fn reconcile_category(
        &self,
        actor: &Actor,
        category_id: Uuid,
    ) -> Result<CategoryCounts> {
        require(actor, Capability::ManageCategories)?;

        if self.categories.find(category_id).await?.is_none() {
            return Err(DomainError::NotFound("Category", category_id));
        }

        let topics_count = self.topics.count_in_category(category_id).await?;
        let posts_count = self.posts.count_in_category(category_id).await?;
        self.categories
            .set_counts(category_id, topics_count, posts_count, Utc::now())
            .await?;

        info!(category = %category_id, topics_count, posts_count, "counters reconciled");
        Ok(CategoryCounts {
            topics_count,
            posts_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{
        MockCategoryRepo, MockNotificationRepo, MockPostRepo, MockTopicRepo, Role,
    };
    use mockall::Sequence;
    use std::time::Duration;

    fn user() -> Actor {
        Actor::new(Uuid::new_v4(), Role::User)
    }

    fn admin() -> Actor {
        Actor::new(Uuid::new_v4(), Role::Admin)
    }

    fn sample_category() -> Category {
        Category::new(
            "Navigation & Equipment".into(),
            "Discuss navigation tools and equipment issues".into(),
            Some("Compass".into()),
            Some("blue".into()),
            Utc::now(),
        )
    }

    fn sample_topic(category_id: Uuid, author_id: Uuid) -> Topic {
        Topic::new("Storm tactics".into(), author_id, category_id, Utc::now())
    }

    struct Mocks {
        categories: MockCategoryRepo,
        topics: MockTopicRepo,
        posts: MockPostRepo,
        notifications: MockNotificationRepo,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                categories: MockCategoryRepo::new(),
                topics: MockTopicRepo::new(),
                posts: MockPostRepo::new(),
                notifications: MockNotificationRepo::new(),
            }
        }

        fn into_service(self) -> ForumService {
            ForumService::new(
                Arc::new(self.categories),
                Arc::new(self.topics),
                Arc::new(self.posts),
                Arc::new(self.notifications),
            )
        }
    }

    #[tokio::test]
    async fn create_topic_writes_topic_then_bumps_category() {
        let category = sample_category();
        let category_id = category.id;
        let mut seq = Sequence::new();
        let mut mocks = Mocks::new();

        mocks
            .categories
            .expect_find()
            .times(1)
            .returning(move |_| Ok(Some(category.clone())));
        mocks
            .topics
            .expect_insert_with_original()
            .times(1)
            .in_sequence(&mut seq)
            .withf(move |topic, post| {
                topic.category_id == category_id
                    && post.topic_id == topic.id
                    && post.is_original_post
                    && topic.created_at == post.created_at
            })
            .returning(|_, _| Ok(()));
        mocks
            .categories
            .expect_increment_counts()
            .times(1)
            .in_sequence(&mut seq)
            .withf(move |id, topics, posts, _| *id == category_id && *topics == 1 && *posts == 1)
            .returning(|_, _, _, _| Ok(()));

        let service = mocks.into_service();
        let topic = service
            .create_topic(
                &user(),
                NewTopic {
                    title: "Storm tactics".into(),
                    content: "Great tips here".into(),
                    category_id,
                },
            )
            .await
            .unwrap();

        assert_eq!(topic.title, "Storm tactics");
        assert_eq!(topic.replies_count, 0);
        assert!(!topic.is_locked && !topic.is_pinned);
    }

    #[tokio::test]
    async fn create_topic_rejects_empty_title_before_any_write() {
        let service = Mocks::new().into_service();
        let err = service
            .create_topic(
                &user(),
                NewTopic {
                    title: "  ".into(),
                    content: "body".into(),
                    category_id: Uuid::new_v4(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_topic_fails_not_found_for_unknown_category() {
        let mut mocks = Mocks::new();
        mocks.categories.expect_find().returning(|_| Ok(None));

        let service = mocks.into_service();
        let err = service
            .create_topic(
                &user(),
                NewTopic {
                    title: "t".into(),
                    content: "c".into(),
                    category_id: Uuid::new_v4(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound("Category", _)));
    }

    #[tokio::test]
    async fn create_reply_orders_insert_topic_bump_category_bump() {
        let author = user();
        let replier = user();
        let topic = sample_topic(Uuid::new_v4(), author.id);
        let topic_id = topic.id;
        let category_id = topic.category_id;
        let author_id = author.id;
        let replier_id = replier.id;

        let mut seq = Sequence::new();
        let mut mocks = Mocks::new();

        mocks
            .topics
            .expect_find()
            .times(1)
            .returning(move |_| Ok(Some(topic.clone())));
        mocks
            .posts
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .withf(move |post| {
                post.topic_id == topic_id && !post.is_original_post && post.author_id == replier_id
            })
            .returning(|_| Ok(()));
        mocks
            .topics
            .expect_increment_replies()
            .times(1)
            .in_sequence(&mut seq)
            .withf(move |id, _| *id == topic_id)
            .returning(|_, _| Ok(()));
        mocks
            .categories
            .expect_increment_counts()
            .times(1)
            .in_sequence(&mut seq)
            .withf(move |id, topics, posts, _| *id == category_id && *topics == 0 && *posts == 1)
            .returning(|_, _, _, _| Ok(()));
        mocks
            .notifications
            .expect_insert()
            .times(1)
            .withf(move |n| {
                n.user_id == author_id
                    && n.kind == NotificationKind::Comment
                    && n.from_user == Some(replier_id)
                    && !n.read
            })
            .returning(|_| Ok(()));

        let service = mocks.into_service();
        let reply = service
            .create_reply(&replier, topic_id, "I agree")
            .await
            .unwrap();
        assert!(!reply.is_original_post);
        assert_eq!(reply.content, "I agree");
    }

    #[tokio::test]
    async fn create_reply_rejects_locked_topic_without_inserting() {
        let author = user();
        let mut topic = sample_topic(Uuid::new_v4(), author.id);
        topic.is_locked = true;
        let topic_id = topic.id;

        let mut mocks = Mocks::new();
        mocks
            .topics
            .expect_find()
            .returning(move |_| Ok(Some(topic.clone())));

        let service = mocks.into_service();
        let err = service
            .create_reply(&user(), topic_id, "late reply")
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::Locked(topic_id));
    }

    #[tokio::test]
    async fn create_reply_rejects_empty_content() {
        let service = Mocks::new().into_service();
        let err = service
            .create_reply(&user(), Uuid::new_v4(), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn failed_topic_bump_aborts_category_bump_without_rollback() {
        let author = user();
        let topic = sample_topic(Uuid::new_v4(), author.id);
        let topic_id = topic.id;

        let mut mocks = Mocks::new();
        mocks
            .topics
            .expect_find()
            .returning(move |_| Ok(Some(topic.clone())));
        // The reply insert commits…
        mocks.posts.expect_insert().times(1).returning(|_| Ok(()));
        // …then the topic bump fails; the category mock has no expectations,
        // so any call to it would fail the test.
        mocks
            .topics
            .expect_increment_replies()
            .times(1)
            .returning(|_, _| Err(DomainError::storage("connection reset")));

        let service = mocks.into_service();
        let err = service
            .create_reply(&user(), topic_id, "I agree")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }

    #[tokio::test]
    async fn replying_to_own_topic_emits_no_notification() {
        let author = user();
        let topic = sample_topic(Uuid::new_v4(), author.id);
        let topic_id = topic.id;

        let mut mocks = Mocks::new();
        mocks
            .topics
            .expect_find()
            .returning(move |_| Ok(Some(topic.clone())));
        mocks.posts.expect_insert().returning(|_| Ok(()));
        mocks
            .topics
            .expect_increment_replies()
            .returning(|_, _| Ok(()));
        mocks
            .categories
            .expect_increment_counts()
            .returning(|_, _, _, _| Ok(()));
        // notifications mock: no expectations — a call would panic.

        let service = mocks.into_service();
        service
            .create_reply(&author, topic_id, "following up")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_the_reply() {
        let author = user();
        let topic = sample_topic(Uuid::new_v4(), author.id);
        let topic_id = topic.id;

        let mut mocks = Mocks::new();
        mocks
            .topics
            .expect_find()
            .returning(move |_| Ok(Some(topic.clone())));
        mocks.posts.expect_insert().returning(|_| Ok(()));
        mocks
            .topics
            .expect_increment_replies()
            .returning(|_, _| Ok(()));
        mocks
            .categories
            .expect_increment_counts()
            .returning(|_, _, _, _| Ok(()));
        mocks
            .notifications
            .expect_insert()
            .returning(|_| Err(DomainError::storage("sink unavailable")));

        let service = mocks.into_service();
        assert!(service.create_reply(&user(), topic_id, "hello").await.is_ok());
    }

    #[tokio::test]
    async fn create_category_requires_admin() {
        let service = Mocks::new().into_service();
        let input = NewCategory {
            name: "General Discussion".into(),
            description: "General maritime topics".into(),
            icon: None,
            color: None,
        };

        let err = service
            .create_category(&user(), input.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let moderator = Actor::new(Uuid::new_v4(), Role::Moderator);
        let err = service.create_category(&moderator, input).await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn create_category_applies_defaults_and_zero_counters() {
        let mut mocks = Mocks::new();
        mocks
            .categories
            .expect_insert()
            .times(1)
            .withf(|c| {
                c.icon == Category::DEFAULT_ICON
                    && c.color == Category::DEFAULT_COLOR
                    && c.topics_count == 0
                    && c.posts_count == 0
            })
            .returning(|_| Ok(()));

        let service = mocks.into_service();
        let category = service
            .create_category(
                &admin(),
                NewCategory {
                    name: "Career Development".into(),
                    description: "Career advice for maritime professionals".into(),
                    icon: None,
                    color: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(category.name, "Career Development");
    }

    #[tokio::test]
    async fn lock_and_pin_require_moderator_or_admin() {
        let service = Mocks::new().into_service();
        let err = service
            .set_locked(&user(), Uuid::new_v4(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));

        let err = service
            .set_pinned(&user(), Uuid::new_v4(), true)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn moderator_can_toggle_lock() {
        let author = user();
        let topic = sample_topic(Uuid::new_v4(), author.id);
        let topic_id = topic.id;

        let mut mocks = Mocks::new();
        mocks
            .topics
            .expect_set_locked()
            .times(1)
            .withf(move |id, locked, _| *id == topic_id && *locked)
            .returning(move |_, locked, _| {
                let mut t = topic.clone();
                t.is_locked = locked;
                Ok(t)
            });

        let moderator = Actor::new(Uuid::new_v4(), Role::Moderator);
        let service = mocks.into_service();
        let updated = service.set_locked(&moderator, topic_id, true).await.unwrap();
        assert!(updated.is_locked);
    }

    #[tokio::test]
    async fn get_topic_counts_views_once_per_viewer_within_window() {
        let author = user();
        let topic = sample_topic(Uuid::new_v4(), author.id);
        let topic_id = topic.id;

        let mut mocks = Mocks::new();
        mocks
            .topics
            .expect_find()
            .times(3)
            .returning(move |_| Ok(Some(topic.clone())));
        mocks
            .topics
            .expect_increment_views()
            .times(1)
            .returning(|_| Ok(()));

        let service = mocks.into_service();
        let viewer = user();
        service.get_topic(Some(&viewer), topic_id).await.unwrap();
        service.get_topic(Some(&viewer), topic_id).await.unwrap();
        // Anonymous views never count.
        service.get_topic(None, topic_id).await.unwrap();
    }

    #[tokio::test]
    async fn get_topic_counts_each_distinct_viewer() {
        let author = user();
        let topic = sample_topic(Uuid::new_v4(), author.id);
        let topic_id = topic.id;

        let mut mocks = Mocks::new();
        mocks
            .topics
            .expect_find()
            .times(2)
            .returning(move |_| Ok(Some(topic.clone())));
        mocks
            .topics
            .expect_increment_views()
            .times(2)
            .returning(|_| Ok(()));

        let service = mocks
            .into_service()
            .with_view_tracker(ViewTracker::new(Duration::from_secs(60)));
        service.get_topic(Some(&user()), topic_id).await.unwrap();
        service.get_topic(Some(&user()), topic_id).await.unwrap();
    }

    #[tokio::test]
    async fn reconcile_writes_recomputed_counts() {
        let category = sample_category();
        let category_id = category.id;

        let mut mocks = Mocks::new();
        mocks
            .categories
            .expect_find()
            .returning(move |_| Ok(Some(category.clone())));
        mocks
            .topics
            .expect_count_in_category()
            .returning(|_| Ok(4));
        mocks
            .posts
            .expect_count_in_category()
            .returning(|_| Ok(17));
        mocks
            .categories
            .expect_set_counts()
            .times(1)
            .withf(move |id, topics, posts, _| *id == category_id && *topics == 4 && *posts == 17)
            .returning(|_, _, _, _| Ok(()));

        let service = mocks.into_service();
        let counts = service
            .reconcile_category(&admin(), category_id)
            .await
            .unwrap();
        assert_eq!(
            counts,
            CategoryCounts {
                topics_count: 4,
                posts_count: 17
            }
        );
    }

    #[tokio::test]
    async fn reconcile_requires_admin() {
        let service = Mocks::new().into_service();
        let err = service
            .reconcile_category(&user(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn list_posts_prepends_original_on_any_page() {
        let author = user();
        let topic = sample_topic(Uuid::new_v4(), author.id);
        let topic_id = topic.id;
        let original = Post::original(topic_id, author.id, "OP".into(), Utc::now());
        let original_id = original.id;
        let reply = Post::reply(topic_id, author.id, "r11".into(), Utc::now());

        let mut mocks = Mocks::new();
        mocks
            .topics
            .expect_find()
            .returning(move |_| Ok(Some(topic.clone())));
        mocks
            .posts
            .expect_find_original()
            .returning(move |_| Ok(Some(original.clone())));
        mocks
            .posts
            .expect_list_replies()
            .withf(move |id, page, per_page| *id == topic_id && *page == 2 && *per_page == 10)
            .returning(move |_, _, _| Ok(vec![reply.clone()]));
        mocks.posts.expect_count_replies().returning(|_| Ok(11));

        let service = mocks.into_service();
        let page = service.list_posts(topic_id, 2, 10).await.unwrap();
        assert_eq!(page.posts.first().map(|p| p.id), Some(original_id));
        assert!(page.posts[0].is_original_post);
        assert_eq!(page.total_replies, 11);
        assert_eq!(page.total_pages, 2);
    }
}
