//! # services
//!
//! Domain services composing the storage ports: the forum service owns the
//! denormalized-counter protocols, the notification service owns per-user
//! read state, and the view tracker throttles view counting.

pub mod forum;
pub mod notifications;
pub mod views;

pub use forum::{
    CategoryCounts, ForumService, NewCategory, NewTopic, PostPage, TopicPage, POSTS_PER_PAGE,
    TOPICS_PER_PAGE,
};
pub use notifications::NotificationService;
pub use views::ViewTracker;
