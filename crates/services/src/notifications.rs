//! # Notification Service
//!
//! Read/acknowledge side of the notification store. Every operation is
//! scoped to the acting user's own records; there is no cross-user access
//! path, so "mark someone else's notification" is indistinguishable from
//! marking an unknown id and both succeed silently.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use domains::{Actor, Notification, NotificationRepo, Result};

/// Cap on a single notification listing, newest first.
pub const NOTIFICATION_LIST_LIMIT: i64 = 50;

pub struct NotificationService {
    notifications: Arc<dyn NotificationRepo>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepo>) -> Self {
        Self { notifications }
    }

    /// The actor's newest notifications, read and unread alike.
    pub async fn list(&self, actor: &Actor) -> Result<Vec<Notification>> {
        self.notifications
            .list_for_user(actor.id, NOTIFICATION_LIST_LIMIT)
            .await
    }

    /// Marks one of the actor's notifications read. Idempotent.
    pub async fn mark_read(&self, actor: &Actor, id: Uuid) -> Result<()> {
        self.notifications.mark_read(actor.id, id, Utc::now()).await
    }

    /// Marks every notification of the actor read. Idempotent.
    pub async fn mark_all_read(&self, actor: &Actor) -> Result<()> {
        self.notifications.mark_all_read(actor.id, Utc::now()).await
    }
}
