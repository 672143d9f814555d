//! Notification dispatcher and inbox service

use async_trait::async_trait;

use super::events::EventSink;
use crate::{
    error::{AppError, AppResult},
    models::notification::{DomainEvent, Notification},
    repository::Repository,
};

/// Persists one notification row per event for its recipient
#[derive(Clone)]
pub struct NotificationDispatcher {
    repository: Repository,
}

impl NotificationDispatcher {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl EventSink for NotificationDispatcher {
    async fn publish(&self, event: &DomainEvent) -> AppResult<()> {
        let notification = self.repository.notifications.insert(&event.render()).await?;
        tracing::debug!(
            id = notification.id,
            user_id = notification.user_id,
            kind = %notification.kind,
            "Notification stored"
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct NotificationsService {
    repository: Repository,
}

impl NotificationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, user_id: i32, unread_only: bool) -> AppResult<Vec<Notification>> {
        self.repository
            .notifications
            .list_for_user(user_id, unread_only)
            .await
    }

    pub async fn unread_count(&self, user_id: i32) -> AppResult<i64> {
        self.repository.notifications.unread_count(user_id).await
    }

    pub async fn mark_read(&self, user_id: i32, id: i32) -> AppResult<()> {
        if !self.repository.notifications.mark_read(user_id, id).await? {
            return Err(AppError::NotFound(format!(
                "Notification with id {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Returns how many notifications changed
    pub async fn mark_all_read(&self, user_id: i32) -> AppResult<u64> {
        self.repository.notifications.mark_all_read(user_id).await
    }
}
