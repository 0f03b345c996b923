//! Notification CRUD for recipients, plus recording by the dispatcher.

use std::sync::Arc;

use uuid::Uuid;

use lifelink_core::error::AppError;
use lifelink_core::result::AppResult;
use lifelink_core::types::pagination::{PageRequest, PageResponse};
use lifelink_database::repositories::notification::NotificationRepository;
use lifelink_entity::notification::{Notification, NotificationEvent};

use crate::context::RequestContext;

/// Manages persisted notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    notification_repo: Arc<NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notification_repo: Arc<NotificationRepository>) -> Self {
        Self { notification_repo }
    }

    /// Persists one notification. Called by the event dispatcher before
    /// the corresponding socket emit.
    pub async fn record(
        &self,
        recipient_id: Uuid,
        actor_id: Uuid,
        request_id: Uuid,
        event: NotificationEvent,
        message: &str,
    ) -> AppResult<Notification> {
        self.notification_repo
            .create(recipient_id, actor_id, request_id, event, message)
            .await
    }

    /// Lists notifications for the current user, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        self.notification_repo
            .find_by_recipient(ctx.user_id, page)
            .await
    }

    /// Gets the unread notification count for the current user.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.notification_repo.count_unread(ctx.user_id).await
    }

    /// Marks a notification as read.
    pub async fn mark_read(&self, ctx: &RequestContext, notification_id: Uuid) -> AppResult<()> {
        let updated = self
            .notification_repo
            .mark_read(notification_id, ctx.user_id)
            .await?;
        if updated {
            Ok(())
        } else {
            Err(AppError::not_found("Notification not found"))
        }
    }

    /// Marks all of the current user's notifications as read.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        self.notification_repo.mark_all_read(ctx.user_id).await
    }
}
