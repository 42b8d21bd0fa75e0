//! Notification Audience Handler
//!
//! Resolves which notifications a recipient can see and transitions that
//! audience's read state in one bulk write.

use sqlx::PgPool;

use crate::domain::{Notification, Recipient};
use crate::error::AppResult;
use crate::store::NotificationStore;

/// Result of a bulk mark-read
#[derive(Debug, Clone)]
pub struct MarkAllReadResult {
    /// Rows transitioned to read; already-read rows are never counted
    pub updated: u64,
}

/// Handler for recipient-scoped notification operations
pub struct NotificationAudienceHandler {
    notifications: NotificationStore,
}

impl NotificationAudienceHandler {
    pub fn new(pool: PgPool) -> Self {
        Self {
            notifications: NotificationStore::new(pool),
        }
    }

    /// Unread notifications addressed to the recipient
    pub async fn unread(&self, recipient: Recipient) -> AppResult<Vec<Notification>> {
        recipient.validate()?;
        self.notifications.find_unread_for(&recipient).await
    }

    /// Mark the recipient's whole unread audience read.
    /// The recipient is validated before any storage access.
    pub async fn mark_all_read(&self, recipient: Recipient) -> AppResult<MarkAllReadResult> {
        recipient.validate()?;

        let updated = self.notifications.mark_all_read_for(&recipient).await?;

        Ok(MarkAllReadResult { updated })
    }
}
