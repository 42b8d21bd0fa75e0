//! Notification store
//!
//! Audience-predicate reads and the bulk read-state transition against the
//! `notifications` table. Both queries are built from the same predicate
//! fragments so the audience rule cannot drift between read and write.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Notification, Recipient};
use crate::error::AppResult;

/// Audience predicate for a recipient carrying a user id.
/// $1 = user id, $2 = effective role (explicit role, or the "all" token).
const USER_SCOPED_AUDIENCE: &str = r#"
    is_read = false
    AND (
        (target_type = 'user' AND user_id = $1)
        OR target_type = 'all'
        OR (target_type = 'role'
            AND $2 IN (SELECT btrim(r) FROM unnest(string_to_array(target_roles, ',')) AS r))
    )
"#;

/// Audience predicate for a role-only recipient. $1 = role.
/// There is no user identity, so the user clause is absent.
const ROLE_SCOPED_AUDIENCE: &str = r#"
    is_read = false
    AND (
        target_type = 'all'
        OR (target_type = 'role'
            AND $1 IN (SELECT btrim(r) FROM unnest(string_to_array(target_roles, ',')) AS r))
    )
"#;

type NotificationRow = (
    Uuid,
    String,
    String,
    String,
    Option<Uuid>,
    Option<String>,
    bool,
    Option<DateTime<Utc>>,
    DateTime<Utc>,
);

/// Store for notification records
pub struct NotificationStore {
    pool: PgPool,
}

impl NotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Unread notifications addressed to the recipient, newest first
    pub async fn find_unread_for(&self, recipient: &Recipient) -> AppResult<Vec<Notification>> {
        const SELECT: &str = "SELECT id, title, body, target_type, user_id, target_roles, \
                              is_read, read_at, created_at FROM notifications WHERE";

        let rows: Vec<NotificationRow> = if let Some(user_id) = recipient.user_id {
            let sql = format!("{} {} ORDER BY created_at DESC", SELECT, USER_SCOPED_AUDIENCE);
            sqlx::query_as(&sql)
                .bind(user_id)
                .bind(recipient.effective_role())
                .fetch_all(&self.pool)
                .await?
        } else {
            let sql = format!("{} {} ORDER BY created_at DESC", SELECT, ROLE_SCOPED_AUDIENCE);
            sqlx::query_as(&sql)
                .bind(recipient.effective_role())
                .fetch_all(&self.pool)
                .await?
        };

        rows.into_iter()
            .map(
                |(id, title, body, target_type, user_id, target_roles, is_read, read_at, created_at)| {
                    Ok(Notification {
                        id,
                        title,
                        body,
                        target_type: target_type.parse()?,
                        user_id,
                        target_roles,
                        is_read,
                        read_at,
                        created_at,
                    })
                },
            )
            .collect()
    }

    /// Transition the recipient's whole unread audience in one statement.
    /// Every affected row gets the same `read_at`; rows already read are
    /// excluded by the predicate and never re-touched.
    pub async fn mark_all_read_for(&self, recipient: &Recipient) -> AppResult<u64> {
        const UPDATE: &str = "UPDATE notifications SET is_read = true, read_at = NOW() WHERE";

        let result = if let Some(user_id) = recipient.user_id {
            let sql = format!("{} {}", UPDATE, USER_SCOPED_AUDIENCE);
            sqlx::query(&sql)
                .bind(user_id)
                .bind(recipient.effective_role())
                .execute(&self.pool)
                .await?
        } else {
            let sql = format!("{} {}", UPDATE, ROLE_SCOPED_AUDIENCE);
            sqlx::query(&sql)
                .bind(recipient.effective_role())
                .execute(&self.pool)
                .await?
        };

        Ok(result.rows_affected())
    }
}
