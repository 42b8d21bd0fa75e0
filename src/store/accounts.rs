//! Account store
//!
//! Single-record reads and field-group writes against the `users` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Account, StatusPatch};
use crate::error::AppResult;

type AccountRow = (
    Uuid,
    String,
    String,
    String,
    bool,
    bool,
    Option<String>,
    Option<DateTime<Utc>>,
    i32,
    DateTime<Utc>,
    DateTime<Utc>,
);

/// Store for account records
pub struct AccountStore {
    pool: PgPool,
}

impl AccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch an account by id
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, role, is_active, is_suspended,
                   suspension_reason, locked_until, failed_login_attempts,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(
            |(
                id,
                username,
                email,
                role,
                is_active,
                is_suspended,
                suspension_reason,
                locked_until,
                failed_login_attempts,
                created_at,
                updated_at,
            )| {
                Ok(Account {
                    id,
                    username,
                    email,
                    role: role.parse()?,
                    is_active,
                    is_suspended,
                    suspension_reason,
                    locked_until,
                    failed_login_attempts,
                    created_at,
                    updated_at,
                })
            },
        )
        .transpose()
    }

    /// Write exactly the patch's field group; other columns are untouched.
    pub async fn apply(&self, id: Uuid, patch: &StatusPatch) -> AppResult<()> {
        match patch {
            StatusPatch::Active { is_active } => {
                sqlx::query(
                    "UPDATE users SET is_active = $2, updated_at = NOW() WHERE id = $1",
                )
                .bind(id)
                .bind(*is_active)
                .execute(&self.pool)
                .await?;
            }
            StatusPatch::Suspension {
                is_suspended,
                suspension_reason,
            } => {
                sqlx::query(
                    "UPDATE users SET is_suspended = $2, suspension_reason = $3, updated_at = NOW() WHERE id = $1",
                )
                .bind(id)
                .bind(*is_suspended)
                .bind(suspension_reason.as_deref())
                .execute(&self.pool)
                .await?;
            }
            StatusPatch::LockCleared => {
                sqlx::query(
                    "UPDATE users SET locked_until = NULL, failed_login_attempts = 0, updated_at = NOW() WHERE id = $1",
                )
                .bind(id)
                .execute(&self.pool)
                .await?;
            }
        }

        Ok(())
    }
}
