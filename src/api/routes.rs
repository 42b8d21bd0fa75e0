//! API Routes
//!
//! HTTP endpoint definitions.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Account, Notification, Recipient};
use crate::error::AppError;
use crate::handlers::{AccountLifecycleHandler, NotificationAudienceHandler, SuspendAccountCommand};
use crate::store::AccountStore;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub is_suspended: bool,
    pub suspension_reason: Option<String>,
    pub locked_until: Option<DateTime<Utc>>,
    pub failed_login_attempts: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
            role: account.role.as_str().to_string(),
            is_active: account.is_active,
            is_suspended: account.is_suspended,
            suspension_reason: account.suspension_reason,
            locked_until: account.locked_until,
            failed_login_attempts: account.failed_login_attempts,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivationResponse {
    pub account_id: Uuid,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct SuspendRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuspensionResponse {
    pub account_id: Uuid,
    pub is_suspended: bool,
    pub suspension_reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub account_id: Uuid,
    pub locked_until: Option<DateTime<Utc>>,
    pub failed_login_attempts: i32,
}

#[derive(Debug, Deserialize)]
pub struct RecipientQuery {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub role: Option<String>,
}

impl From<RecipientQuery> for Recipient {
    fn from(query: RecipientQuery) -> Self {
        Self {
            user_id: query.user_id,
            role: query.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub target_type: String,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            title: notification.title,
            body: notification.body,
            target_type: notification.target_type.as_str().to_string(),
            is_read: notification.is_read,
            read_at: notification.read_at,
            created_at: notification.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<NotificationResponse>,
}

#[derive(Debug, Deserialize)]
pub struct MarkAllReadRequest {
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
}

#[derive(Debug, Serialize)]
pub struct PopupResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct PopupListResponse {
    pub popups: Vec<PopupResponse>,
}

#[derive(Debug, Serialize)]
pub struct ViewCountResponse {
    pub id: Uuid,
    pub view_count: i64,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<PgPool> {
    Router::new()
        // Accounts
        .route("/accounts/:account_id", get(get_account))
        .route("/accounts/:account_id/activate", post(activate_account))
        .route("/accounts/:account_id/deactivate", post(deactivate_account))
        .route("/accounts/:account_id/suspend", post(suspend_account))
        .route("/accounts/:account_id/unsuspend", post(unsuspend_account))
        .route("/accounts/:account_id/unlock", post(unlock_account))
        // Notifications
        .route("/notifications", get(list_unread_notifications))
        .route("/notifications/mark-all-read", post(mark_all_read))
        // Blog posts
        .route("/posts", get(list_posts))
        .route("/posts/:slug", get(get_post))
        .route("/posts/:post_id/view", post(increment_post_view))
        // Popups
        .route("/popups/active", get(list_active_popups))
        .route("/popups/:popup_id/view", post(increment_popup_view))
}

// =========================================================================
// GET /accounts/:account_id
// =========================================================================

/// Get account by ID
async fn get_account(
    State(pool): State<PgPool>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<AccountResponse>, AppError> {
    let account = AccountStore::new(pool)
        .find_by_id(account_id)
        .await?
        .ok_or_else(|| AppError::AccountNotFound(account_id.to_string()))?;

    Ok(Json(account.into()))
}

// =========================================================================
// POST /accounts/:account_id/activate
// =========================================================================

/// Activate an account
async fn activate_account(
    State(pool): State<PgPool>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<ActivationResponse>, AppError> {
    let result = AccountLifecycleHandler::new(pool).activate(account_id).await?;

    Ok(Json(ActivationResponse {
        account_id: result.account_id,
        is_active: result.is_active,
    }))
}

// =========================================================================
// POST /accounts/:account_id/deactivate
// =========================================================================

/// Deactivate an account
async fn deactivate_account(
    State(pool): State<PgPool>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<ActivationResponse>, AppError> {
    let result = AccountLifecycleHandler::new(pool)
        .deactivate(account_id)
        .await?;

    Ok(Json(ActivationResponse {
        account_id: result.account_id,
        is_active: result.is_active,
    }))
}

// =========================================================================
// POST /accounts/:account_id/suspend
// =========================================================================

/// Suspend an account
async fn suspend_account(
    State(pool): State<PgPool>,
    Path(account_id): Path<Uuid>,
    Json(request): Json<SuspendRequest>,
) -> Result<Json<SuspensionResponse>, AppError> {
    let command = SuspendAccountCommand::new(account_id);
    let command = if let Some(reason) = request.reason {
        command.with_reason(reason)
    } else {
        command
    };

    let result = AccountLifecycleHandler::new(pool).suspend(command).await?;

    Ok(Json(SuspensionResponse {
        account_id: result.account_id,
        is_suspended: result.is_suspended,
        suspension_reason: result.suspension_reason,
    }))
}

// =========================================================================
// POST /accounts/:account_id/unsuspend
// =========================================================================

/// Lift an account suspension
async fn unsuspend_account(
    State(pool): State<PgPool>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<SuspensionResponse>, AppError> {
    let result = AccountLifecycleHandler::new(pool)
        .unsuspend(account_id)
        .await?;

    Ok(Json(SuspensionResponse {
        account_id: result.account_id,
        is_suspended: result.is_suspended,
        suspension_reason: result.suspension_reason,
    }))
}

// =========================================================================
// POST /accounts/:account_id/unlock
// =========================================================================

/// Clear an account's login lockout
async fn unlock_account(
    State(pool): State<PgPool>,
    Path(account_id): Path<Uuid>,
) -> Result<Json<UnlockResponse>, AppError> {
    let result = AccountLifecycleHandler::new(pool).unlock(account_id).await?;

    Ok(Json(UnlockResponse {
        account_id: result.account_id,
        locked_until: result.locked_until,
        failed_login_attempts: result.failed_login_attempts,
    }))
}

// =========================================================================
// GET /notifications
// =========================================================================

/// List unread notifications addressed to a recipient
async fn list_unread_notifications(
    State(pool): State<PgPool>,
    Query(query): Query<RecipientQuery>,
) -> Result<Json<NotificationsResponse>, AppError> {
    let notifications = NotificationAudienceHandler::new(pool)
        .unread(query.into())
        .await?;

    Ok(Json(NotificationsResponse {
        notifications: notifications.into_iter().map(Into::into).collect(),
    }))
}

// =========================================================================
// POST /notifications/mark-all-read
// =========================================================================

/// Mark a recipient's whole unread audience read
async fn mark_all_read(
    State(pool): State<PgPool>,
    Json(request): Json<MarkAllReadRequest>,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let recipient = Recipient {
        user_id: request.user_id,
        role: request.role,
    };

    let result = NotificationAudienceHandler::new(pool)
        .mark_all_read(recipient)
        .await?;

    Ok(Json(MarkAllReadResponse {
        updated: result.updated,
    }))
}

// =========================================================================
// GET /posts
// =========================================================================

/// List published blog posts
async fn list_posts(
    State(pool): State<PgPool>,
) -> Result<Json<PostListResponse>, AppError> {
    let rows: Vec<(Uuid, String, String, String, i64, DateTime<Utc>, DateTime<Utc>)> =
        sqlx::query_as(
            r#"
            SELECT id, slug, title, content, view_count, created_at, updated_at
            FROM posts
            WHERE is_published = true
            ORDER BY created_at DESC
            LIMIT 100
            "#,
        )
        .fetch_all(&pool)
        .await?;

    let posts = rows
        .into_iter()
        .map(
            |(id, slug, title, content, view_count, created_at, updated_at)| PostResponse {
                id,
                slug,
                title,
                content,
                view_count,
                created_at,
                updated_at,
            },
        )
        .collect();

    Ok(Json(PostListResponse { posts }))
}

// =========================================================================
// GET /posts/:slug
// =========================================================================

/// Get a published blog post by slug
async fn get_post(
    State(pool): State<PgPool>,
    Path(slug): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let row: Option<(Uuid, String, String, String, i64, DateTime<Utc>, DateTime<Utc>)> =
        sqlx::query_as(
            r#"
            SELECT id, slug, title, content, view_count, created_at, updated_at
            FROM posts
            WHERE slug = $1 AND is_published = true
            "#,
        )
        .bind(&slug)
        .fetch_optional(&pool)
        .await?;

    let (id, slug, title, content, view_count, created_at, updated_at) =
        row.ok_or_else(|| AppError::PostNotFound(slug))?;

    Ok(Json(PostResponse {
        id,
        slug,
        title,
        content,
        view_count,
        created_at,
        updated_at,
    }))
}

// =========================================================================
// POST /posts/:post_id/view
// =========================================================================

/// Increment a blog post's view counter
async fn increment_post_view(
    State(pool): State<PgPool>,
    Path(post_id): Path<Uuid>,
) -> Result<Json<ViewCountResponse>, AppError> {
    let view_count: Option<i64> = sqlx::query_scalar(
        "UPDATE posts SET view_count = view_count + 1 WHERE id = $1 RETURNING view_count",
    )
    .bind(post_id)
    .fetch_optional(&pool)
    .await?;

    let view_count = view_count.ok_or_else(|| AppError::PostNotFound(post_id.to_string()))?;

    Ok(Json(ViewCountResponse {
        id: post_id,
        view_count,
    }))
}

// =========================================================================
// GET /popups/active
// =========================================================================

/// List enabled popups
async fn list_active_popups(
    State(pool): State<PgPool>,
) -> Result<Json<PopupListResponse>, AppError> {
    let rows: Vec<(Uuid, String, String, i64, DateTime<Utc>)> = sqlx::query_as(
        r#"
        SELECT id, title, content, view_count, created_at
        FROM popups
        WHERE is_enabled = true
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let popups = rows
        .into_iter()
        .map(|(id, title, content, view_count, created_at)| PopupResponse {
            id,
            title,
            content,
            view_count,
            created_at,
        })
        .collect();

    Ok(Json(PopupListResponse { popups }))
}

// =========================================================================
// POST /popups/:popup_id/view
// =========================================================================

/// Increment a popup's view counter
async fn increment_popup_view(
    State(pool): State<PgPool>,
    Path(popup_id): Path<Uuid>,
) -> Result<Json<ViewCountResponse>, AppError> {
    let view_count: Option<i64> = sqlx::query_scalar(
        "UPDATE popups SET view_count = view_count + 1 WHERE id = $1 RETURNING view_count",
    )
    .bind(popup_id)
    .fetch_optional(&pool)
    .await?;

    let view_count = view_count.ok_or_else(|| AppError::PopupNotFound(popup_id.to_string()))?;

    Ok(Json(ViewCountResponse {
        id: popup_id,
        view_count,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspend_request_deserialize() {
        let request: SuspendRequest = serde_json::from_str(r#"{"reason": "spam"}"#).unwrap();
        assert_eq!(request.reason, Some("spam".to_string()));

        let request: SuspendRequest = serde_json::from_str("{}").unwrap();
        assert!(request.reason.is_none());
    }

    #[test]
    fn test_mark_all_read_request_deserialize() {
        let request: MarkAllReadRequest =
            serde_json::from_str(r#"{"user_id": "550e8400-e29b-41d4-a716-446655440000"}"#)
                .unwrap();
        assert!(request.user_id.is_some());
        assert!(request.role.is_none());

        let request: MarkAllReadRequest = serde_json::from_str(r#"{"role": "admin"}"#).unwrap();
        assert_eq!(request.role, Some("admin".to_string()));

        let request: MarkAllReadRequest = serde_json::from_str("{}").unwrap();
        assert!(request.user_id.is_none());
        assert!(request.role.is_none());
    }

    #[test]
    fn test_recipient_query_conversion() {
        let query = RecipientQuery {
            user_id: None,
            role: Some("editor".to_string()),
        };

        let recipient: Recipient = query.into();
        assert!(recipient.user_id.is_none());
        assert_eq!(recipient.role, Some("editor".to_string()));
    }
}
