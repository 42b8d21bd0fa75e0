//! Common test utilities

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

/// Setup test database - truncate tables for a fresh state
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    sqlx::query("TRUNCATE TABLE notifications, posts, popups, users CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to clean up DB");

    pool
}

/// Seed an account with the given role; all status dimensions start clear
pub async fn seed_account(pool: &PgPool, id: Uuid, username: &str, role: &str) {
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, role, is_active, is_suspended,
                           failed_login_attempts, created_at, updated_at)
        VALUES ($1, $2, $3, $4, true, false, 0, NOW(), NOW())
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(format!("{}@example.com", username))
    .bind(role)
    .execute(pool)
    .await
    .expect("Failed to seed account");
}

/// Seed a notification. `read` marks it read with a fixed read_at.
pub async fn seed_notification(
    pool: &PgPool,
    id: Uuid,
    target_type: &str,
    user_id: Option<Uuid>,
    target_roles: Option<&str>,
    read: bool,
) {
    sqlx::query(
        r#"
        INSERT INTO notifications (id, title, body, target_type, user_id, target_roles,
                                   is_read, read_at, created_at)
        VALUES ($1, 'Test notification', 'Body', $2, $3, $4, $5,
                CASE WHEN $5 THEN '2026-01-01 00:00:00+00'::timestamptz ELSE NULL END,
                NOW())
        "#,
    )
    .bind(id)
    .bind(target_type)
    .bind(user_id)
    .bind(target_roles)
    .bind(read)
    .execute(pool)
    .await
    .expect("Failed to seed notification");
}

/// Fetch a notification's read flag and read_at
pub async fn notification_read_state(
    pool: &PgPool,
    id: Uuid,
) -> (bool, Option<chrono::DateTime<chrono::Utc>>) {
    sqlx::query_as("SELECT is_read, read_at FROM notifications WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await
        .expect("Failed to fetch notification")
}

/// Seed a blog post
pub async fn seed_post(pool: &PgPool, id: Uuid, slug: &str, published: bool) {
    sqlx::query(
        r#"
        INSERT INTO posts (id, slug, title, content, is_published, view_count,
                           created_at, updated_at)
        VALUES ($1, $2, 'A post', 'Post body', $3, 0, NOW(), NOW())
        "#,
    )
    .bind(id)
    .bind(slug)
    .bind(published)
    .execute(pool)
    .await
    .expect("Failed to seed post");
}

/// Seed a popup
pub async fn seed_popup(pool: &PgPool, id: Uuid, enabled: bool) {
    sqlx::query(
        r#"
        INSERT INTO popups (id, title, content, is_enabled, view_count,
                            created_at, updated_at)
        VALUES ($1, 'A popup', 'Popup body', $2, 0, NOW(), NOW())
        "#,
    )
    .bind(id)
    .bind(enabled)
    .execute(pool)
    .await
    .expect("Failed to seed popup");
}
