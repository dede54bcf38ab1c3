use crate::models::DbNotification;
use chrono::Utc;
use devdesk_core::models::notification::{ExternalNotification, NewNotification};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const NOTIFICATION_COLUMNS: &str = "id, user_id, kind, title, message, read, created_at, advisory_id, related_user_id, related_user_name, related_user_email, advisory_date, advisory_time, sent_by_email";

pub async fn create_notification(
    pool: &Pool<Postgres>,
    notification: &NewNotification,
) -> Result<DbNotification> {
    let id = Uuid::new_v4();

    let row = sqlx::query_as::<_, DbNotification>(&format!(
        r#"
        INSERT INTO notifications (id, user_id, kind, title, message, read, created_at, advisory_id, related_user_id, related_user_name, related_user_email, advisory_date, advisory_time, sent_by_email)
        VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING {}
        "#,
        NOTIFICATION_COLUMNS
    ))
    .bind(id)
    .bind(notification.user_id)
    .bind(notification.kind.as_str())
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(Utc::now())
    .bind(notification.advisory_id)
    .bind(notification.related_user_id)
    .bind(&notification.related_user_name)
    .bind(&notification.related_user_email)
    .bind(notification.advisory_date)
    .bind(notification.advisory_time.map(|time| time.to_string()))
    .bind(notification.sent_by_email)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Notifications for `user_id`, newest first.
pub async fn get_notifications_by_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    unread_only: bool,
) -> Result<Vec<DbNotification>> {
    let rows = sqlx::query_as::<_, DbNotification>(&format!(
        r#"
        SELECT {}
        FROM notifications
        WHERE user_id = $1 AND (NOT read OR NOT $2)
        ORDER BY created_at DESC
        "#,
        NOTIFICATION_COLUMNS
    ))
    .bind(user_id)
    .bind(unread_only)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn count_unread(pool: &Pool<Postgres>, user_id: Uuid) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND NOT read",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Flags one notification as read. Scoped to the recipient so nobody can
/// touch another user's inbox.
pub async fn mark_as_read(pool: &Pool<Postgres>, id: Uuid, user_id: Uuid) -> Result<bool> {
    let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn mark_all_as_read(pool: &Pool<Postgres>, user_id: Uuid) -> Result<u64> {
    let result = sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND NOT read")
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn log_external_notification(
    pool: &Pool<Postgres>,
    entry: &ExternalNotification,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO external_notifications (id, recipient, subject, message, channel, status, sent_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&entry.recipient)
    .bind(&entry.subject)
    .bind(&entry.message)
    .bind(&entry.channel)
    .bind(entry.status.as_str())
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}
