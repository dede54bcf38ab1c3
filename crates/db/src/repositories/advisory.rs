use crate::models::DbAdvisory;
use chrono::{NaiveDate, Utc};
use devdesk_core::models::{
    advisory::{AdvisoryStatus, NewAdvisory},
    clock::ClockTime,
};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const ADVISORY_COLUMNS: &str = "id, user_id, user_name, user_email, programmer_id, programmer_name, date, time, comment, status, response_message, created_at, updated_at";

/// Inserts a pending advisory.
///
/// With `exclusive` set, the insert runs under a transaction-scoped advisory
/// lock keyed on programmer, date and time, and is skipped (returning `None`)
/// when a pending or approved advisory already holds that slot. Without it,
/// concurrent requests for the same slot all persist.
pub async fn create_advisory(
    pool: &Pool<Postgres>,
    advisory: &NewAdvisory,
    exclusive: bool,
) -> Result<Option<DbAdvisory>> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let time = advisory.time.to_string();

    let mut tx = pool.begin().await?;

    if exclusive {
        let key = lock_key(advisory.programmer_id, advisory.date, advisory.time);
        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&key)
            .execute(&mut *tx)
            .await?;

        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM advisories
                WHERE programmer_id = $1 AND date = $2 AND time = $3
                  AND status IN ('pending', 'approved')
            )
            "#,
        )
        .bind(advisory.programmer_id)
        .bind(advisory.date)
        .bind(&time)
        .fetch_one(&mut *tx)
        .await?;

        if taken {
            tracing::debug!("Slot {} already held, skipping insert", key);
            tx.rollback().await?;
            return Ok(None);
        }
    }

    let row = sqlx::query_as::<_, DbAdvisory>(&format!(
        r#"
        INSERT INTO advisories (id, user_id, user_name, user_email, programmer_id, programmer_name, date, time, comment, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', $10, $10)
        RETURNING {}
        "#,
        ADVISORY_COLUMNS
    ))
    .bind(id)
    .bind(advisory.user_id)
    .bind(&advisory.user_name)
    .bind(&advisory.user_email)
    .bind(advisory.programmer_id)
    .bind(&advisory.programmer_name)
    .bind(advisory.date)
    .bind(&time)
    .bind(&advisory.comment)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!("Advisory created: id={}", id);
    Ok(Some(row))
}

pub async fn get_advisory_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbAdvisory>> {
    let row = sqlx::query_as::<_, DbAdvisory>(&format!(
        "SELECT {} FROM advisories WHERE id = $1",
        ADVISORY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn get_advisories_by_user(pool: &Pool<Postgres>, user_id: Uuid) -> Result<Vec<DbAdvisory>> {
    let rows = sqlx::query_as::<_, DbAdvisory>(&format!(
        r#"
        SELECT {}
        FROM advisories
        WHERE user_id = $1
        ORDER BY date DESC, time DESC
        "#,
        ADVISORY_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn get_advisories_by_programmer(
    pool: &Pool<Postgres>,
    programmer_id: Uuid,
    status: Option<AdvisoryStatus>,
) -> Result<Vec<DbAdvisory>> {
    let rows = sqlx::query_as::<_, DbAdvisory>(&format!(
        r#"
        SELECT {}
        FROM advisories
        WHERE programmer_id = $1 AND ($2::VARCHAR IS NULL OR status = $2)
        ORDER BY date ASC, time ASC
        "#,
        ADVISORY_COLUMNS
    ))
    .bind(programmer_id)
    .bind(status.map(|status| status.as_str()))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Advisories that currently hold a slot for the programmer on `date`.
pub async fn get_slot_holders(
    pool: &Pool<Postgres>,
    programmer_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<DbAdvisory>> {
    let rows = sqlx::query_as::<_, DbAdvisory>(&format!(
        r#"
        SELECT {}
        FROM advisories
        WHERE programmer_id = $1 AND date = $2 AND status IN ('pending', 'approved')
        ORDER BY time ASC
        "#,
        ADVISORY_COLUMNS
    ))
    .bind(programmer_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Moves an advisory from `expected` to `next`.
///
/// Returns `None` when the row is missing or its status is no longer
/// `expected`, so two concurrent responses cannot both win.
pub async fn update_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    expected: AdvisoryStatus,
    next: AdvisoryStatus,
    response_message: Option<&str>,
) -> Result<Option<DbAdvisory>> {
    let row = sqlx::query_as::<_, DbAdvisory>(&format!(
        r#"
        UPDATE advisories
        SET status = $3,
            response_message = COALESCE($4, response_message),
            updated_at = $5
        WHERE id = $1 AND status = $2
        RETURNING {}
        "#,
        ADVISORY_COLUMNS
    ))
    .bind(id)
    .bind(expected.as_str())
    .bind(next.as_str())
    .bind(response_message)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_advisory(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM advisories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn lock_key(programmer_id: Uuid, date: NaiveDate, time: ClockTime) -> String {
    format!("{}:{}:{}", programmer_id, date, time)
}
