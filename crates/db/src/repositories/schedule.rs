use crate::models::DbSchedule;
use chrono::Utc;
use devdesk_core::models::schedule::{NewSchedule, Schedule};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const SCHEDULE_COLUMNS: &str = "id, programmer_id, programmer_name, date, start_time, end_time, is_active, created_at, updated_at";

pub async fn create_schedule(pool: &Pool<Postgres>, schedule: &NewSchedule) -> Result<DbSchedule> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating schedule: id={}, programmer_id={}, date={}, window={}-{}",
        id,
        schedule.programmer_id,
        schedule.date,
        schedule.start_time,
        schedule.end_time
    );

    let row = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        INSERT INTO schedules (id, programmer_id, programmer_name, date, start_time, end_time, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING {}
        "#,
        SCHEDULE_COLUMNS
    ))
    .bind(id)
    .bind(schedule.programmer_id)
    .bind(&schedule.programmer_name)
    .bind(schedule.date)
    .bind(schedule.start_time.to_string())
    .bind(schedule.end_time.to_string())
    .bind(schedule.is_active)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_schedule_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSchedule>> {
    tracing::debug!("Getting schedule by id: {}", id);

    let row = sqlx::query_as::<_, DbSchedule>(&format!(
        "SELECT {} FROM schedules WHERE id = $1",
        SCHEDULE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn get_schedules_by_programmer(
    pool: &Pool<Postgres>,
    programmer_id: Uuid,
    active_only: bool,
) -> Result<Vec<DbSchedule>> {
    let rows = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        SELECT {}
        FROM schedules
        WHERE programmer_id = $1 AND (is_active OR NOT $2)
        ORDER BY date ASC, start_time ASC
        "#,
        SCHEDULE_COLUMNS
    ))
    .bind(programmer_id)
    .bind(active_only)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Overwrites the mutable columns of an existing schedule.
pub async fn update_schedule(pool: &Pool<Postgres>, schedule: &Schedule) -> Result<Option<DbSchedule>> {
    let row = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        UPDATE schedules
        SET date = $2, start_time = $3, end_time = $4, is_active = $5, updated_at = $6
        WHERE id = $1
        RETURNING {}
        "#,
        SCHEDULE_COLUMNS
    ))
    .bind(schedule.id)
    .bind(schedule.date)
    .bind(schedule.start_time.to_string())
    .bind(schedule.end_time.to_string())
    .bind(schedule.is_active)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn set_active(pool: &Pool<Postgres>, id: Uuid, is_active: bool) -> Result<Option<DbSchedule>> {
    let row = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        UPDATE schedules
        SET is_active = $2, updated_at = $3
        WHERE id = $1
        RETURNING {}
        "#,
        SCHEDULE_COLUMNS
    ))
    .bind(id)
    .bind(is_active)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_schedule(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
