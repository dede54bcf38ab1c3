use crate::models::DbSession;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_session(pool: &Pool<Postgres>, uid: Uuid, token: &str) -> Result<DbSession> {
    let session = sqlx::query_as::<_, DbSession>(
        r#"
        INSERT INTO sessions (token, uid, created_at)
        VALUES ($1, $2, $3)
        RETURNING token, uid, created_at
        "#,
    )
    .bind(token)
    .bind(uid)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(session)
}

pub async fn get_session(pool: &Pool<Postgres>, token: &str) -> Result<Option<DbSession>> {
    let session = sqlx::query_as::<_, DbSession>(
        r#"
        SELECT token, uid, created_at
        FROM sessions
        WHERE token = $1
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

pub async fn delete_session(pool: &Pool<Postgres>, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}
