use crate::models::DbUser;
use chrono::Utc;
use devdesk_core::models::user::{NewUser, Role, UpdateProfileRequest};
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const USER_COLUMNS: &str =
    "uid, email, display_name, photo_url, role, password_hash, created_at, updated_at";

pub async fn create_user(pool: &Pool<Postgres>, user: &NewUser) -> Result<DbUser> {
    let uid = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating user: uid={}, role={}", uid, user.role);

    let row = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        INSERT INTO users (uid, email, display_name, photo_url, role, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(uid)
    .bind(user.email.trim().to_lowercase())
    .bind(&user.display_name)
    .bind(&user.photo_url)
    .bind(user.role.as_str())
    .bind(&user.password_hash)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_user_by_uid(pool: &Pool<Postgres>, uid: Uuid) -> Result<Option<DbUser>> {
    let row = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {} FROM users WHERE uid = $1",
        USER_COLUMNS
    ))
    .bind(uid)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn get_user_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbUser>> {
    let row = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {} FROM users WHERE email = $1",
        USER_COLUMNS
    ))
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn list_users(pool: &Pool<Postgres>, role: Option<Role>) -> Result<Vec<DbUser>> {
    let rows = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        SELECT {}
        FROM users
        WHERE $1::VARCHAR IS NULL OR role = $1
        ORDER BY created_at ASC
        "#,
        USER_COLUMNS
    ))
    .bind(role.map(|role| role.as_str()))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn update_role(pool: &Pool<Postgres>, uid: Uuid, role: Role) -> Result<Option<DbUser>> {
    let row = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        UPDATE users
        SET role = $2, updated_at = $3
        WHERE uid = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(uid)
    .bind(role.as_str())
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn update_profile(
    pool: &Pool<Postgres>,
    uid: Uuid,
    profile: &UpdateProfileRequest,
) -> Result<Option<DbUser>> {
    let row = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        UPDATE users
        SET display_name = COALESCE($2, display_name),
            photo_url = COALESCE($3, photo_url),
            updated_at = $4
        WHERE uid = $1
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(uid)
    .bind(&profile.display_name)
    .bind(&profile.photo_url)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_user(pool: &Pool<Postgres>, uid: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE uid = $1")
        .bind(uid)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
