use crate::models::DbProject;
use chrono::Utc;
use devdesk_core::models::project::ProjectRequest;
use eyre::Result;
use sqlx::{types::Json, Pool, Postgres};
use uuid::Uuid;

const PROJECT_COLUMNS: &str = "id, programmer_id, name, description, category, participation, technologies, repository_url, demo_url, image_url, created_at, updated_at";

fn clean_technologies(project: &ProjectRequest) -> Vec<String> {
    project
        .technologies
        .iter()
        .map(|tech| tech.trim().to_string())
        .filter(|tech| !tech.is_empty())
        .collect()
}

pub async fn create_project(
    pool: &Pool<Postgres>,
    programmer_id: Uuid,
    project: &ProjectRequest,
) -> Result<DbProject> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let row = sqlx::query_as::<_, DbProject>(&format!(
        r#"
        INSERT INTO projects (id, programmer_id, name, description, category, participation, technologies, repository_url, demo_url, image_url, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
        RETURNING {}
        "#,
        PROJECT_COLUMNS
    ))
    .bind(id)
    .bind(programmer_id)
    .bind(project.name.trim())
    .bind(project.description.trim())
    .bind(project.category.as_str())
    .bind(Json(&project.participation))
    .bind(clean_technologies(project))
    .bind(&project.repository_url)
    .bind(&project.demo_url)
    .bind(&project.image_url)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn get_project_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbProject>> {
    let row = sqlx::query_as::<_, DbProject>(&format!(
        "SELECT {} FROM projects WHERE id = $1",
        PROJECT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn get_projects_by_programmer(
    pool: &Pool<Postgres>,
    programmer_id: Uuid,
) -> Result<Vec<DbProject>> {
    let rows = sqlx::query_as::<_, DbProject>(&format!(
        r#"
        SELECT {}
        FROM projects
        WHERE programmer_id = $1
        ORDER BY created_at DESC
        "#,
        PROJECT_COLUMNS
    ))
    .bind(programmer_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn update_project(
    pool: &Pool<Postgres>,
    id: Uuid,
    project: &ProjectRequest,
) -> Result<Option<DbProject>> {
    let row = sqlx::query_as::<_, DbProject>(&format!(
        r#"
        UPDATE projects
        SET name = $2, description = $3, category = $4, participation = $5, technologies = $6,
            repository_url = $7, demo_url = $8, image_url = $9, updated_at = $10
        WHERE id = $1
        RETURNING {}
        "#,
        PROJECT_COLUMNS
    ))
    .bind(id)
    .bind(project.name.trim())
    .bind(project.description.trim())
    .bind(project.category.as_str())
    .bind(Json(&project.participation))
    .bind(clean_technologies(project))
    .bind(&project.repository_url)
    .bind(&project.demo_url)
    .bind(&project.image_url)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

pub async fn delete_project(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
