use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use devdesk_core::{
    errors::DeskError,
    models::project::{Project, ProjectRequest},
    validation::validate_project,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError, guard},
    ApiState,
};

fn not_found(id: Uuid) -> DeskError {
    DeskError::NotFound(format!("Project with ID {} not found", id))
}

/// Trims free-text fields and drops blank technologies.
fn normalize(mut request: ProjectRequest) -> ProjectRequest {
    request.name = request.name.trim().to_string();
    request.description = request.description.trim().to_string();
    request.technologies = request
        .technologies
        .into_iter()
        .map(|tech| tech.trim().to_string())
        .filter(|tech| !tech.is_empty())
        .collect();
    request
}

#[axum::debug_handler]
pub async fn create_project(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ProjectRequest>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    guard::require_programmer(&user)?;
    validate_project(&payload)?;

    let project = state
        .store
        .create_project(user.uid, normalize(payload))
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

#[axum::debug_handler]
pub async fn list_projects(
    State(state): State<Arc<ApiState>>,
    Path(programmer_id): Path<Uuid>,
) -> Result<Json<Vec<Project>>, AppError> {
    Ok(Json(state.store.projects_for_programmer(programmer_id).await?))
}

#[axum::debug_handler]
pub async fn get_project(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, AppError> {
    let project = state.store.get_project(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(project))
}

#[axum::debug_handler]
pub async fn update_project(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectRequest>,
) -> Result<Json<Project>, AppError> {
    let existing = state.store.get_project(id).await?.ok_or_else(|| not_found(id))?;
    guard::require_owner_or_admin(&user, existing.programmer_id)?;
    validate_project(&payload)?;

    let project = state
        .store
        .replace_project(id, normalize(payload))
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(project))
}

#[axum::debug_handler]
pub async fn delete_project(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let existing = state.store.get_project(id).await?.ok_or_else(|| not_found(id))?;
    guard::require_owner_or_admin(&user, existing.programmer_id)?;

    if !state.store.delete_project(id).await? {
        return Err(not_found(id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
