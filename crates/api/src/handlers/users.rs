use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use devdesk_core::{
    errors::DeskError,
    models::user::{Role, UpdateProfileRequest, UpdateRoleRequest, User},
    validation::{is_valid_url, MIN_DISPLAY_NAME_LEN},
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError, guard},
    ApiState,
};

fn not_found(uid: Uuid) -> DeskError {
    DeskError::NotFound(format!("User with ID {} not found", uid))
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<User>>, AppError> {
    guard::require_admin(&user)?;
    Ok(Json(state.store.list_users(None).await?))
}

#[axum::debug_handler]
pub async fn list_programmers(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.store.list_users(Some(Role::Programmer)).await?))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<Arc<ApiState>>,
    Path(uid): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = state.store.get_user(uid).await?.ok_or_else(|| not_found(uid))?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(uid): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    guard::require_owner_or_admin(&user, uid)?;

    let display_name = payload.display_name.map(|name| name.trim().to_string());
    if let Some(name) = &display_name {
        if name.chars().count() < MIN_DISPLAY_NAME_LEN {
            return Err(DeskError::Validation(format!(
                "Display name must be at least {} characters long",
                MIN_DISPLAY_NAME_LEN
            ))
            .into());
        }
    }

    let photo_url = payload.photo_url.map(|url| url.trim().to_string());
    if let Some(url) = &photo_url {
        if !url.is_empty() && !is_valid_url(url) {
            return Err(DeskError::Validation("Photo URL is not a valid http(s) URL".to_string()).into());
        }
    }

    let updated = state
        .store
        .update_profile(uid, UpdateProfileRequest { display_name, photo_url })
        .await?
        .ok_or_else(|| not_found(uid))?;

    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn assign_role(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(uid): Path<Uuid>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<Json<User>, AppError> {
    guard::require_admin(&user)?;

    let updated = state
        .store
        .assign_role(uid, payload.role)
        .await?
        .ok_or_else(|| not_found(uid))?;

    info!(uid = %uid, role = %payload.role, assigned_by = %user.uid, "Role assigned");
    Ok(Json(updated))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(uid): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    guard::require_admin(&user)?;

    if !state.store.delete_user(uid).await? {
        return Err(not_found(uid).into());
    }

    info!(uid = %uid, deleted_by = %user.uid, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
