use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use devdesk_core::{
    errors::DeskError,
    models::{
        advisory::{
            Advisory, AdvisoryAction, AdvisoryListQuery, AdvisoryResponse, CreateAdvisoryRequest,
            RespondAdvisoryRequest,
        },
        user::{Role, User},
    },
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    booking,
    middleware::{auth::CurrentUser, error_handling::AppError, guard},
    ApiState,
};

fn not_found(id: Uuid) -> DeskError {
    DeskError::NotFound(format!("Advisory with ID {} not found", id))
}

#[axum::debug_handler]
pub async fn create_advisory(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateAdvisoryRequest>,
) -> Result<(StatusCode, Json<AdvisoryResponse>), AppError> {
    let response = booking::submit(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Advisories the current user requested.
#[axum::debug_handler]
pub async fn my_advisories(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Advisory>>, AppError> {
    Ok(Json(state.store.advisories_for_user(user.uid).await?))
}

/// Advisories addressed to the current programmer.
#[axum::debug_handler]
pub async fn incoming_advisories(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<AdvisoryListQuery>,
) -> Result<Json<Vec<Advisory>>, AppError> {
    guard::require_programmer(&user)?;
    let advisories = state
        .store
        .advisories_for_programmer(user.uid, query.status)
        .await?;
    Ok(Json(advisories))
}

#[axum::debug_handler]
pub async fn get_advisory(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Advisory>, AppError> {
    let advisory = state.store.get_advisory(id).await?.ok_or_else(|| not_found(id))?;

    let is_party = user.uid == advisory.user_id || user.uid == advisory.programmer_id;
    if !is_party && user.role != Role::Admin {
        return Err(not_found(id).into());
    }

    Ok(Json(advisory))
}

async fn apply(
    state: &ApiState,
    user: &User,
    id: Uuid,
    action: AdvisoryAction,
    payload: Option<Json<RespondAdvisoryRequest>>,
) -> Result<Json<AdvisoryResponse>, AppError> {
    let message = payload.and_then(|Json(body)| body.message);
    let response = booking::respond(state, user, id, action, message).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn approve_advisory(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<RespondAdvisoryRequest>>,
) -> Result<Json<AdvisoryResponse>, AppError> {
    apply(&state, &user, id, AdvisoryAction::Approve, payload).await
}

#[axum::debug_handler]
pub async fn reject_advisory(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<RespondAdvisoryRequest>>,
) -> Result<Json<AdvisoryResponse>, AppError> {
    apply(&state, &user, id, AdvisoryAction::Reject, payload).await
}

#[axum::debug_handler]
pub async fn cancel_advisory(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<RespondAdvisoryRequest>>,
) -> Result<Json<AdvisoryResponse>, AppError> {
    apply(&state, &user, id, AdvisoryAction::Cancel, payload).await
}

#[axum::debug_handler]
pub async fn complete_advisory(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AdvisoryResponse>, AppError> {
    apply(&state, &user, id, AdvisoryAction::Complete, None).await
}

#[axum::debug_handler]
pub async fn delete_advisory(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    guard::require_admin(&user)?;

    if !state.store.delete_advisory(id).await? {
        return Err(not_found(id).into());
    }

    info!(advisory_id = %id, deleted_by = %user.uid, "Advisory deleted");
    Ok(StatusCode::NO_CONTENT)
}
