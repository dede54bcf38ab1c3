use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use devdesk_core::{
    errors::DeskError,
    models::notification::{Notification, UnreadCountResponse},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError},
    ApiState,
};

#[derive(Debug, Default, Deserialize)]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

/// Notifications for the current user, newest first.
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = state
        .store
        .notifications_for_user(user.uid, query.unread_only)
        .await?;
    Ok(Json(notifications))
}

#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let unread = state.store.unread_count(user.uid).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    // Only the recipient's own notifications match.
    if !state.store.mark_read(id, user.uid).await? {
        return Err(DeskError::NotFound(format!("Notification with ID {} not found", id)).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn mark_all_read(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let updated = state.store.mark_all_read(user.uid).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
