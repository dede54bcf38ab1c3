use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Json,
};
use devdesk_core::{errors::DeskError, models::contact::UploadResponse, validation::validate_image};
use std::sync::Arc;
use tracing::warn;

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError, guard},
    ApiState,
};

/// Accepts a raw image body and returns the hosted URL.
#[axum::debug_handler]
pub async fn upload_image(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    guard::require_programmer(&user)?;

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    validate_image(&content_type, body.len())?;

    if !state.images.is_enabled() {
        return Err(DeskError::Internal("Image uploads are not configured".into()).into());
    }

    let url = state
        .images
        .upload(content_type, body.to_vec())
        .await
        .map_err(|err| {
            warn!(error = %err, "Image upload failed");
            DeskError::Internal(err.into())
        })?;

    Ok((StatusCode::CREATED, Json(UploadResponse { url })))
}
