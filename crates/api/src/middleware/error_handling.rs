//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! handler fails the same way. Identity failures also carry their stable
//! code next to the message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use devdesk_core::errors::{DeskError, IdentityErrorCode};
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use devdesk_api::middleware::error_handling::AppError;
/// use devdesk_core::errors::DeskError;
///
/// async fn handler(name: Option<String>) -> Result<Json<String>, AppError> {
///     let name = name.ok_or_else(|| DeskError::Validation("name is required".to_string()))?;
///     Ok(Json(name))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub DeskError);

fn identity_status(code: IdentityErrorCode) -> StatusCode {
    match code {
        IdentityErrorCode::EmailAlreadyInUse => StatusCode::CONFLICT,
        IdentityErrorCode::InvalidEmail | IdentityErrorCode::WeakPassword => {
            StatusCode::BAD_REQUEST
        }
        IdentityErrorCode::UserNotFound
        | IdentityErrorCode::WrongPassword
        | IdentityErrorCode::InvalidCredential
        | IdentityErrorCode::MissingSession => StatusCode::UNAUTHORIZED,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DeskError::NotFound(_) => StatusCode::NOT_FOUND,
            DeskError::Validation(_) => StatusCode::BAD_REQUEST,
            DeskError::Authentication(_) => StatusCode::UNAUTHORIZED,
            DeskError::Authorization(_) => StatusCode::FORBIDDEN,
            DeskError::Conflict(_) => StatusCode::CONFLICT,
            DeskError::Identity(code) => identity_status(*code),
            DeskError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DeskError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let message = self.0.to_string();
        let body = match &self.0 {
            DeskError::Identity(code) => json!({ "error": message, "code": code.code() }),
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Allows `?` on `DeskResult` inside handlers.
impl From<DeskError> for AppError {
    fn from(err: DeskError) -> Self {
        AppError(err)
    }
}

/// Store failures surface as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(DeskError::Database(err))
    }
}

impl From<IdentityErrorCode> for AppError {
    fn from(code: IdentityErrorCode) -> Self {
        AppError(DeskError::Identity(code))
    }
}

/// Maps a DeskError straight to an HTTP response.
pub fn map_error(err: DeskError) -> Response {
    AppError(err).into_response()
}
