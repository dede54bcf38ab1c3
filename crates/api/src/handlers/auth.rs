use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use devdesk_core::{
    errors::IdentityErrorCode,
    models::user::{LoginRequest, NewUser, RegisterRequest, Role, SessionResponse, User},
    validation::{is_valid_email, validate_registration},
};
use std::sync::Arc;
use tracing::info;

use crate::{
    middleware::{
        auth::{self, CurrentUser},
        error_handling::AppError,
    },
    ApiState,
};

async fn open_session(state: &ApiState, user: User) -> Result<SessionResponse, AppError> {
    let token = auth::new_session_token();
    state.store.create_session(user.uid, token.clone()).await?;
    Ok(SessionResponse { token, user })
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    validate_registration(&payload)?;

    let email = payload.email.trim().to_lowercase();
    if state.store.find_credentials(email.clone()).await?.is_some() {
        return Err(IdentityErrorCode::EmailAlreadyInUse.into());
    }

    let user = state
        .store
        .create_user(NewUser {
            email,
            display_name: Some(payload.display_name.trim().to_string()),
            photo_url: None,
            role: Role::User,
            password_hash: auth::hash_password(&payload.password)?,
        })
        .await?;

    info!(uid = %user.uid, "User registered");

    let session = open_session(&state, user).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let email = payload.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(IdentityErrorCode::InvalidEmail.into());
    }
    if payload.password.is_empty() {
        return Err(IdentityErrorCode::InvalidCredential.into());
    }

    let credentials = state
        .store
        .find_credentials(email)
        .await?
        .ok_or(IdentityErrorCode::UserNotFound)?;

    if !auth::verify_password(&payload.password, &credentials.password_hash)? {
        return Err(IdentityErrorCode::WrongPassword.into());
    }

    let session = open_session(&state, credentials.user).await?;
    Ok(Json(session))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = auth::bearer_token(&headers).ok_or(IdentityErrorCode::MissingSession)?;
    state.store.delete_session(token.to_string()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}
