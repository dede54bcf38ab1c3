//! # Authentication Module
//!
//! Password hashing, session tokens, and the extractors that resolve the
//! signed-in user for a request.
//!
//! Passwords are hashed with Argon2 and stored in PHC string format.
//! Sessions are opaque random tokens presented as `Authorization: Bearer`.
//! The extractors look the session up and then load the user from the
//! store on every request, so role changes apply to the very next call.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use devdesk_core::{errors::IdentityErrorCode, models::user::User};
use eyre::Result;
use rand::{distributions::Alphanumeric, Rng};

use crate::{middleware::error_handling::AppError, ApiState};

const SESSION_TOKEN_LEN: usize = 48;

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated for every call and the result is
/// returned in PHC string format (algorithm, parameters, salt and hash).
///
/// # Example
///
/// ```
/// use devdesk_api::middleware::auth::{hash_password, verify_password};
///
/// let hashed = hash_password("user_password").unwrap();
/// assert!(verify_password("user_password", &hashed).unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Checks `password` against a stored PHC hash.
///
/// A malformed stored hash is an error; a mismatch is `Ok(false)`.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| eyre::eyre!("Stored password hash is invalid: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Generates an opaque session token.
pub fn new_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn resolve_session(state: &ApiState, token: &str) -> Result<Option<User>> {
    let Some(uid) = state.store.session_owner(token.to_string()).await? else {
        return Ok(None);
    };
    state.store.get_user(uid).await
}

/// The signed-in user; rejects the request when there is no valid session.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// The signed-in user if any; invalid or missing sessions yield `None`.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(IdentityErrorCode::MissingSession)?;
        let user = resolve_session(state, token)
            .await?
            .ok_or(IdentityErrorCode::MissingSession)?;

        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(&parts.headers) {
            Some(token) => Ok(MaybeUser(resolve_session(state, token).await?)),
            None => Ok(MaybeUser(None)),
        }
    }
}
