use axum::{body::to_bytes, http::StatusCode};
use devdesk_api::middleware::{auth, error_handling::map_error};
use devdesk_core::errors::{DeskError, IdentityErrorCode};
use rstest::rstest;
use serde_json::Value;

#[rstest]
#[case(DeskError::NotFound("Resource not found".to_string()), StatusCode::NOT_FOUND)]
#[case(DeskError::Validation("Invalid input".to_string()), StatusCode::BAD_REQUEST)]
#[case(DeskError::Authentication("Invalid session".to_string()), StatusCode::UNAUTHORIZED)]
#[case(DeskError::Authorization("Not authorized".to_string()), StatusCode::FORBIDDEN)]
#[case(DeskError::Conflict("Slot taken".to_string()), StatusCode::CONFLICT)]
#[case(DeskError::Database(eyre::eyre!("Database error")), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(DeskError::Identity(IdentityErrorCode::EmailAlreadyInUse), StatusCode::CONFLICT)]
#[case(DeskError::Identity(IdentityErrorCode::InvalidEmail), StatusCode::BAD_REQUEST)]
#[case(DeskError::Identity(IdentityErrorCode::MissingSession), StatusCode::UNAUTHORIZED)]
fn errors_map_to_statuses(#[case] error: DeskError, #[case] status: StatusCode) {
    assert_eq!(map_error(error).status(), status);
}

#[test]
fn internal_errors_are_server_errors() {
    let error = DeskError::Internal(Box::new(std::io::Error::new(
        std::io::ErrorKind::Other,
        "Internal error",
    )));

    assert_eq!(map_error(error).status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn identity_errors_carry_their_code() {
    let response = map_error(DeskError::Identity(IdentityErrorCode::WrongPassword));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["code"], "auth/wrong-password");
    assert_eq!(body["error"], "Wrong password");
}

#[test]
fn hashed_passwords_verify() {
    let hashed = auth::hash_password("test_password").unwrap();

    assert_ne!(hashed, "test_password");
    assert!(hashed.starts_with("$argon2"));
    assert!(auth::verify_password("test_password", &hashed).unwrap());
    assert!(!auth::verify_password("wrong_password", &hashed).unwrap());
}
