use axum::http::{header::AUTHORIZATION, StatusCode};
use devdesk_api::middleware::auth::hash_password;
use devdesk_core::models::user::{Role, SessionResponse, User, UserCredentials};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::test_utils::{bearer, user, TestContext};

#[tokio::test]
async fn register_creates_a_user_and_session() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_find_credentials()
        .withf(|email| email == "grace@example.com")
        .returning(|_| Ok(None));
    ctx.store
        .expect_create_user()
        .withf(|new| new.role == Role::User && new.password_hash.starts_with("$argon2"))
        .times(1)
        .returning(|new| {
            let mut created = user(new.role, "Grace");
            created.email = new.email;
            created.display_name = new.display_name;
            Ok(created)
        });
    ctx.store
        .expect_create_session()
        .times(1)
        .returning(|_, _| Ok(()));

    let server = ctx.server();
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "  Grace@Example.com ",
            "password": "hopper42",
            "password_confirmation": "hopper42",
            "display_name": "Grace"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: SessionResponse = response.json();
    assert_eq!(body.user.email, "grace@example.com");
    assert_eq!(body.user.role, Role::User);
    assert!(!body.token.is_empty());
}

#[tokio::test]
async fn register_rejects_a_taken_email() {
    let mut ctx = TestContext::new();
    ctx.store.expect_find_credentials().returning(|_| {
        Ok(Some(UserCredentials {
            user: user(Role::User, "Grace"),
            password_hash: "$argon2id$stub".to_string(),
        }))
    });
    ctx.store.expect_create_user().times(0);

    let server = ctx.server();
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "grace@example.com",
            "password": "hopper42",
            "password_confirmation": "hopper42",
            "display_name": "Grace"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["code"], "auth/email-already-in-use");
    assert_eq!(body["error"], "This email is already registered");
}

#[tokio::test]
async fn register_rejects_a_weak_password() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "grace@example.com",
            "password": "123",
            "password_confirmation": "123",
            "display_name": "Grace"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "auth/weak-password");
}

#[tokio::test]
async fn login_checks_the_password() {
    let mut ctx = TestContext::new();
    let account = user(Role::Programmer, "Ada");
    let password_hash = hash_password("analytical").unwrap();
    ctx.store.expect_find_credentials().returning(move |_| {
        Ok(Some(UserCredentials {
            user: account.clone(),
            password_hash: password_hash.clone(),
        }))
    });
    ctx.store
        .expect_create_session()
        .times(1)
        .returning(|_, _| Ok(()));

    let server = ctx.server();

    let wrong = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ada@example.com", "password": "engine" }))
        .await;
    wrong.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = wrong.json();
    assert_eq!(body["code"], "auth/wrong-password");

    let right = server
        .post("/api/auth/login")
        .json(&json!({ "email": "ada@example.com", "password": "analytical" }))
        .await;
    right.assert_status_ok();
    let body: SessionResponse = right.json();
    assert_eq!(body.user.role, Role::Programmer);
}

#[tokio::test]
async fn login_reports_unknown_users() {
    let mut ctx = TestContext::new();
    ctx.store.expect_find_credentials().returning(|_| Ok(None));

    let server = ctx.server();
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "nobody@example.com", "password": "whatever" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["code"], "auth/user-not-found");
}

#[tokio::test]
async fn me_requires_a_session() {
    let mut ctx = TestContext::new();
    let grace = user(Role::User, "Grace");
    ctx.sign_in("grace-token", &grace);
    ctx.store
        .expect_session_owner()
        .returning(|_| Ok(None));

    let server = ctx.server();

    server
        .get("/api/auth/me")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer("stale-token"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, bearer("grace-token"))
        .await;
    response.assert_status_ok();
    let body: User = response.json();
    assert_eq!(body.uid, grace.uid);
}

#[tokio::test]
async fn logout_deletes_the_session() {
    let mut ctx = TestContext::new();
    ctx.store
        .expect_delete_session()
        .withf(|token| token == "grace-token")
        .times(1)
        .returning(|_| Ok(()));

    let server = ctx.server();
    server
        .post("/api/auth/logout")
        .add_header(AUTHORIZATION, bearer("grace-token"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
}
