use axum::{
    body::Bytes,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
};
use devdesk_api::email::EmailTemplate;
use devdesk_core::models::{
    contact::{ContactResponse, UploadResponse},
    user::Role,
};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{bearer, user, TestContext};

fn message() -> serde_json::Value {
    json!({
        "from_name": "Grace",
        "from_email": "grace@example.com",
        "message": "Do you take freelance work?"
    })
}

#[tokio::test]
async fn contact_messages_use_the_contact_template() {
    let mut ctx = TestContext::new();
    ctx.mail_enabled(true);
    ctx.mailer
        .expect_send()
        .withf(|email| {
            email.template == EmailTemplate::Contact && email.variables["from_name"] == "Grace"
        })
        .times(1)
        .returning(|_| Ok(()));

    let server = ctx.server();
    let response = server.post("/api/contact").json(&message()).await;

    response.assert_status_ok();
    let body: ContactResponse = response.json();
    assert!(body.success);
}

#[tokio::test]
async fn contact_delivery_failure_is_reported_in_the_body() {
    let mut ctx = TestContext::new();
    ctx.mail_enabled(true);
    ctx.mailer
        .expect_send()
        .returning(|_| Err(eyre::eyre!("Email service responded with 500")));

    let server = ctx.server();
    let response = server.post("/api/contact").json(&message()).await;

    response.assert_status_ok();
    let body: ContactResponse = response.json();
    assert!(!body.success);
}

#[tokio::test]
async fn contact_requires_a_valid_email() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let mut body = message();
    body["from_email"] = json!("grace");

    server
        .post("/api/contact")
        .json(&body)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn uploads_reject_unsupported_types() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    ctx.sign_in("ada-token", &programmer);
    ctx.images.expect_upload().times(0);

    let server = ctx.server();
    server
        .post("/api/uploads/images")
        .add_header(AUTHORIZATION, bearer("ada-token"))
        .add_header(CONTENT_TYPE, HeaderValue::from_static("application/pdf"))
        .bytes(Bytes::from_static(b"%PDF-1.7"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn uploads_return_the_hosted_url() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    ctx.sign_in("ada-token", &programmer);
    ctx.images.expect_is_enabled().return_const(true);
    ctx.images
        .expect_upload()
        .withf(|content_type, bytes| content_type == "image/png" && bytes.len() == 4)
        .times(1)
        .returning(|_, _| Ok("https://images.example.com/abc.png".to_string()));

    let server = ctx.server();
    let response = server
        .post("/api/uploads/images")
        .add_header(AUTHORIZATION, bearer("ada-token"))
        .add_header(CONTENT_TYPE, HeaderValue::from_static("image/png"))
        .bytes(Bytes::from_static(&[0x89, b'P', b'N', b'G']))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: UploadResponse = response.json();
    assert_eq!(body.url, "https://images.example.com/abc.png");
}
