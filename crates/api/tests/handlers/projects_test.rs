use axum::http::{header::AUTHORIZATION, StatusCode};
use chrono::Utc;
use devdesk_core::models::{
    project::{Project, ProjectRequest},
    user::Role,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::test_utils::{bearer, user, TestContext};

fn payload() -> Value {
    json!({
        "name": "Ticket desk",
        "description": "Help desk with SLA tracking",
        "type": "professional",
        "participation": ["backend", "database"],
        "technologies": ["Rust", " axum ", ""],
        "repository_url": "https://github.com/example/ticket-desk",
        "demo_url": "https://ticket-desk.example.com",
        "image_url": "https://images.example.com/ticket-desk.png"
    })
}

fn stored(programmer_id: Uuid, request: ProjectRequest) -> Project {
    Project {
        id: Uuid::new_v4(),
        programmer_id,
        name: request.name,
        description: request.description,
        category: request.category,
        participation: request.participation,
        technologies: request.technologies,
        repository_url: request.repository_url,
        demo_url: request.demo_url,
        image_url: request.image_url,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn programmers_create_projects() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    ctx.sign_in("ada-token", &programmer);
    let owner = programmer.uid;
    ctx.store
        .expect_create_project()
        .withf(move |programmer_id, _| *programmer_id == owner)
        .times(1)
        .returning(|programmer_id, request| Ok(stored(programmer_id, request)));

    let server = ctx.server();
    let response = server
        .post("/api/projects")
        .add_header(AUTHORIZATION, bearer("ada-token"))
        .json(&payload())
        .await;

    response.assert_status(StatusCode::CREATED);
    let project: Project = response.json();
    assert_eq!(project.programmer_id, programmer.uid);
    assert_eq!(project.technologies, vec!["Rust".to_string(), "axum".to_string()]);
}

#[tokio::test]
async fn users_cannot_create_projects() {
    let mut ctx = TestContext::new();
    let visitor = user(Role::User, "Grace");
    ctx.sign_in("grace-token", &visitor);
    ctx.store.expect_create_project().times(0);

    let server = ctx.server();
    server
        .post("/api/projects")
        .add_header(AUTHORIZATION, bearer("grace-token"))
        .json(&payload())
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn malformed_urls_are_rejected() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    ctx.sign_in("ada-token", &programmer);
    ctx.store.expect_create_project().times(0);

    let mut body = payload();
    body["demo_url"] = json!("ticket-desk.example.com");

    let server = ctx.server();
    let response = server
        .post("/api/projects")
        .add_header(AUTHORIZATION, bearer("ada-token"))
        .json(&body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_owner_or_an_admin_may_edit() {
    let mut ctx = TestContext::new();
    let owner = user(Role::Programmer, "Ada");
    let rival = user(Role::Programmer, "Linus");
    let admin = user(Role::Admin, "Root");
    let request: ProjectRequest = serde_json::from_value(payload()).unwrap();
    let existing = stored(owner.uid, request);
    let project_id = existing.id;

    ctx.sign_in("rival-token", &rival);
    ctx.sign_in("admin-token", &admin);
    ctx.store
        .expect_get_project()
        .returning(move |_| Ok(Some(existing.clone())));
    ctx.store
        .expect_delete_project()
        .times(1)
        .returning(|_| Ok(true));

    let server = ctx.server();
    server
        .delete(&format!("/api/projects/{}", project_id))
        .add_header(AUTHORIZATION, bearer("rival-token"))
        .await
        .assert_status(StatusCode::FORBIDDEN);
    server
        .delete(&format!("/api/projects/{}", project_id))
        .add_header(AUTHORIZATION, bearer("admin-token"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
}
