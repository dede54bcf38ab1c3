use std::sync::{Arc, Mutex};

use axum::http::header::AUTHORIZATION;
use devdesk_core::{
    access::{AccessDecision, NavigationResponse, RouteArea},
    models::user::Role,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use crate::test_utils::{bearer, stranger, user, TestContext};

#[tokio::test]
async fn signed_out_visitors_are_sent_to_login() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .get("/api/navigation")
        .add_query_param("path", "/admin")
        .await;

    response.assert_status_ok();
    let body: NavigationResponse = response.json();
    assert_eq!(body.area, RouteArea::Admin);
    assert_eq!(body.role, None);
    assert_eq!(body.decision, AccessDecision::Redirect("/login".to_string()));
}

#[rstest]
#[case(Role::User, "/programmer", AccessDecision::Redirect("/portfolio".to_string()))]
#[case(Role::User, "/user-profile", AccessDecision::Allow)]
#[case(Role::Programmer, "/admin", AccessDecision::Redirect("/programmer".to_string()))]
#[case(Role::Admin, "/programmer", AccessDecision::Allow)]
#[case(Role::Admin, "/admin/users", AccessDecision::Allow)]
#[tokio::test]
async fn roles_map_to_areas(
    #[case] role: Role,
    #[case] path: &str,
    #[case] expected: AccessDecision,
) {
    let mut ctx = TestContext::new();
    let visitor = stranger(role);
    ctx.sign_in("visitor-token", &visitor);

    let server = ctx.server();
    let response = server
        .get("/api/navigation")
        .add_query_param("path", path)
        .add_header(AUTHORIZATION, bearer("visitor-token"))
        .await;

    let body: NavigationResponse = response.json();
    assert_eq!(body.role, Some(role));
    assert_eq!(body.decision, expected);
}

#[tokio::test]
async fn promotion_applies_on_the_next_request() {
    let mut ctx = TestContext::new();
    let visitor = user(Role::User, "Linus");
    let uid = visitor.uid;
    let stored_role = Arc::new(Mutex::new(Role::User));

    ctx.store
        .expect_session_owner()
        .returning(move |_| Ok(Some(uid)));
    let role = Arc::clone(&stored_role);
    ctx.store.expect_get_user().returning(move |_: Uuid| {
        let mut current = visitor.clone();
        current.role = *role.lock().unwrap();
        Ok(Some(current))
    });

    let server = ctx.server();
    let check = || {
        server
            .get("/api/navigation")
            .add_query_param("path", "/programmer")
            .add_header(AUTHORIZATION, bearer("linus-token"))
    };

    let before: NavigationResponse = check().await.json();
    assert!(!before.decision.is_allowed());

    *stored_role.lock().unwrap() = Role::Programmer;

    let after: NavigationResponse = check().await.json();
    assert_eq!(after.role, Some(Role::Programmer));
    assert!(after.decision.is_allowed());
}
