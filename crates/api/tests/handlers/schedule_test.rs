use axum::http::{header::AUTHORIZATION, StatusCode};
use chrono::Utc;
use devdesk_core::models::{
    schedule::{NewSchedule, Schedule},
    user::Role,
};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

use crate::test_utils::{at, bearer, schedule, user, TestContext};

fn stored(new: NewSchedule) -> Schedule {
    Schedule {
        id: Uuid::new_v4(),
        programmer_id: new.programmer_id,
        programmer_name: new.programmer_name,
        date: new.date,
        start_time: new.start_time,
        end_time: new.end_time,
        is_active: new.is_active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn programmers_publish_their_own_windows() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    ctx.sign_in("ada-token", &programmer);
    let owner = programmer.uid;
    ctx.store
        .expect_create_schedule()
        .withf(move |new| new.programmer_id == owner && new.is_active)
        .times(1)
        .returning(|new| Ok(stored(new)));

    let server = ctx.server();
    let response = server
        .post("/api/schedules")
        .add_header(AUTHORIZATION, bearer("ada-token"))
        .json(&json!({
            // Ignored for programmers.
            "programmer_id": Uuid::new_v4(),
            "date": "2025-06-10",
            "start_time": "09:00",
            "end_time": "12:00"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Schedule = response.json();
    assert_eq!(body.programmer_name, "Ada");
    assert_eq!(body.end_time, at("12:00"));
}

#[tokio::test]
async fn admins_publish_for_a_programmer() {
    let mut ctx = TestContext::new();
    let admin = user(Role::Admin, "Root");
    let programmer = user(Role::Programmer, "Ada");
    ctx.sign_in("admin-token", &admin);
    ctx.expect_user(&programmer);
    let owner = programmer.uid;
    ctx.store
        .expect_create_schedule()
        .withf(move |new| new.programmer_id == owner && new.programmer_name == "Ada")
        .times(1)
        .returning(|new| Ok(stored(new)));

    let server = ctx.server();
    server
        .post("/api/schedules")
        .add_header(AUTHORIZATION, bearer("admin-token"))
        .json(&json!({
            "programmer_id": programmer.uid,
            "date": "2025-06-10",
            "start_time": "14:00",
            "end_time": "16:00",
            "is_active": false
        }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn inverted_windows_are_rejected() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    ctx.sign_in("ada-token", &programmer);
    ctx.store.expect_create_schedule().times(0);

    let server = ctx.server();
    server
        .post("/api/schedules")
        .add_header(AUTHORIZATION, bearer("ada-token"))
        .json(&json!({ "date": "2025-06-10", "start_time": "12:00", "end_time": "09:00" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn toggling_someone_elses_window_is_forbidden() {
    let mut ctx = TestContext::new();
    let owner = user(Role::Programmer, "Ada");
    let rival = user(Role::Programmer, "Linus");
    let window = schedule(&owner, "2025-06-10", "09:00", "12:00");
    let schedule_id = window.id;

    ctx.sign_in("rival-token", &rival);
    ctx.store
        .expect_get_schedule()
        .with(eq(schedule_id))
        .returning(move |_| Ok(Some(window.clone())));
    ctx.store.expect_set_schedule_active().times(0);

    let server = ctx.server();
    server
        .put(&format!("/api/schedules/{}/active", schedule_id))
        .add_header(AUTHORIZATION, bearer("rival-token"))
        .json(&json!({ "is_active": false }))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn listing_can_filter_active_windows() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let window = schedule(&programmer, "2025-06-10", "09:00", "12:00");
    ctx.store
        .expect_schedules_for_programmer()
        .with(eq(programmer.uid), eq(true))
        .times(1)
        .returning(move |_, _| Ok(vec![window.clone()]));

    let server = ctx.server();
    let response = server
        .get(&format!("/api/programmers/{}/schedules", programmer.uid))
        .add_query_param("active_only", true)
        .await;

    response.assert_status_ok();
    let body: Vec<Schedule> = response.json();
    assert_eq!(body.len(), 1);
}
