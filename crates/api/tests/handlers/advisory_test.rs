use axum::http::{header::AUTHORIZATION, StatusCode};
use devdesk_core::models::{
    advisory::{AdvisoryResponse, AdvisoryStatus, StepOutcome},
    notification::{DeliveryStatus, NotificationType},
    time_slot::AvailabilityResponse,
    user::Role,
};
use mockall::predicate::{always, eq};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::test_utils::{
    advisory, at, bearer, schedule, stored_advisory, stored_notification, stranger, user,
    TestContext,
};

const DATE: &str = "2025-06-10";

#[tokio::test]
async fn availability_marks_held_slots() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let requester = user(Role::User, "Grace");
    let window = schedule(&programmer, DATE, "09:00", "12:00");
    let held = advisory(&requester, &programmer, DATE, "10:00", AdvisoryStatus::Approved);
    let held_id = held.id;

    ctx.store
        .expect_schedules_for_programmer()
        .with(eq(programmer.uid), eq(true))
        .returning(move |_, _| Ok(vec![window.clone()]));
    ctx.store
        .expect_slot_holders()
        .returning(move |_, _| Ok(vec![held.clone()]));

    let server = ctx.server();
    let response = server
        .get(&format!("/api/programmers/{}/availability", programmer.uid))
        .add_query_param("date", DATE)
        .await;

    response.assert_status_ok();
    let body: AvailabilityResponse = response.json();
    let slots: Vec<(String, bool)> = body
        .slots
        .iter()
        .map(|slot| (slot.time.to_string(), slot.available))
        .collect();
    assert_eq!(
        slots,
        vec![
            ("09:00".to_string(), true),
            ("10:00".to_string(), false),
            ("11:00".to_string(), true),
        ]
    );
    assert_eq!(body.slots[1].advisory_id, Some(held_id));
}

#[tokio::test]
async fn past_dates_have_no_slots() {
    let ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");

    let server = ctx.server();
    let response = server
        .get(&format!("/api/programmers/{}/availability", programmer.uid))
        .add_query_param("date", "2025-05-01")
        .await;

    response.assert_status_ok();
    let body: AvailabilityResponse = response.json();
    assert!(body.slots.is_empty());
}

#[tokio::test]
async fn booking_a_free_slot_runs_every_step() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let requester = user(Role::User, "Grace");
    let window = schedule(&programmer, DATE, "09:00", "12:00");
    let held = advisory(&requester, &programmer, DATE, "10:00", AdvisoryStatus::Approved);

    ctx.sign_in("grace-token", &requester);
    ctx.expect_user(&programmer);
    ctx.mail_enabled(true);
    ctx.store
        .expect_schedules_for_programmer()
        .returning(move |_, _| Ok(vec![window.clone()]));
    ctx.store
        .expect_slot_holders()
        .returning(move |_, _| Ok(vec![held.clone()]));
    ctx.store
        .expect_create_advisory()
        .withf(|new, exclusive| new.time == at("11:00") && *exclusive)
        .times(1)
        .returning(|new, _| Ok(Some(stored_advisory(new))));
    let programmer_id = programmer.uid;
    ctx.store
        .expect_create_notification()
        .withf(move |new| {
            new.user_id == programmer_id && new.kind == NotificationType::AdvisoryRequested
        })
        .times(1)
        .returning(|new| Ok(stored_notification(new)));
    ctx.mailer
        .expect_send()
        .withf(|email| email.variables["to_email"] == "ada@example.com")
        .times(1)
        .returning(|_| Ok(()));

    let server = ctx.server();
    let response = server
        .post("/api/advisories")
        .add_header(AUTHORIZATION, bearer("grace-token"))
        .json(&json!({
            "programmer_id": programmer.uid,
            "date": DATE,
            "time": "11:00",
            "comment": "Help with lifetimes"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: AdvisoryResponse = response.json();
    assert_eq!(body.advisory.status, AdvisoryStatus::Pending);
    assert_eq!(body.advisory.comment.as_deref(), Some("Help with lifetimes"));
    assert_eq!(body.notification, StepOutcome::Done);
    assert_eq!(body.email, StepOutcome::Done);
}

#[tokio::test]
async fn booking_a_held_slot_is_rejected_before_writing() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let requester = user(Role::User, "Grace");
    let window = schedule(&programmer, DATE, "09:00", "12:00");
    let held = advisory(&requester, &programmer, DATE, "10:00", AdvisoryStatus::Pending);

    ctx.sign_in("grace-token", &requester);
    ctx.expect_user(&programmer);
    ctx.store
        .expect_schedules_for_programmer()
        .returning(move |_, _| Ok(vec![window.clone()]));
    ctx.store
        .expect_slot_holders()
        .returning(move |_, _| Ok(vec![held.clone()]));
    ctx.store.expect_create_advisory().times(0);

    let server = ctx.server();
    let response = server
        .post("/api/advisories")
        .add_header(AUTHORIZATION, bearer("grace-token"))
        .json(&json!({ "programmer_id": programmer.uid, "date": DATE, "time": "10:00" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn losing_the_slot_race_is_a_conflict() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let requester = user(Role::User, "Grace");
    let window = schedule(&programmer, DATE, "09:00", "12:00");

    ctx.sign_in("grace-token", &requester);
    ctx.expect_user(&programmer);
    ctx.store
        .expect_schedules_for_programmer()
        .returning(move |_, _| Ok(vec![window.clone()]));
    ctx.store.expect_slot_holders().returning(|_, _| Ok(vec![]));
    ctx.store
        .expect_create_advisory()
        .times(1)
        .returning(|_, _| Ok(None));
    ctx.store.expect_create_notification().times(0);

    let server = ctx.server();
    let response = server
        .post("/api/advisories")
        .add_header(AUTHORIZATION, bearer("grace-token"))
        .json(&json!({ "programmer_id": programmer.uid, "date": DATE, "time": "09:00" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn email_failure_does_not_fail_the_booking() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let requester = user(Role::User, "Grace");
    let window = schedule(&programmer, DATE, "09:00", "12:00");

    ctx.sign_in("grace-token", &requester);
    ctx.expect_user(&programmer);
    ctx.mail_enabled(true);
    ctx.store
        .expect_schedules_for_programmer()
        .returning(move |_, _| Ok(vec![window.clone()]));
    ctx.store.expect_slot_holders().returning(|_, _| Ok(vec![]));
    ctx.store
        .expect_create_advisory()
        .returning(|new, _| Ok(Some(stored_advisory(new))));
    ctx.store
        .expect_create_notification()
        .returning(|_| Err(eyre::eyre!("notifications table unavailable")));
    ctx.mailer
        .expect_send()
        .returning(|_| Err(eyre::eyre!("Email service responded with 503")));

    let server = ctx.server();
    let response = server
        .post("/api/advisories")
        .add_header(AUTHORIZATION, bearer("grace-token"))
        .json(&json!({ "programmer_id": programmer.uid, "date": DATE, "time": "09:00" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: AdvisoryResponse = response.json();
    assert_eq!(body.advisory.status, AdvisoryStatus::Pending);
    assert!(matches!(body.notification, StepOutcome::Failed(_)));
    assert!(matches!(body.email, StepOutcome::Failed(_)));
}

#[tokio::test]
async fn booking_yourself_is_invalid() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    ctx.sign_in("ada-token", &programmer);

    let server = ctx.server();
    let response = server
        .post("/api/advisories")
        .add_header(AUTHORIZATION, bearer("ada-token"))
        .json(&json!({ "programmer_id": programmer.uid, "date": DATE, "time": "09:00" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn approving_notifies_and_logs_the_email() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let requester = user(Role::User, "Grace");
    let pending = advisory(&requester, &programmer, DATE, "11:00", AdvisoryStatus::Pending);
    let advisory_id = pending.id;

    ctx.sign_in("ada-token", &programmer);
    ctx.mail_enabled(true);
    let stored = pending.clone();
    ctx.store
        .expect_get_advisory()
        .with(eq(advisory_id))
        .returning(move |_| Ok(Some(stored.clone())));
    let approved = {
        let mut advisory = pending.clone();
        advisory.status = AdvisoryStatus::Approved;
        advisory.response_message = Some("Advisory approved".to_string());
        advisory
    };
    ctx.store
        .expect_transition_advisory()
        .with(
            eq(advisory_id),
            eq(AdvisoryStatus::Pending),
            eq(AdvisoryStatus::Approved),
            eq(Some("Advisory approved".to_string())),
        )
        .times(1)
        .returning(move |_, _, _, _| Ok(Some(approved.clone())));
    let requester_id = requester.uid;
    ctx.store
        .expect_create_notification()
        .withf(move |new| {
            new.user_id == requester_id
                && new.kind == NotificationType::AdvisoryApproved
                && new.sent_by_email
        })
        .times(1)
        .returning(|new| Ok(stored_notification(new)));
    ctx.mailer.expect_send().times(1).returning(|_| Ok(()));
    ctx.store
        .expect_log_external()
        .withf(|entry| entry.status == DeliveryStatus::Sent && entry.recipient == "grace@example.com")
        .times(1)
        .returning(|_| Ok(()));

    let server = ctx.server();
    let response = server
        .post(&format!("/api/advisories/{}/approve", advisory_id))
        .add_header(AUTHORIZATION, bearer("ada-token"))
        .await;

    response.assert_status_ok();
    let body: AdvisoryResponse = response.json();
    assert_eq!(body.advisory.status, AdvisoryStatus::Approved);
    assert_eq!(body.notification, StepOutcome::Done);
    assert_eq!(body.email, StepOutcome::Done);
}

#[tokio::test]
async fn re_approving_is_idempotent() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let requester = user(Role::User, "Grace");
    let approved = advisory(&requester, &programmer, DATE, "11:00", AdvisoryStatus::Approved);
    let advisory_id = approved.id;

    ctx.sign_in("ada-token", &programmer);
    ctx.store
        .expect_get_advisory()
        .returning(move |_| Ok(Some(approved.clone())));
    ctx.store.expect_transition_advisory().times(0);
    ctx.store.expect_create_notification().times(0);
    ctx.mailer.expect_send().times(0);

    let server = ctx.server();
    let response = server
        .post(&format!("/api/advisories/{}/approve", advisory_id))
        .add_header(AUTHORIZATION, bearer("ada-token"))
        .json(&json!({ "message": "See you there" }))
        .await;

    response.assert_status_ok();
    let body: AdvisoryResponse = response.json();
    assert_eq!(body.advisory.status, AdvisoryStatus::Approved);
    assert_eq!(body.notification, StepOutcome::Skipped);
    assert_eq!(body.email, StepOutcome::Skipped);
}

#[tokio::test]
async fn re_rejecting_without_a_message_is_idempotent() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let requester = user(Role::User, "Grace");
    let rejected = advisory(&requester, &programmer, DATE, "11:00", AdvisoryStatus::Rejected);
    let advisory_id = rejected.id;

    ctx.sign_in("ada-token", &programmer);
    ctx.store
        .expect_get_advisory()
        .returning(move |_| Ok(Some(rejected.clone())));
    ctx.store.expect_transition_advisory().times(0);
    ctx.store.expect_create_notification().times(0);
    ctx.mailer.expect_send().times(0);

    let server = ctx.server();
    let response = server
        .post(&format!("/api/advisories/{}/reject", advisory_id))
        .add_header(AUTHORIZATION, bearer("ada-token"))
        .await;

    response.assert_status_ok();
    let body: AdvisoryResponse = response.json();
    assert_eq!(body.advisory.status, AdvisoryStatus::Rejected);
    assert_eq!(body.notification, StepOutcome::Skipped);
    assert_eq!(body.email, StepOutcome::Skipped);
}

#[tokio::test]
async fn rejecting_requires_a_message() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let requester = user(Role::User, "Grace");
    let pending = advisory(&requester, &programmer, DATE, "11:00", AdvisoryStatus::Pending);
    let advisory_id = pending.id;

    ctx.sign_in("ada-token", &programmer);
    ctx.store
        .expect_get_advisory()
        .returning(move |_| Ok(Some(pending.clone())));
    ctx.store.expect_transition_advisory().times(0);

    let server = ctx.server();
    let response = server
        .post(&format!("/api/advisories/{}/reject", advisory_id))
        .add_header(AUTHORIZATION, bearer("ada-token"))
        .json(&json!({ "message": "   " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_programmer_can_approve() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let requester = user(Role::User, "Grace");
    let pending = advisory(&requester, &programmer, DATE, "11:00", AdvisoryStatus::Pending);
    let advisory_id = pending.id;

    ctx.sign_in("grace-token", &requester);
    ctx.store
        .expect_get_advisory()
        .returning(move |_| Ok(Some(pending.clone())));
    ctx.store.expect_transition_advisory().times(0);

    let server = ctx.server();
    let response = server
        .post(&format!("/api/advisories/{}/approve", advisory_id))
        .add_header(AUTHORIZATION, bearer("grace-token"))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn requester_can_cancel_without_side_effects() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let requester = user(Role::User, "Grace");
    let pending = advisory(&requester, &programmer, DATE, "11:00", AdvisoryStatus::Pending);
    let advisory_id = pending.id;
    let cancelled = {
        let mut advisory = pending.clone();
        advisory.status = AdvisoryStatus::Cancelled;
        advisory
    };

    ctx.sign_in("grace-token", &requester);
    ctx.store
        .expect_get_advisory()
        .returning(move |_| Ok(Some(pending.clone())));
    ctx.store
        .expect_transition_advisory()
        .with(always(), eq(AdvisoryStatus::Pending), eq(AdvisoryStatus::Cancelled), eq(None::<String>))
        .times(1)
        .returning(move |_, _, _, _| Ok(Some(cancelled.clone())));
    ctx.store.expect_create_notification().times(0);

    let server = ctx.server();
    let response = server
        .post(&format!("/api/advisories/{}/cancel", advisory_id))
        .add_header(AUTHORIZATION, bearer("grace-token"))
        .await;

    response.assert_status_ok();
    let body: AdvisoryResponse = response.json();
    assert_eq!(body.advisory.status, AdvisoryStatus::Cancelled);
    assert_eq!(body.email, StepOutcome::Skipped);
}

#[tokio::test]
async fn concurrent_update_surfaces_as_conflict() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let requester = user(Role::User, "Grace");
    let pending = advisory(&requester, &programmer, DATE, "11:00", AdvisoryStatus::Pending);
    let advisory_id = pending.id;

    ctx.sign_in("ada-token", &programmer);
    ctx.store
        .expect_get_advisory()
        .returning(move |_| Ok(Some(pending.clone())));
    ctx.store
        .expect_transition_advisory()
        .returning(|_, _, _, _| Ok(None));

    let server = ctx.server();
    let response = server
        .post(&format!("/api/advisories/{}/reject", advisory_id))
        .add_header(AUTHORIZATION, bearer("ada-token"))
        .json(&json!({ "message": "Fully booked that week" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn outsiders_cannot_read_an_advisory() {
    let mut ctx = TestContext::new();
    let programmer = user(Role::Programmer, "Ada");
    let requester = user(Role::User, "Grace");
    let outsider = stranger(Role::User);
    let pending = advisory(&requester, &programmer, DATE, "11:00", AdvisoryStatus::Pending);
    let advisory_id = pending.id;

    ctx.sign_in("linus-token", &outsider);
    ctx.store
        .expect_get_advisory()
        .returning(move |_| Ok(Some(pending.clone())));

    let server = ctx.server();
    server
        .get(&format!("/api/advisories/{}", advisory_id))
        .add_header(AUTHORIZATION, bearer("linus-token"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
