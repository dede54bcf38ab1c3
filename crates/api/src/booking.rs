//! # Advisory workflow
//!
//! Booking submission and programmer responses. Each operation performs one
//! primary write that decides success, followed by an ordered list of side
//! steps (in-app notification, email, delivery log). A side step that fails
//! is logged and reported as [`StepOutcome::Failed`]; it never undoes the
//! primary write or fails the request.

use devdesk_core::{
    access::RouteArea,
    availability::{is_bookable, resolve_slots},
    errors::{DeskError, DeskResult},
    models::{
        advisory::{
            Advisory, AdvisoryAction, AdvisoryResponse, AdvisoryStatus, CreateAdvisoryRequest,
            NewAdvisory, StepOutcome, Transition,
        },
        notification::{DeliveryStatus, ExternalNotification, NewNotification},
        time_slot::TimeSlot,
        user::User,
    },
    validation::validate_comment,
};
use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    email::{EmailTemplate, OutboundEmail},
    ApiState,
};

pub const DEFAULT_APPROVAL_MESSAGE: &str = "Advisory approved";

/// Loads a user who can receive bookings.
async fn load_programmer(state: &ApiState, programmer_id: Uuid) -> DeskResult<User> {
    let programmer = state
        .store
        .get_user(programmer_id)
        .await?
        .ok_or_else(|| DeskError::NotFound(format!("Programmer {} not found", programmer_id)))?;

    if !programmer.role.can_enter(RouteArea::Programmer) {
        return Err(DeskError::NotFound(format!(
            "Programmer {} not found",
            programmer_id
        )));
    }

    Ok(programmer)
}

/// Hourly slots for `programmer_id` on `date`, marked against current bookings.
pub async fn available_slots(
    state: &ApiState,
    programmer_id: Uuid,
    date: NaiveDate,
) -> DeskResult<Vec<TimeSlot>> {
    let today = state.clock.today();
    if date < today {
        return Ok(Vec::new());
    }

    let schedules = state.store.schedules_for_programmer(programmer_id, true).await?;
    let holders = state.store.slot_holders(programmer_id, date).await?;

    Ok(resolve_slots(&schedules, &holders, date, today))
}

/// Books a slot for `requester`.
pub async fn submit(
    state: &ApiState,
    requester: &User,
    request: CreateAdvisoryRequest,
) -> DeskResult<AdvisoryResponse> {
    let comment = request
        .comment
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    validate_comment(comment.as_deref())?;

    if request.programmer_id == requester.uid {
        return Err(DeskError::Validation(
            "You cannot book an advisory with yourself".to_string(),
        ));
    }

    let programmer = load_programmer(state, request.programmer_id).await?;

    let today = state.clock.today();
    let schedules = state
        .store
        .schedules_for_programmer(programmer.uid, true)
        .await?;
    let holders = state.store.slot_holders(programmer.uid, request.date).await?;
    if !is_bookable(&schedules, &holders, request.date, request.time, today) {
        return Err(DeskError::Conflict(format!(
            "The {} slot on {} is not available",
            request.time, request.date
        )));
    }

    let new_advisory = NewAdvisory {
        user_id: requester.uid,
        user_name: requester.visible_name().to_string(),
        user_email: requester.email.clone(),
        programmer_id: programmer.uid,
        programmer_name: programmer.visible_name().to_string(),
        date: request.date,
        time: request.time,
        comment,
    };

    let advisory = state
        .store
        .create_advisory(new_advisory, state.booking.exclusive_slots)
        .await?
        .ok_or_else(|| {
            DeskError::Conflict(format!(
                "The {} slot on {} has just been booked",
                request.time, request.date
            ))
        })?;

    info!(advisory_id = %advisory.id, programmer_id = %programmer.uid, "Advisory requested");

    let notification = notify(state, NewNotification::advisory_requested(&advisory)).await;
    let email = send_email(state, request_email(state, &advisory, &programmer)).await;

    Ok(AdvisoryResponse {
        advisory,
        notification,
        email,
    })
}

/// Applies a programmer or requester action to an existing advisory.
pub async fn respond(
    state: &ApiState,
    actor: &User,
    advisory_id: Uuid,
    action: AdvisoryAction,
    message: Option<String>,
) -> DeskResult<AdvisoryResponse> {
    let advisory = state
        .store
        .get_advisory(advisory_id)
        .await?
        .ok_or_else(|| DeskError::NotFound(format!("Advisory {} not found", advisory_id)))?;

    authorize(actor, &advisory, action)?;

    let (from, to) = match advisory.status.apply(action)? {
        Transition::Unchanged(_) => {
            return Ok(AdvisoryResponse {
                advisory,
                notification: StepOutcome::Skipped,
                email: StepOutcome::Skipped,
            });
        }
        Transition::Changed { from, to } => (from, to),
    };

    let message = message
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    let message = match action {
        AdvisoryAction::Approve => {
            Some(message.unwrap_or_else(|| DEFAULT_APPROVAL_MESSAGE.to_string()))
        }
        AdvisoryAction::Reject if message.is_none() => {
            return Err(DeskError::Validation(
                "A message is required to reject an advisory".to_string(),
            ));
        }
        _ => message,
    };

    let advisory = state
        .store
        .transition_advisory(advisory.id, from, to, message)
        .await?
        .ok_or_else(|| {
            DeskError::Conflict("The advisory was updated by someone else".to_string())
        })?;

    info!(advisory_id = %advisory.id, %from, %to, "Advisory status changed");

    let notification = match action {
        AdvisoryAction::Approve | AdvisoryAction::Reject | AdvisoryAction::Complete => {
            match NewNotification::advisory_answered(&advisory, &actor.email) {
                Some(notification) => notify(state, notification).await,
                None => StepOutcome::Skipped,
            }
        }
        AdvisoryAction::Cancel => StepOutcome::Skipped,
    };

    let email = match action {
        AdvisoryAction::Approve | AdvisoryAction::Reject => {
            let email = response_email(&advisory, actor);
            let outcome = send_email(state, email).await;
            log_delivery(state, &advisory, &outcome).await;
            outcome
        }
        AdvisoryAction::Cancel | AdvisoryAction::Complete => StepOutcome::Skipped,
    };

    Ok(AdvisoryResponse {
        advisory,
        notification,
        email,
    })
}

/// Who may apply `action`: approve, reject and complete belong to the
/// programmer; either party may cancel.
fn authorize(actor: &User, advisory: &Advisory, action: AdvisoryAction) -> DeskResult<()> {
    let allowed = match action {
        AdvisoryAction::Approve | AdvisoryAction::Reject | AdvisoryAction::Complete => {
            actor.uid == advisory.programmer_id
        }
        AdvisoryAction::Cancel => {
            actor.uid == advisory.programmer_id || actor.uid == advisory.user_id
        }
    };

    if allowed {
        Ok(())
    } else {
        Err(DeskError::Authorization(format!(
            "You cannot {} this advisory",
            action
        )))
    }
}

async fn notify(state: &ApiState, notification: NewNotification) -> StepOutcome {
    let recipient = notification.user_id;
    match state.store.create_notification(notification).await {
        Ok(_) => StepOutcome::Done,
        Err(err) => {
            warn!(%recipient, error = %err, "Failed to record notification");
            StepOutcome::Failed(err.to_string())
        }
    }
}

async fn send_email(state: &ApiState, email: OutboundEmail) -> StepOutcome {
    if !state.mailer.is_enabled(email.template) {
        return StepOutcome::Skipped;
    }

    let template = email.template;
    match state.mailer.send(email).await {
        Ok(()) => StepOutcome::Done,
        Err(err) => {
            warn!(?template, error = %err, "Failed to send email");
            StepOutcome::Failed(err.to_string())
        }
    }
}

/// Records the response email attempt; skipped sends leave no entry.
async fn log_delivery(state: &ApiState, advisory: &Advisory, outcome: &StepOutcome) {
    let status = match outcome {
        StepOutcome::Done => DeliveryStatus::Sent,
        StepOutcome::Failed(_) => DeliveryStatus::Failed,
        StepOutcome::Skipped => return,
    };

    let entry = ExternalNotification {
        recipient: advisory.user_email.clone(),
        subject: format!("Advisory {}", advisory.status),
        message: advisory.response_message.clone().unwrap_or_default(),
        channel: "email".to_string(),
        status,
    };

    if let Err(err) = state.store.log_external(entry).await {
        warn!(advisory_id = %advisory.id, error = %err, "Failed to log email delivery");
    }
}

fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

fn request_email(state: &ApiState, advisory: &Advisory, programmer: &User) -> OutboundEmail {
    OutboundEmail::new(EmailTemplate::AdvisoryRequested)
        .var("to_email", programmer.email.clone())
        .var("programmer_name", advisory.programmer_name.clone())
        .var("user_name", advisory.user_name.clone())
        .var("user_email", advisory.user_email.clone())
        .var("advisory_date", long_date(advisory.date))
        .var("advisory_time", advisory.time.to_string())
        .var(
            "advisory_comment",
            advisory
                .comment
                .clone()
                .unwrap_or_else(|| "No comment".to_string()),
        )
        .var(
            "dashboard_link",
            format!("{}/programmer", state.booking.public_base_url),
        )
}

fn response_email(advisory: &Advisory, programmer: &User) -> OutboundEmail {
    let approved = advisory.status == AdvisoryStatus::Approved;
    let message = advisory.response_message.clone().unwrap_or_default();

    let (status_text, main_message, rejection_reason) = if approved {
        (
            "APPROVED",
            format!(
                "{} approved your advisory on {} at {}.",
                advisory.programmer_name,
                long_date(advisory.date),
                advisory.time
            ),
            String::new(),
        )
    } else {
        (
            "REJECTED",
            format!(
                "{} could not take your advisory on {} at {}.",
                advisory.programmer_name,
                long_date(advisory.date),
                advisory.time
            ),
            message.clone(),
        )
    };

    OutboundEmail::new(EmailTemplate::AdvisoryResponse)
        .var("to_email", advisory.user_email.clone())
        .var("user_name", advisory.user_name.clone())
        .var("programmer_name", advisory.programmer_name.clone())
        .var("programmer_email", programmer.email.clone())
        .var("advisory_date", long_date(advisory.date))
        .var("advisory_time", advisory.time.to_string())
        .var("status_text", status_text)
        .var("main_message", main_message)
        .var("response_message", message)
        .var("rejection_reason", rejection_reason)
}
