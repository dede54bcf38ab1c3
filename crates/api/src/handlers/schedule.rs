use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use devdesk_core::{
    errors::DeskError,
    models::{
        clock::ClockTime,
        schedule::{
            CreateScheduleRequest, NewSchedule, Schedule, ScheduleListQuery, ToggleScheduleRequest,
            UpdateScheduleRequest,
        },
        user::{Role, User},
    },
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    middleware::{auth::CurrentUser, error_handling::AppError, guard},
    ApiState,
};

fn not_found(id: Uuid) -> DeskError {
    DeskError::NotFound(format!("Schedule with ID {} not found", id))
}

fn check_window(start: ClockTime, end: ClockTime) -> Result<(), DeskError> {
    if end <= start {
        return Err(DeskError::Validation(
            "End time must be later than start time".to_string(),
        ));
    }
    Ok(())
}

/// Loads a schedule the caller may modify.
async fn owned_schedule(state: &ApiState, user: &User, id: Uuid) -> Result<Schedule, AppError> {
    guard::require_programmer(user)?;
    let schedule = state.store.get_schedule(id).await?.ok_or_else(|| not_found(id))?;
    guard::require_owner_or_admin(user, schedule.programmer_id)?;
    Ok(schedule)
}

#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    guard::require_programmer(&user)?;
    check_window(payload.start_time, payload.end_time)?;

    // Administrators may publish availability for any programmer.
    let programmer = match payload.programmer_id {
        Some(id) if id != user.uid && user.role == Role::Admin => state
            .store
            .get_user(id)
            .await?
            .filter(|candidate| candidate.role == Role::Programmer)
            .ok_or_else(|| DeskError::NotFound(format!("Programmer {} not found", id)))?,
        _ => user.clone(),
    };

    let schedule = state
        .store
        .create_schedule(NewSchedule {
            programmer_id: programmer.uid,
            programmer_name: programmer.visible_name().to_string(),
            date: payload.date,
            start_time: payload.start_time,
            end_time: payload.end_time,
            is_active: payload.is_active,
        })
        .await?;

    info!(schedule_id = %schedule.id, programmer_id = %schedule.programmer_id, "Schedule created");
    Ok((StatusCode::CREATED, Json(schedule)))
}

#[axum::debug_handler]
pub async fn list_schedules(
    State(state): State<Arc<ApiState>>,
    Path(programmer_id): Path<Uuid>,
    Query(query): Query<ScheduleListQuery>,
) -> Result<Json<Vec<Schedule>>, AppError> {
    let schedules = state
        .store
        .schedules_for_programmer(programmer_id, query.active_only)
        .await?;
    Ok(Json(schedules))
}

#[axum::debug_handler]
pub async fn update_schedule(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> Result<Json<Schedule>, AppError> {
    let mut schedule = owned_schedule(&state, &user, id).await?;

    if let Some(date) = payload.date {
        schedule.date = date;
    }
    if let Some(start_time) = payload.start_time {
        schedule.start_time = start_time;
    }
    if let Some(end_time) = payload.end_time {
        schedule.end_time = end_time;
    }
    if let Some(is_active) = payload.is_active {
        schedule.is_active = is_active;
    }
    check_window(schedule.start_time, schedule.end_time)?;

    let saved = state
        .store
        .save_schedule(schedule)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(saved))
}

#[axum::debug_handler]
pub async fn toggle_schedule(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ToggleScheduleRequest>,
) -> Result<Json<Schedule>, AppError> {
    owned_schedule(&state, &user, id).await?;

    let schedule = state
        .store
        .set_schedule_active(id, payload.is_active)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(schedule))
}

#[axum::debug_handler]
pub async fn delete_schedule(
    State(state): State<Arc<ApiState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    owned_schedule(&state, &user, id).await?;

    if !state.store.delete_schedule(id).await? {
        return Err(not_found(id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}
