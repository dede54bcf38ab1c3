use axum::{
    extract::{Path, Query, State},
    Json,
};
use devdesk_core::models::time_slot::{AvailabilityQuery, AvailabilityResponse};
use std::sync::Arc;
use uuid::Uuid;

use crate::{booking, middleware::error_handling::AppError, ApiState};

/// Bookable hourly slots for one programmer on one date.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path(programmer_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let slots = booking::available_slots(&state, programmer_id, query.date).await?;

    Ok(Json(AvailabilityResponse {
        programmer_id,
        date: query.date,
        slots,
    }))
}
