use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clock::ClockTime;

/// One bookable hour inside a schedule window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: ClockTime,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub programmer_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}
