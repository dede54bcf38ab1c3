use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clock::ClockTime;

/// A programmer's working-hours window on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub programmer_id: Uuid,
    pub programmer_name: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub programmer_id: Uuid,
    pub programmer_name: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    /// Only honoured for administrators; programmers always create their own.
    pub programmer_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub date: Option<NaiveDate>,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleScheduleRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleListQuery {
    #[serde(default)]
    pub active_only: bool,
}

fn default_active() -> bool {
    true
}
