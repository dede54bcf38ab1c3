use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::clock::ClockTime;
use crate::errors::{DeskError, DeskResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Completed,
}

impl AdvisoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdvisoryStatus::Pending => "pending",
            AdvisoryStatus::Approved => "approved",
            AdvisoryStatus::Rejected => "rejected",
            AdvisoryStatus::Cancelled => "cancelled",
            AdvisoryStatus::Completed => "completed",
        }
    }

    /// Whether an advisory in this status occupies its slot.
    pub fn holds_slot(&self) -> bool {
        matches!(self, AdvisoryStatus::Pending | AdvisoryStatus::Approved)
    }

    /// Applies a response action, returning the resulting transition.
    ///
    /// Repeating an action that already produced the current status is a
    /// no-op rather than an error, so a retried approval never notifies twice.
    pub fn apply(self, action: AdvisoryAction) -> DeskResult<Transition> {
        use AdvisoryAction::*;
        use AdvisoryStatus::*;

        let target = action.target();
        if self == target {
            return Ok(Transition::Unchanged(self));
        }

        let allowed = match action {
            Approve | Reject => self == Pending,
            Cancel => matches!(self, Pending | Approved),
            Complete => self == Approved,
        };

        if allowed {
            Ok(Transition::Changed { from: self, to: target })
        } else {
            Err(DeskError::Conflict(format!(
                "Cannot {} an advisory that is {}",
                action, self
            )))
        }
    }
}

impl fmt::Display for AdvisoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdvisoryStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AdvisoryStatus::Pending),
            "approved" => Ok(AdvisoryStatus::Approved),
            "rejected" => Ok(AdvisoryStatus::Rejected),
            "cancelled" => Ok(AdvisoryStatus::Cancelled),
            "completed" => Ok(AdvisoryStatus::Completed),
            other => Err(DeskError::Validation(format!(
                "Unknown advisory status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryAction {
    Approve,
    Reject,
    Cancel,
    Complete,
}

impl AdvisoryAction {
    pub fn target(&self) -> AdvisoryStatus {
        match self {
            AdvisoryAction::Approve => AdvisoryStatus::Approved,
            AdvisoryAction::Reject => AdvisoryStatus::Rejected,
            AdvisoryAction::Cancel => AdvisoryStatus::Cancelled,
            AdvisoryAction::Complete => AdvisoryStatus::Completed,
        }
    }
}

impl fmt::Display for AdvisoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            AdvisoryAction::Approve => "approve",
            AdvisoryAction::Reject => "reject",
            AdvisoryAction::Cancel => "cancel",
            AdvisoryAction::Complete => "complete",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Changed {
        from: AdvisoryStatus,
        to: AdvisoryStatus,
    },
    Unchanged(AdvisoryStatus),
}

/// A booking request for one hourly slot with a programmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub programmer_id: Uuid,
    pub programmer_name: String,
    pub date: NaiveDate,
    pub time: ClockTime,
    pub comment: Option<String>,
    pub status: AdvisoryStatus,
    pub response_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAdvisory {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub programmer_id: Uuid,
    pub programmer_name: String,
    pub date: NaiveDate,
    pub time: ClockTime,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdvisoryRequest {
    pub programmer_id: Uuid,
    pub date: NaiveDate,
    pub time: ClockTime,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RespondAdvisoryRequest {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisoryListQuery {
    pub status: Option<AdvisoryStatus>,
}

/// Result of one best-effort side effect that follows a primary write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum StepOutcome {
    Done,
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    pub advisory: Advisory,
    pub notification: StepOutcome,
    pub email: StepOutcome,
}
