use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{advisory::Advisory, clock::ClockTime};
use crate::errors::DeskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    AdvisoryRequested,
    AdvisoryApproved,
    AdvisoryRejected,
    AdvisoryCompleted,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::AdvisoryRequested => "advisory_requested",
            NotificationType::AdvisoryApproved => "advisory_approved",
            NotificationType::AdvisoryRejected => "advisory_rejected",
            NotificationType::AdvisoryCompleted => "advisory_completed",
            NotificationType::System => "system",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "advisory_requested" => Ok(NotificationType::AdvisoryRequested),
            "advisory_approved" => Ok(NotificationType::AdvisoryApproved),
            "advisory_rejected" => Ok(NotificationType::AdvisoryRejected),
            "advisory_completed" => Ok(NotificationType::AdvisoryCompleted),
            "system" => Ok(NotificationType::System),
            other => Err(DeskError::Validation(format!(
                "Unknown notification type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub advisory_id: Option<Uuid>,
    pub related_user_id: Option<Uuid>,
    pub related_user_name: Option<String>,
    pub related_user_email: Option<String>,
    pub advisory_date: Option<NaiveDate>,
    pub advisory_time: Option<ClockTime>,
    pub sent_by_email: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub advisory_id: Option<Uuid>,
    pub related_user_id: Option<Uuid>,
    pub related_user_name: Option<String>,
    pub related_user_email: Option<String>,
    pub advisory_date: Option<NaiveDate>,
    pub advisory_time: Option<ClockTime>,
    pub sent_by_email: bool,
}

impl NewNotification {
    /// Tells the programmer that `advisory` was requested.
    pub fn advisory_requested(advisory: &Advisory) -> Self {
        Self {
            user_id: advisory.programmer_id,
            kind: NotificationType::AdvisoryRequested,
            title: "New advisory request".to_string(),
            message: format!(
                "{} ({}) requested an advisory on {} at {}",
                advisory.user_name, advisory.user_email, advisory.date, advisory.time
            ),
            advisory_id: Some(advisory.id),
            related_user_id: Some(advisory.user_id),
            related_user_name: Some(advisory.user_name.clone()),
            related_user_email: Some(advisory.user_email.clone()),
            advisory_date: Some(advisory.date),
            advisory_time: Some(advisory.time),
            sent_by_email: false,
        }
    }

    /// Tells the requester that the programmer answered.
    ///
    /// `advisory` must already carry its new status; `None` is returned for
    /// statuses that do not notify the requester.
    pub fn advisory_answered(advisory: &Advisory, programmer_email: &str) -> Option<Self> {
        use super::advisory::AdvisoryStatus;

        let (kind, title, message) = match advisory.status {
            AdvisoryStatus::Approved => (
                NotificationType::AdvisoryApproved,
                "Advisory approved",
                format!(
                    "{} approved your advisory on {} at {}",
                    advisory.programmer_name, advisory.date, advisory.time
                ),
            ),
            AdvisoryStatus::Rejected => (
                NotificationType::AdvisoryRejected,
                "Advisory rejected",
                format!("{} rejected your advisory request", advisory.programmer_name),
            ),
            AdvisoryStatus::Completed => (
                NotificationType::AdvisoryCompleted,
                "Advisory completed",
                format!(
                    "Your advisory with {} on {} at {} was marked as completed",
                    advisory.programmer_name, advisory.date, advisory.time
                ),
            ),
            _ => return None,
        };

        let message = match advisory.response_message.as_deref() {
            Some(reply) if kind != NotificationType::AdvisoryCompleted => {
                format!("{}. Message: \"{}\"", message, reply)
            }
            _ => message,
        };

        Some(Self {
            user_id: advisory.user_id,
            kind,
            title: title.to_string(),
            message,
            advisory_id: Some(advisory.id),
            related_user_id: Some(advisory.programmer_id),
            related_user_name: Some(advisory.programmer_name.clone()),
            related_user_email: Some(programmer_email.to_string()),
            advisory_date: Some(advisory.date),
            advisory_time: Some(advisory.time),
            sent_by_email: kind != NotificationType::AdvisoryCompleted,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Sent => "sent",
            DeliveryStatus::Failed => "failed",
        }
    }
}

/// Log entry for one outbound message attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalNotification {
    pub recipient: String,
    pub subject: String,
    pub message: String,
    pub channel: String,
    pub status: DeliveryStatus,
}
