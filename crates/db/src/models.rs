//! Row types as they come out of Postgres, plus their conversions into the
//! domain models. Enumerations and clock times are stored as text and parsed
//! on the way out.

use chrono::{DateTime, NaiveDate, Utc};
use devdesk_core::models::{
    advisory::Advisory,
    notification::Notification,
    project::{ParticipationRole, Project, ProjectCategory},
    schedule::Schedule,
    user::{User, UserCredentials},
};
use eyre::{eyre, Report};
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub uid: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub role: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbSession {
    pub token: String,
    pub uid: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbSchedule {
    pub id: Uuid,
    pub programmer_id: Uuid,
    pub programmer_name: String,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbAdvisory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub programmer_id: Uuid,
    pub programmer_name: String,
    pub date: NaiveDate,
    pub time: String,
    pub comment: Option<String>,
    pub status: String,
    pub response_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbProject {
    pub id: Uuid,
    pub programmer_id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub participation: Json<Vec<ParticipationRole>>,
    pub technologies: Vec<String>,
    pub repository_url: String,
    pub demo_url: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbNotification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub advisory_id: Option<Uuid>,
    pub related_user_id: Option<Uuid>,
    pub related_user_name: Option<String>,
    pub related_user_email: Option<String>,
    pub advisory_date: Option<NaiveDate>,
    pub advisory_time: Option<String>,
    pub sent_by_email: bool,
}

impl TryFrom<DbUser> for UserCredentials {
    type Error = Report;

    fn try_from(row: DbUser) -> Result<Self, Self::Error> {
        Ok(UserCredentials {
            user: User {
                uid: row.uid,
                email: row.email,
                display_name: row.display_name,
                photo_url: row.photo_url,
                role: row.role.parse()?,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            password_hash: row.password_hash,
        })
    }
}

impl TryFrom<DbUser> for User {
    type Error = Report;

    fn try_from(row: DbUser) -> Result<Self, Self::Error> {
        UserCredentials::try_from(row).map(|credentials| credentials.user)
    }
}

impl TryFrom<DbSchedule> for Schedule {
    type Error = Report;

    fn try_from(row: DbSchedule) -> Result<Self, Self::Error> {
        Ok(Schedule {
            id: row.id,
            programmer_id: row.programmer_id,
            programmer_name: row.programmer_name,
            date: row.date,
            start_time: row.start_time.parse()?,
            end_time: row.end_time.parse()?,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<DbAdvisory> for Advisory {
    type Error = Report;

    fn try_from(row: DbAdvisory) -> Result<Self, Self::Error> {
        Ok(Advisory {
            id: row.id,
            user_id: row.user_id,
            user_name: row.user_name,
            user_email: row.user_email,
            programmer_id: row.programmer_id,
            programmer_name: row.programmer_name,
            date: row.date,
            time: row.time.parse()?,
            comment: row.comment,
            status: row.status.parse()?,
            response_message: row.response_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<DbProject> for Project {
    type Error = Report;

    fn try_from(row: DbProject) -> Result<Self, Self::Error> {
        let category = match row.category.as_str() {
            "academic" => ProjectCategory::Academic,
            "professional" => ProjectCategory::Professional,
            other => return Err(eyre!("Unknown project category '{}'", other)),
        };

        Ok(Project {
            id: row.id,
            programmer_id: row.programmer_id,
            name: row.name,
            description: row.description,
            category,
            participation: row.participation.0,
            technologies: row.technologies,
            repository_url: row.repository_url,
            demo_url: row.demo_url,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<DbNotification> for Notification {
    type Error = Report;

    fn try_from(row: DbNotification) -> Result<Self, Self::Error> {
        Ok(Notification {
            id: row.id,
            user_id: row.user_id,
            kind: row.kind.parse()?,
            title: row.title,
            message: row.message,
            read: row.read,
            created_at: row.created_at,
            advisory_id: row.advisory_id,
            related_user_id: row.related_user_id,
            related_user_name: row.related_user_name,
            related_user_email: row.related_user_email,
            advisory_date: row.advisory_date,
            advisory_time: row.advisory_time.map(|time| time.parse()).transpose()?,
            sent_by_email: row.sent_by_email,
        })
    }
}

/// Converts a batch of rows, failing on the first malformed one.
pub fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, Report>
where
    T: TryFrom<R, Error = Report>,
{
    rows.into_iter().map(T::try_from).collect()
}
