//! # Store
//!
//! Storage seams used by the API layer. Each trait covers one collection and
//! returns domain models; [`PgStore`] implements all of them on top of the
//! query functions in [`crate::repositories`]. Handlers only see
//! `Arc<dyn Store>`, which lets tests swap in the mocks from
//! [`crate::mock::repositories`].

use async_trait::async_trait;
use chrono::NaiveDate;
use devdesk_core::models::{
    advisory::{Advisory, AdvisoryStatus, NewAdvisory},
    notification::{ExternalNotification, NewNotification, Notification},
    project::{Project, ProjectRequest},
    schedule::{NewSchedule, Schedule},
    user::{NewUser, Role, UpdateProfileRequest, User, UserCredentials},
};
use eyre::Result;
use uuid::Uuid;

use crate::{
    models::convert_all,
    repositories::{advisory, notification, project, schedule, session, user},
    DbPool,
};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn get_user(&self, uid: Uuid) -> Result<Option<User>>;
    async fn find_credentials(&self, email: String) -> Result<Option<UserCredentials>>;
    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>>;
    async fn assign_role(&self, uid: Uuid, role: Role) -> Result<Option<User>>;
    async fn update_profile(&self, uid: Uuid, profile: UpdateProfileRequest) -> Result<Option<User>>;
    async fn delete_user(&self, uid: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, uid: Uuid, token: String) -> Result<()>;
    async fn session_owner(&self, token: String) -> Result<Option<Uuid>>;
    async fn delete_session(&self, token: String) -> Result<()>;
}

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn create_schedule(&self, schedule: NewSchedule) -> Result<Schedule>;
    async fn get_schedule(&self, id: Uuid) -> Result<Option<Schedule>>;
    async fn schedules_for_programmer(&self, programmer_id: Uuid, active_only: bool) -> Result<Vec<Schedule>>;
    async fn save_schedule(&self, schedule: Schedule) -> Result<Option<Schedule>>;
    async fn set_schedule_active(&self, id: Uuid, is_active: bool) -> Result<Option<Schedule>>;
    async fn delete_schedule(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait AdvisoryStore: Send + Sync {
    /// `Ok(None)` means the slot was already held and `exclusive` was set.
    async fn create_advisory(&self, advisory: NewAdvisory, exclusive: bool) -> Result<Option<Advisory>>;
    async fn get_advisory(&self, id: Uuid) -> Result<Option<Advisory>>;
    async fn advisories_for_user(&self, user_id: Uuid) -> Result<Vec<Advisory>>;
    async fn advisories_for_programmer(&self, programmer_id: Uuid, status: Option<AdvisoryStatus>) -> Result<Vec<Advisory>>;
    async fn slot_holders(&self, programmer_id: Uuid, date: NaiveDate) -> Result<Vec<Advisory>>;
    async fn transition_advisory(
        &self,
        id: Uuid,
        expected: AdvisoryStatus,
        next: AdvisoryStatus,
        response_message: Option<String>,
    ) -> Result<Option<Advisory>>;
    async fn delete_advisory(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create_project(&self, programmer_id: Uuid, project: ProjectRequest) -> Result<Project>;
    async fn get_project(&self, id: Uuid) -> Result<Option<Project>>;
    async fn projects_for_programmer(&self, programmer_id: Uuid) -> Result<Vec<Project>>;
    async fn replace_project(&self, id: Uuid, project: ProjectRequest) -> Result<Option<Project>>;
    async fn delete_project(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification>;
    async fn notifications_for_user(&self, user_id: Uuid, unread_only: bool) -> Result<Vec<Notification>>;
    async fn unread_count(&self, user_id: Uuid) -> Result<i64>;
    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64>;
    async fn log_external(&self, entry: ExternalNotification) -> Result<()>;
}

/// Every collection the API touches.
pub trait Store:
    UserStore + SessionStore + ScheduleStore + AdvisoryStore + ProjectStore + NotificationStore
{
}

impl<T> Store for T where
    T: UserStore + SessionStore + ScheduleStore + AdvisoryStore + ProjectStore + NotificationStore
{
}

/// Postgres-backed [`Store`].
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        user::create_user(&self.pool, &new_user).await?.try_into()
    }

    async fn get_user(&self, uid: Uuid) -> Result<Option<User>> {
        user::get_user_by_uid(&self.pool, uid)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_credentials(&self, email: String) -> Result<Option<UserCredentials>> {
        user::get_user_by_email(&self.pool, &email)
            .await?
            .map(UserCredentials::try_from)
            .transpose()
    }

    async fn list_users(&self, role: Option<Role>) -> Result<Vec<User>> {
        convert_all(user::list_users(&self.pool, role).await?)
    }

    async fn assign_role(&self, uid: Uuid, role: Role) -> Result<Option<User>> {
        user::update_role(&self.pool, uid, role)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn update_profile(&self, uid: Uuid, profile: UpdateProfileRequest) -> Result<Option<User>> {
        user::update_profile(&self.pool, uid, &profile)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn delete_user(&self, uid: Uuid) -> Result<bool> {
        user::delete_user(&self.pool, uid).await
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn create_session(&self, uid: Uuid, token: String) -> Result<()> {
        session::create_session(&self.pool, uid, &token).await?;
        Ok(())
    }

    async fn session_owner(&self, token: String) -> Result<Option<Uuid>> {
        Ok(session::get_session(&self.pool, &token)
            .await?
            .map(|session| session.uid))
    }

    async fn delete_session(&self, token: String) -> Result<()> {
        session::delete_session(&self.pool, &token).await
    }
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn create_schedule(&self, new_schedule: NewSchedule) -> Result<Schedule> {
        schedule::create_schedule(&self.pool, &new_schedule)
            .await?
            .try_into()
    }

    async fn get_schedule(&self, id: Uuid) -> Result<Option<Schedule>> {
        schedule::get_schedule_by_id(&self.pool, id)
            .await?
            .map(Schedule::try_from)
            .transpose()
    }

    async fn schedules_for_programmer(&self, programmer_id: Uuid, active_only: bool) -> Result<Vec<Schedule>> {
        convert_all(schedule::get_schedules_by_programmer(&self.pool, programmer_id, active_only).await?)
    }

    async fn save_schedule(&self, updated: Schedule) -> Result<Option<Schedule>> {
        schedule::update_schedule(&self.pool, &updated)
            .await?
            .map(Schedule::try_from)
            .transpose()
    }

    async fn set_schedule_active(&self, id: Uuid, is_active: bool) -> Result<Option<Schedule>> {
        schedule::set_active(&self.pool, id, is_active)
            .await?
            .map(Schedule::try_from)
            .transpose()
    }

    async fn delete_schedule(&self, id: Uuid) -> Result<bool> {
        schedule::delete_schedule(&self.pool, id).await
    }
}

#[async_trait]
impl AdvisoryStore for PgStore {
    async fn create_advisory(&self, new_advisory: NewAdvisory, exclusive: bool) -> Result<Option<Advisory>> {
        advisory::create_advisory(&self.pool, &new_advisory, exclusive)
            .await?
            .map(Advisory::try_from)
            .transpose()
    }

    async fn get_advisory(&self, id: Uuid) -> Result<Option<Advisory>> {
        advisory::get_advisory_by_id(&self.pool, id)
            .await?
            .map(Advisory::try_from)
            .transpose()
    }

    async fn advisories_for_user(&self, user_id: Uuid) -> Result<Vec<Advisory>> {
        convert_all(advisory::get_advisories_by_user(&self.pool, user_id).await?)
    }

    async fn advisories_for_programmer(&self, programmer_id: Uuid, status: Option<AdvisoryStatus>) -> Result<Vec<Advisory>> {
        convert_all(advisory::get_advisories_by_programmer(&self.pool, programmer_id, status).await?)
    }

    async fn slot_holders(&self, programmer_id: Uuid, date: NaiveDate) -> Result<Vec<Advisory>> {
        convert_all(advisory::get_slot_holders(&self.pool, programmer_id, date).await?)
    }

    async fn transition_advisory(
        &self,
        id: Uuid,
        expected: AdvisoryStatus,
        next: AdvisoryStatus,
        response_message: Option<String>,
    ) -> Result<Option<Advisory>> {
        advisory::update_status(&self.pool, id, expected, next, response_message.as_deref())
            .await?
            .map(Advisory::try_from)
            .transpose()
    }

    async fn delete_advisory(&self, id: Uuid) -> Result<bool> {
        advisory::delete_advisory(&self.pool, id).await
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn create_project(&self, programmer_id: Uuid, request: ProjectRequest) -> Result<Project> {
        project::create_project(&self.pool, programmer_id, &request)
            .await?
            .try_into()
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<Project>> {
        project::get_project_by_id(&self.pool, id)
            .await?
            .map(Project::try_from)
            .transpose()
    }

    async fn projects_for_programmer(&self, programmer_id: Uuid) -> Result<Vec<Project>> {
        convert_all(project::get_projects_by_programmer(&self.pool, programmer_id).await?)
    }

    async fn replace_project(&self, id: Uuid, request: ProjectRequest) -> Result<Option<Project>> {
        project::update_project(&self.pool, id, &request)
            .await?
            .map(Project::try_from)
            .transpose()
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool> {
        project::delete_project(&self.pool, id).await
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn create_notification(&self, new_notification: NewNotification) -> Result<Notification> {
        notification::create_notification(&self.pool, &new_notification)
            .await?
            .try_into()
    }

    async fn notifications_for_user(&self, user_id: Uuid, unread_only: bool) -> Result<Vec<Notification>> {
        convert_all(notification::get_notifications_by_user(&self.pool, user_id, unread_only).await?)
    }

    async fn unread_count(&self, user_id: Uuid) -> Result<i64> {
        notification::count_unread(&self.pool, user_id).await
    }

    async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        notification::mark_as_read(&self.pool, id, user_id).await
    }

    async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        notification::mark_all_as_read(&self.pool, user_id).await
    }

    async fn log_external(&self, entry: ExternalNotification) -> Result<()> {
        notification::log_external_notification(&self.pool, &entry).await
    }
}
