use async_trait::async_trait;
use chrono::NaiveDate;
use devdesk_core::models::{
    advisory::{Advisory, AdvisoryStatus, NewAdvisory},
    notification::{ExternalNotification, NewNotification, Notification},
    project::{Project, ProjectRequest},
    schedule::{NewSchedule, Schedule},
    user::{NewUser, Role, UpdateProfileRequest, User, UserCredentials},
};
use mockall::mock;
use uuid::Uuid;

use crate::store::{
    AdvisoryStore, NotificationStore, ProjectStore, ScheduleStore, SessionStore, UserStore,
};

// Mock store for testing; one struct so it can stand in for `dyn Store`
mock! {
    pub Store {}

    #[async_trait]
    impl UserStore for Store {
        async fn create_user(&self, user: NewUser) -> eyre::Result<User>;
        async fn get_user(&self, uid: Uuid) -> eyre::Result<Option<User>>;
        async fn find_credentials(&self, email: String) -> eyre::Result<Option<UserCredentials>>;
        async fn list_users(&self, role: Option<Role>) -> eyre::Result<Vec<User>>;
        async fn assign_role(&self, uid: Uuid, role: Role) -> eyre::Result<Option<User>>;
        async fn update_profile(&self, uid: Uuid, profile: UpdateProfileRequest) -> eyre::Result<Option<User>>;
        async fn delete_user(&self, uid: Uuid) -> eyre::Result<bool>;
    }

    #[async_trait]
    impl SessionStore for Store {
        async fn create_session(&self, uid: Uuid, token: String) -> eyre::Result<()>;
        async fn session_owner(&self, token: String) -> eyre::Result<Option<Uuid>>;
        async fn delete_session(&self, token: String) -> eyre::Result<()>;
    }

    #[async_trait]
    impl ScheduleStore for Store {
        async fn create_schedule(&self, schedule: NewSchedule) -> eyre::Result<Schedule>;
        async fn get_schedule(&self, id: Uuid) -> eyre::Result<Option<Schedule>>;
        async fn schedules_for_programmer(&self, programmer_id: Uuid, active_only: bool) -> eyre::Result<Vec<Schedule>>;
        async fn save_schedule(&self, schedule: Schedule) -> eyre::Result<Option<Schedule>>;
        async fn set_schedule_active(&self, id: Uuid, is_active: bool) -> eyre::Result<Option<Schedule>>;
        async fn delete_schedule(&self, id: Uuid) -> eyre::Result<bool>;
    }

    #[async_trait]
    impl AdvisoryStore for Store {
        async fn create_advisory(&self, advisory: NewAdvisory, exclusive: bool) -> eyre::Result<Option<Advisory>>;
        async fn get_advisory(&self, id: Uuid) -> eyre::Result<Option<Advisory>>;
        async fn advisories_for_user(&self, user_id: Uuid) -> eyre::Result<Vec<Advisory>>;
        async fn advisories_for_programmer(&self, programmer_id: Uuid, status: Option<AdvisoryStatus>) -> eyre::Result<Vec<Advisory>>;
        async fn slot_holders(&self, programmer_id: Uuid, date: NaiveDate) -> eyre::Result<Vec<Advisory>>;
        async fn transition_advisory(
            &self,
            id: Uuid,
            expected: AdvisoryStatus,
            next: AdvisoryStatus,
            response_message: Option<String>,
        ) -> eyre::Result<Option<Advisory>>;
        async fn delete_advisory(&self, id: Uuid) -> eyre::Result<bool>;
    }

    #[async_trait]
    impl ProjectStore for Store {
        async fn create_project(&self, programmer_id: Uuid, project: ProjectRequest) -> eyre::Result<Project>;
        async fn get_project(&self, id: Uuid) -> eyre::Result<Option<Project>>;
        async fn projects_for_programmer(&self, programmer_id: Uuid) -> eyre::Result<Vec<Project>>;
        async fn replace_project(&self, id: Uuid, project: ProjectRequest) -> eyre::Result<Option<Project>>;
        async fn delete_project(&self, id: Uuid) -> eyre::Result<bool>;
    }

    #[async_trait]
    impl NotificationStore for Store {
        async fn create_notification(&self, notification: NewNotification) -> eyre::Result<Notification>;
        async fn notifications_for_user(&self, user_id: Uuid, unread_only: bool) -> eyre::Result<Vec<Notification>>;
        async fn unread_count(&self, user_id: Uuid) -> eyre::Result<i64>;
        async fn mark_read(&self, id: Uuid, user_id: Uuid) -> eyre::Result<bool>;
        async fn mark_all_read(&self, user_id: Uuid) -> eyre::Result<u64>;
        async fn log_external(&self, entry: ExternalNotification) -> eyre::Result<()>;
    }
}
