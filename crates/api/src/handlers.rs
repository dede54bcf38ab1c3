pub mod advisory;
pub mod auth;
pub mod availability;
pub mod contact;
pub mod navigation;
pub mod notifications;
pub mod projects;
pub mod schedule;
pub mod uploads;
pub mod users;
