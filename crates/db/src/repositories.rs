pub mod advisory;
pub mod notification;
pub mod project;
pub mod schedule;
pub mod session;
pub mod user;
