pub mod advisory;
pub mod clock;
pub mod contact;
pub mod notification;
pub mod project;
pub mod schedule;
pub mod time_slot;
pub mod user;
