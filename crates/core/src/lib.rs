//! # DevDesk Core
//!
//! Domain types and pure logic shared by the database and API crates:
//! entity models, the error taxonomy, the availability resolver, the
//! role-gated navigation policy and request validation.

pub mod access;
pub mod availability;
pub mod errors;
pub mod models;
pub mod validation;
