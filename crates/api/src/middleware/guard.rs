//! Role checks for protected handlers.
//!
//! Every check goes through [`devdesk_core::access::evaluate`], the same
//! policy that answers navigation queries, with the role taken from the user
//! the auth extractor just loaded.

use devdesk_core::{
    access::{evaluate, AccessDecision, RouteArea},
    errors::DeskError,
    models::user::{Role, User},
};
use uuid::Uuid;

/// Fails with an authorization error unless `user` may enter `area`.
pub fn require_area(user: &User, area: RouteArea) -> Result<(), DeskError> {
    match evaluate(Some(user.role), area) {
        AccessDecision::Allow => Ok(()),
        AccessDecision::Redirect(_) => Err(DeskError::Authorization(format!(
            "Role '{}' cannot access {} resources",
            user.role,
            area_name(area)
        ))),
    }
}

pub fn require_admin(user: &User) -> Result<(), DeskError> {
    require_area(user, RouteArea::Admin)
}

pub fn require_programmer(user: &User) -> Result<(), DeskError> {
    require_area(user, RouteArea::Programmer)
}

/// Owners may act on their own resources; administrators on anyone's.
pub fn require_owner_or_admin(user: &User, owner_id: Uuid) -> Result<(), DeskError> {
    if user.uid == owner_id || user.role == Role::Admin {
        Ok(())
    } else {
        Err(DeskError::Authorization(
            "You can only modify your own resources".to_string(),
        ))
    }
}

fn area_name(area: RouteArea) -> &'static str {
    match area {
        RouteArea::Public => "public",
        RouteArea::General => "account",
        RouteArea::Programmer => "programmer",
        RouteArea::Admin => "admin",
    }
}
