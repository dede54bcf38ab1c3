//! Role-gated navigation.
//!
//! Maps a signed-in user's stored role to the route areas they may enter and
//! the landing view they are sent to otherwise. Administrators satisfy
//! programmer-gated areas; there is no other hierarchy.

use serde::{Deserialize, Serialize};

use crate::models::user::Role;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteArea {
    /// Portfolio pages and the sign-in/sign-up forms.
    Public,
    /// Any signed-in user.
    General,
    Programmer,
    Admin,
}

impl RouteArea {
    /// Classifies a client route. Unknown routes fall back to the public
    /// portfolio, matching the catch-all redirect of the web client.
    pub fn for_path(path: &str) -> Self {
        let first = path
            .trim_start_matches('/')
            .split(['/', '?', '#'])
            .next()
            .unwrap_or_default();

        match first {
            "admin" => RouteArea::Admin,
            "programmer" | "programmer-dashboard" => RouteArea::Programmer,
            "profile" | "user-profile" | "notifications" | "advisories" => RouteArea::General,
            _ => RouteArea::Public,
        }
    }
}

impl Role {
    /// Where a user with this role lands after a denied navigation.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Programmer => "/programmer",
            Role::User => "/portfolio",
        }
    }

    pub fn can_enter(&self, area: RouteArea) -> bool {
        match area {
            RouteArea::Public | RouteArea::General => true,
            RouteArea::Programmer => matches!(self, Role::Programmer | Role::Admin),
            RouteArea::Admin => *self == Role::Admin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "redirect_to", rename_all = "lowercase")]
pub enum AccessDecision {
    Allow,
    Redirect(String),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Decides whether a visitor with `role` (or none, when signed out) may
/// enter `area`.
pub fn evaluate(role: Option<Role>, area: RouteArea) -> AccessDecision {
    match (role, area) {
        (_, RouteArea::Public) => AccessDecision::Allow,
        (None, _) => AccessDecision::Redirect(LOGIN_PATH.to_string()),
        (Some(role), area) if role.can_enter(area) => AccessDecision::Allow,
        (Some(role), _) => AccessDecision::Redirect(role.landing_path().to_string()),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationQuery {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResponse {
    pub path: String,
    pub area: RouteArea,
    pub role: Option<Role>,
    pub decision: AccessDecision,
}
