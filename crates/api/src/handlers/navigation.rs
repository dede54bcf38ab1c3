use axum::{extract::Query, Json};
use devdesk_core::access::{evaluate, NavigationQuery, NavigationResponse, RouteArea};
use std::sync::Arc;

use crate::{middleware::auth::MaybeUser, ApiState};

/// Decides whether the caller may open a client route, using the role
/// stored right now rather than any role cached by the client.
#[axum::debug_handler(state = Arc<ApiState>)]
pub async fn check_navigation(
    MaybeUser(user): MaybeUser,
    Query(query): Query<NavigationQuery>,
) -> Json<NavigationResponse> {
    let area = RouteArea::for_path(&query.path);
    let role = user.map(|user| user.role);

    Json(NavigationResponse {
        path: query.path,
        area,
        role,
        decision: evaluate(role, area),
    })
}
