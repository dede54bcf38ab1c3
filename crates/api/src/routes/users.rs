use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/users", get(handlers::users::list_users))
        .route("/api/users/programmers", get(handlers::users::list_programmers))
        .route(
            "/api/users/:uid",
            get(handlers::users::get_user).delete(handlers::users::delete_user),
        )
        .route("/api/users/:uid/role", put(handlers::users::assign_role))
        .route("/api/users/:uid/profile", put(handlers::users::update_profile))
}
