use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/projects", post(handlers::projects::create_project))
        .route(
            "/api/projects/:id",
            get(handlers::projects::get_project)
                .put(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route(
            "/api/programmers/:programmer_id/projects",
            get(handlers::projects::list_projects),
        )
}
