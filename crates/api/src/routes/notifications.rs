use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/notifications", get(handlers::notifications::list_notifications))
        .route(
            "/api/notifications/unread-count",
            get(handlers::notifications::unread_count),
        )
        .route("/api/notifications/read-all", post(handlers::notifications::mark_all_read))
        .route("/api/notifications/:id/read", post(handlers::notifications::mark_read))
}
