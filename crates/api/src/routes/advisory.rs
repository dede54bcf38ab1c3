use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/advisories", post(handlers::advisory::create_advisory))
        .route("/api/advisories/mine", get(handlers::advisory::my_advisories))
        .route("/api/advisories/incoming", get(handlers::advisory::incoming_advisories))
        .route(
            "/api/advisories/:id",
            get(handlers::advisory::get_advisory).delete(handlers::advisory::delete_advisory),
        )
        .route("/api/advisories/:id/approve", post(handlers::advisory::approve_advisory))
        .route("/api/advisories/:id/reject", post(handlers::advisory::reject_advisory))
        .route("/api/advisories/:id/cancel", post(handlers::advisory::cancel_advisory))
        .route("/api/advisories/:id/complete", post(handlers::advisory::complete_advisory))
}
