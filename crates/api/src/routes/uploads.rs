use axum::{extract::DefaultBodyLimit, routing::post, Router};
use devdesk_core::validation::MAX_IMAGE_BYTES;
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    // Bodies up to twice the image limit reach validation; larger ones get 413.
    Router::new()
        .route("/api/uploads/images", post(handlers::uploads::upload_image))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES * 2))
}
