use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::events::handlers;
use crate::features::events::services::EventService;

/// Create routes for the events feature
pub fn routes(service: Arc<EventService>) -> Router {
    Router::new()
        .route("/evento", get(handlers::list_events))
        .with_state(service)
}
