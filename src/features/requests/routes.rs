use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::requests::handlers;
use crate::features::requests::services::RequestService;

/// Create routes for the requests feature
pub fn routes(service: Arc<RequestService>) -> Router {
    Router::new()
        .route(
            "/chamado",
            get(handlers::list_requests)
                .post(handlers::create_request)
                .delete(handlers::resolve_problem),
        )
        .route("/chamado/{request_id}", put(handlers::update_request))
        .with_state(service)
}
