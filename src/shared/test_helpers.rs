#[cfg(test)]
use crate::features::events::{self, EventService};
#[cfg(test)]
use crate::features::requests::{self, repositories::memory::MemoryRequestStore, RequestService};

#[cfg(test)]
use axum::Router;
#[cfg(test)]
use axum_test::TestServer;
#[cfg(test)]
use fake::{faker::name::en::Name, Fake};
#[cfg(test)]
use serde_json::{json, Value};
#[cfg(test)]
use std::sync::Arc;

/// Build the public routers over `store`, wired the same way as in `main`
#[cfg(test)]
pub fn test_router(store: Arc<MemoryRequestStore>) -> Router {
    let request_service = Arc::new(RequestService::new(store));
    let event_service = Arc::new(EventService::new(Arc::clone(&request_service)));

    Router::new()
        .merge(requests::routes::routes(request_service))
        .merge(events::routes::routes(event_service))
}

#[cfg(test)]
pub fn test_server(store: Arc<MemoryRequestStore>) -> TestServer {
    TestServer::new(test_router(store)).expect("failed to start test server")
}

/// Creation payload carrying one default problem per id
#[cfg(test)]
pub fn create_payload(problem_ids: &[i32]) -> Value {
    let attendant: String = Name().fake();
    let applicant: String = Name().fake();
    let problems: Vec<Value> = problem_ids
        .iter()
        .map(|id| json!({ "category_id": 1, "problem_id": id }))
        .collect();

    json!({
        "attendant_name": attendant,
        "applicant_name": applicant,
        "applicant_phone": "1111111111",
        "place": "Sala de Reuniões",
        "description": "Chamado aberto para acesso a internet.",
        "workstation_id": 1,
        "problems": problems
    })
}
