use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::requests::dtos::{
    CreateRequestDto, ListRequestsQuery, ProblemLinkResponseDto, RequestResponseDto,
    RequestWithProblemsDto, ResolveProblemQuery, UpdateRequestDto,
};
use crate::features::requests::services::RequestService;
use crate::shared::constants::{
    MSG_CREATED, MSG_NOT_FOUND, MSG_RESOLVED, MSG_RETRIEVED, MSG_UPDATED,
};
use crate::shared::types::ApiResponse;

/// Open a request with its problems
#[utoipa::path(
    post,
    path = "/chamado",
    request_body = CreateRequestDto,
    responses(
        (status = 201, description = "Request opened", body = ApiResponse<RequestResponseDto>),
        (status = 400, description = "Invalid payload"),
        (status = 500, description = "Store failure")
    ),
    tag = "chamados"
)]
pub async fn create_request(
    State(service): State<Arc<RequestService>>,
    AppJson(dto): AppJson<CreateRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<RequestResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(created), MSG_CREATED)),
    ))
}

/// List requests with their problems
#[utoipa::path(
    get,
    path = "/chamado",
    params(ListRequestsQuery),
    responses(
        (status = 200, description = "Requests with embedded problems", body = ApiResponse<Vec<RequestWithProblemsDto>>),
        (status = 500, description = "Store failure")
    ),
    tag = "chamados"
)]
pub async fn list_requests(
    State(service): State<Arc<RequestService>>,
    AppQuery(query): AppQuery<ListRequestsQuery>,
) -> Result<Json<ApiResponse<Vec<RequestWithProblemsDto>>>> {
    let requests = service.list(&query).await?;
    Ok(Json(ApiResponse::success(Some(requests), MSG_RETRIEVED)))
}

/// Update a request and its problems
#[utoipa::path(
    put,
    path = "/chamado/{request_id}",
    params(
        ("request_id" = i32, Path, description = "Request id")
    ),
    request_body = UpdateRequestDto,
    responses(
        (status = 200, description = "Updated request, or null data when it does not exist", body = ApiResponse<RequestWithProblemsDto>),
        (status = 400, description = "Invalid payload or attendant_name change"),
        (status = 500, description = "Store failure")
    ),
    tag = "chamados"
)]
pub async fn update_request(
    State(service): State<Arc<RequestService>>,
    Path(request_id): Path<i32>,
    AppJson(dto): AppJson<UpdateRequestDto>,
) -> Result<Json<ApiResponse<RequestWithProblemsDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = match service.update(request_id, &dto).await? {
        Some(updated) => ApiResponse::success(Some(updated), MSG_UPDATED),
        None => ApiResponse::success(None, MSG_NOT_FOUND),
    };
    Ok(Json(response))
}

/// Mark one problem of a request as solved
#[utoipa::path(
    delete,
    path = "/chamado",
    params(ResolveProblemQuery),
    responses(
        (status = 200, description = "Resolved problem link, or null data when the pair does not exist", body = ApiResponse<ProblemLinkResponseDto>),
        (status = 400, description = "Missing or malformed parameters"),
        (status = 500, description = "Store failure")
    ),
    tag = "chamados"
)]
pub async fn resolve_problem(
    State(service): State<Arc<RequestService>>,
    AppQuery(query): AppQuery<ResolveProblemQuery>,
) -> Result<Json<ApiResponse<ProblemLinkResponseDto>>> {
    let response = match service.resolve(query.request_id, query.problem_id).await? {
        Some(link) => ApiResponse::success(Some(link), MSG_RESOLVED),
        None => ApiResponse::success(None, MSG_NOT_FOUND),
    };
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use crate::features::requests::repositories::memory::MemoryRequestStore;
    use crate::shared::test_helpers::{create_payload, test_server};
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_create_returns_201_with_request() {
        let store = Arc::new(MemoryRequestStore::new());
        let server = test_server(store.clone());

        let response = server
            .post("/chamado")
            .json(&create_payload(&[1, 2]))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["message"], "Dado cadastrado com sucesso");
        assert_eq!(body["error"], Value::Null);
        assert_eq!(body["data"]["id"], 1);
        assert!(body["data"]["created_at"].is_string());
        assert!(body["data"].get("problems").is_none());
        assert_eq!(store.link_count(), 2);
    }

    #[tokio::test]
    async fn test_create_accepts_free_form_phone() {
        let store = Arc::new(MemoryRequestStore::new());
        let server = test_server(store.clone());

        for phone in ["ramal 2345", "61 3333-4444 r.12"] {
            let mut payload = create_payload(&[1]);
            payload["applicant_phone"] = json!(phone);

            let response = server.post("/chamado").json(&payload).await;

            response.assert_status(StatusCode::CREATED);
            let body: Value = response.json();
            assert_eq!(body["data"]["applicant_phone"], phone);
        }
        assert_eq!(store.request_count(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_empty_problem_list() {
        let store = Arc::new(MemoryRequestStore::new());
        let server = test_server(store.clone());

        let response = server.post("/chamado").json(&create_payload(&[])).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(store.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_json() {
        let server = test_server(Arc::new(MemoryRequestStore::new()));

        let response = server
            .post("/chamado")
            .content_type("application/json")
            .bytes("{\"attendant_name\": ".into())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].is_string());
        assert_eq!(body["data"], Value::Null);
    }

    #[tokio::test]
    async fn test_open_filter_resolve_and_list_events() {
        let server = test_server(Arc::new(MemoryRequestStore::new()));

        let mut payload = create_payload(&[1, 2]);
        payload["problems"][1]["is_event"] = json!(true);
        payload["problems"][1]["event_date"] = json!("2999-01-01T00:00:00");
        server
            .post("/chamado")
            .json(&payload)
            .await
            .assert_status(StatusCode::CREATED);

        let filtered: Value = server
            .get("/chamado")
            .add_query_param("problem_id", 2)
            .await
            .json();
        assert_eq!(filtered["data"].as_array().unwrap().len(), 1);
        assert_eq!(filtered["data"][0]["problems"][0]["problem_id"], 2);
        assert_eq!(filtered["data"][0]["problems"].as_array().unwrap().len(), 1);

        for _ in 0..2 {
            let resolved = server
                .delete("/chamado")
                .add_query_param("request_id", 1)
                .add_query_param("problem_id", 2)
                .await;
            resolved.assert_status_ok();
            let body: Value = resolved.json();
            assert_eq!(body["message"], "Chamado marcado como resolvido");
            assert_eq!(body["data"]["request_status"], "solved");
        }

        let active: Value = server
            .get("/chamado")
            .add_query_param("active", true)
            .await
            .json();
        assert_eq!(active["data"].as_array().unwrap().len(), 1);
        assert_eq!(active["data"][0]["problems"][0]["problem_id"], 1);

        // Solved events stay visible in the event listing
        let events: Value = server.get("/evento").await.json();
        assert_eq!(events["data"].as_array().unwrap().len(), 1);
        assert_eq!(events["data"][0]["problems"][0]["request_status"], "solved");
    }

    #[tokio::test]
    async fn test_list_without_filter_embeds_all_problems() {
        let server = test_server(Arc::new(MemoryRequestStore::new()));
        server.post("/chamado").json(&create_payload(&[1, 2, 3])).await;

        let body: Value = server.get("/chamado").await.json();

        assert_eq!(body["message"], "Dados recuperados com sucesso");
        assert_eq!(body["data"][0]["problems"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_resolve_unknown_pair_reports_not_found() {
        let store = Arc::new(MemoryRequestStore::new());
        let server = test_server(store.clone());
        server.post("/chamado").json(&create_payload(&[1])).await;

        let response = server
            .delete("/chamado")
            .add_query_param("request_id", 1)
            .add_query_param("problem_id", 9)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Chamado não encontrado");
        assert_eq!(body["data"], Value::Null);

        // Nothing is inserted for the missing pair
        assert_eq!(store.request_count(), 1);
        assert_eq!(store.link_count(), 1);
    }

    #[tokio::test]
    async fn test_resolve_requires_both_params() {
        let server = test_server(Arc::new(MemoryRequestStore::new()));

        let response = server
            .delete("/chamado")
            .add_query_param("request_id", 1)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_applies_partial_changes() {
        let server = test_server(Arc::new(MemoryRequestStore::new()));
        server.post("/chamado").json(&create_payload(&[1, 2])).await;

        let response = server
            .put("/chamado/1")
            .json(&json!({
                "place": "Sala de Testes",
                "workstation_id": 2,
                "problems": [
                    { "problem_id": 2, "is_event": true,
                      "event_date": "2030-01-01T00:00:00", "priority": "urgent" }
                ]
            }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Dados atualizados com sucesso");
        assert_eq!(body["data"]["place"], "Sala de Testes");
        assert_eq!(body["data"]["workstation_id"], 2);
        assert_eq!(body["data"]["problems"][0]["priority"], "normal");
        assert_eq!(body["data"]["problems"][1]["priority"], "urgent");
        assert_eq!(body["data"]["problems"][1]["event_date"], "2030-01-01T00:00:00");
    }

    #[tokio::test]
    async fn test_update_unknown_request_reports_not_found() {
        let server = test_server(Arc::new(MemoryRequestStore::new()));

        let response = server
            .put("/chamado/77")
            .json(&json!({ "place": "Sala", "problems": [] }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Chamado não encontrado");
        assert_eq!(body["data"], Value::Null);
    }

    #[tokio::test]
    async fn test_update_rejects_attendant_name() {
        let server = test_server(Arc::new(MemoryRequestStore::new()));
        let created: Value = server
            .post("/chamado")
            .json(&create_payload(&[1]))
            .await
            .json();

        let response = server
            .put("/chamado/1")
            .json(&json!({ "attendant_name": "Outro", "place": "Outra sala", "problems": [] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(
            body["message"],
            "O nome do atendente não pode ser alterado após a abertura do chamado"
        );

        let listed: Value = server.get("/chamado").await.json();
        assert_eq!(
            listed["data"][0]["attendant_name"],
            created["data"]["attendant_name"]
        );
        assert_eq!(listed["data"][0]["place"], created["data"]["place"]);
    }

    #[tokio::test]
    async fn test_store_failure_returns_500_envelope() {
        let store = Arc::new(MemoryRequestStore::new());
        let server = test_server(store.clone());
        store.go_offline();

        let response = server.get("/chamado").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], "Erro ao processar dados");
        assert!(body["error"].is_string());
        assert_eq!(body["data"], Value::Null);
    }
}
