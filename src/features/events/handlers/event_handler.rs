use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::events::dtos::EventQuery;
use crate::features::events::services::EventService;
use crate::features::requests::dtos::RequestWithProblemsDto;
use crate::shared::constants::MSG_RETRIEVED;
use crate::shared::types::ApiResponse;

/// List upcoming events with their requests
#[utoipa::path(
    get,
    path = "/evento",
    params(EventQuery),
    responses(
        (status = 200, description = "Events, one entry per problem link", body = ApiResponse<Vec<RequestWithProblemsDto>>),
        (status = 400, description = "Invalid days_to_event"),
        (status = 500, description = "Store failure")
    ),
    tag = "eventos"
)]
pub async fn list_events(
    State(service): State<Arc<EventService>>,
    AppQuery(query): AppQuery<EventQuery>,
) -> Result<Json<ApiResponse<Vec<RequestWithProblemsDto>>>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let events = service.list(query.days_to_event).await?;
    Ok(Json(ApiResponse::success(Some(events), MSG_RETRIEVED)))
}
