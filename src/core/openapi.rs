use utoipa::{Modify, OpenApi};

use crate::features::events::handlers as events_handlers;
use crate::features::requests::{dtos as requests_dtos, handlers as requests_handlers};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Requests
        requests_handlers::create_request,
        requests_handlers::list_requests,
        requests_handlers::update_request,
        requests_handlers::resolve_problem,
        // Events
        events_handlers::list_events,
    ),
    components(
        schemas(
            // Requests
            requests_dtos::CreateRequestDto,
            requests_dtos::CreateProblemDto,
            requests_dtos::UpdateRequestDto,
            requests_dtos::UpdateProblemDto,
            requests_dtos::RequestResponseDto,
            requests_dtos::ProblemLinkResponseDto,
            requests_dtos::RequestWithProblemsDto,
            ApiResponse<requests_dtos::RequestResponseDto>,
            ApiResponse<requests_dtos::RequestWithProblemsDto>,
            ApiResponse<requests_dtos::ProblemLinkResponseDto>,
        )
    ),
    tags(
        (name = "chamados", description = "Requests and their problems"),
        (name = "eventos", description = "Problems scheduled as events"),
    ),
    info(
        title = "Chamados API",
        version = "0.1.0",
        description = "API documentation for Chamados",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.contains(&&"/chamado".to_string()));
        assert!(paths.contains(&&"/chamado/{request_id}".to_string()));
        assert!(paths.contains(&&"/evento".to_string()));
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Outro".to_string(),
            version: "9.9.9".to_string(),
            description: "desc".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Outro");
        assert_eq!(doc.info.version, "9.9.9");
    }
}
