use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::requests::models::{
    NewProblemLink, NewRequest, ProblemLink, ProblemLinkChanges, Request, RequestChanges,
};
use crate::shared::constants::{PRIORITY_NORMAL, STATUS_PENDING};

fn default_status() -> String {
    STATUS_PENDING.to_string()
}

fn default_priority() -> String {
    PRIORITY_NORMAL.to_string()
}

// =============================================================================
// CREATE
// =============================================================================

/// Request DTO for opening a request with its problems
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "attendant_name": "Fulano",
    "applicant_name": "Ciclano",
    "applicant_phone": "1111111111",
    "place": "Sala de Reuniões",
    "description": "Chamado aberto para acesso a internet.",
    "workstation_id": 1,
    "problems": [
        { "category_id": 1, "problem_id": 1, "is_event": false, "priority": "normal" },
        { "category_id": 1, "problem_id": 2, "is_event": true, "event_date": "2030-01-01T00:00:00" }
    ]
}))]
pub struct CreateRequestDto {
    #[validate(length(max = 255, message = "attendant_name must be at most 255 characters"))]
    pub attendant_name: String,

    #[validate(length(max = 255, message = "applicant_name must be at most 255 characters"))]
    pub applicant_name: String,

    #[validate(length(max = 50, message = "applicant_phone must be at most 50 characters"))]
    pub applicant_phone: String,

    #[validate(length(max = 255, message = "place must be at most 255 characters"))]
    pub place: String,

    #[validate(length(max = 5000))]
    pub description: Option<String>,

    /// Opening time; the server clock is used when omitted
    pub created_at: Option<NaiveDateTime>,

    pub workstation_id: i32,

    #[validate(length(min = 1, message = "at least one problem is required"), nested)]
    pub problems: Vec<CreateProblemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProblemDto {
    pub problem_id: i32,

    pub category_id: Option<i32>,

    #[serde(default)]
    pub is_event: bool,

    pub event_date: Option<NaiveDateTime>,

    #[serde(default = "default_status")]
    #[validate(length(min = 1, max = 50, message = "request_status must be 1-50 characters"))]
    pub request_status: String,

    #[serde(default = "default_priority")]
    #[validate(length(min = 1, max = 50, message = "priority must be 1-50 characters"))]
    pub priority: String,
}

impl CreateRequestDto {
    /// Split into the rows to insert, stamping `created_at` with `now` when absent
    pub fn into_rows(self, now: NaiveDateTime) -> (NewRequest, Vec<NewProblemLink>) {
        let request = NewRequest {
            attendant_name: self.attendant_name,
            applicant_name: self.applicant_name,
            applicant_phone: self.applicant_phone,
            place: self.place,
            description: self.description,
            created_at: Some(self.created_at.unwrap_or(now)),
            workstation_id: self.workstation_id,
        };

        let problems = self
            .problems
            .into_iter()
            .map(|p| NewProblemLink {
                problem_id: p.problem_id,
                category_id: p.category_id,
                is_event: p.is_event,
                event_date: p.event_date,
                request_status: p.request_status,
                priority: p.priority,
            })
            .collect();

        (request, problems)
    }
}

// =============================================================================
// UPDATE
// =============================================================================

/// Partial update of a request and of its existing problems.
///
/// Omitted fields keep their stored value. `null` clears the nullable ones
/// (`description`, `created_at`, `category_id`, `event_date`).
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "applicant_name": "Fulano de Tal",
    "applicant_phone": "999999999",
    "place": "Sala de Testes",
    "workstation_id": 2,
    "problems": [
        { "problem_id": 1, "priority": "high" },
        { "problem_id": 2, "is_event": true, "event_date": "2030-01-01T00:00:00", "priority": "urgent" }
    ]
}))]
pub struct UpdateRequestDto {
    /// Cannot be changed; sending a value rejects the whole update
    pub attendant_name: Option<String>,

    #[validate(length(max = 255))]
    pub applicant_name: Option<String>,

    #[validate(length(max = 50))]
    pub applicant_phone: Option<String>,

    #[validate(length(max = 255))]
    pub place: Option<String>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub created_at: Option<Option<NaiveDateTime>>,

    pub workstation_id: Option<i32>,

    #[validate(nested)]
    pub problems: Vec<UpdateProblemDto>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProblemDto {
    /// Which of the request's problems to change
    pub problem_id: i32,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Option<i32>>,

    pub is_event: Option<bool>,

    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub event_date: Option<Option<NaiveDateTime>>,

    #[validate(length(min = 1, max = 50, message = "request_status must be 1-50 characters"))]
    pub request_status: Option<String>,

    #[validate(length(min = 1, max = 50, message = "priority must be 1-50 characters"))]
    pub priority: Option<String>,
}

impl UpdateRequestDto {
    pub fn request_changes(&self) -> RequestChanges {
        RequestChanges {
            applicant_name: self.applicant_name.clone(),
            applicant_phone: self.applicant_phone.clone(),
            place: self.place.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
            workstation_id: self.workstation_id,
        }
    }

    /// Problem changes keyed by problem id, in payload order
    pub fn problem_changes(&self) -> Vec<(i32, ProblemLinkChanges)> {
        self.problems
            .iter()
            .map(|p| {
                (
                    p.problem_id,
                    ProblemLinkChanges {
                        category_id: p.category_id,
                        is_event: p.is_event,
                        event_date: p.event_date,
                        request_status: p.request_status.clone(),
                        priority: p.priority.clone(),
                    },
                )
            })
            .collect()
    }
}

// =============================================================================
// QUERIES
// =============================================================================

/// Query params for listing requests
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListRequestsQuery {
    /// Only requests carrying this problem (each with just the matching link)
    pub problem_id: Option<i32>,

    /// Only problem links not yet solved (each with just that link)
    #[serde(default)]
    pub active: bool,
}

/// Query params addressing one problem of one request
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ResolveProblemQuery {
    pub request_id: i32,
    pub problem_id: i32,
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Response DTO for a request, without its problems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RequestResponseDto {
    pub id: i32,
    pub attendant_name: String,
    pub applicant_name: String,
    pub applicant_phone: String,
    pub place: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub workstation_id: i32,
}

impl From<Request> for RequestResponseDto {
    fn from(r: Request) -> Self {
        Self {
            id: r.id,
            attendant_name: r.attendant_name,
            applicant_name: r.applicant_name,
            applicant_phone: r.applicant_phone,
            place: r.place,
            description: r.description,
            created_at: r.created_at,
            workstation_id: r.workstation_id,
        }
    }
}

/// Response DTO for a problem link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProblemLinkResponseDto {
    pub request_id: i32,
    pub problem_id: i32,
    pub category_id: Option<i32>,
    pub is_event: bool,
    pub event_date: Option<NaiveDateTime>,
    pub request_status: String,
    pub priority: String,
}

impl From<ProblemLink> for ProblemLinkResponseDto {
    fn from(l: ProblemLink) -> Self {
        Self {
            request_id: l.request_id,
            problem_id: l.problem_id,
            category_id: l.category_id,
            is_event: l.is_event,
            event_date: l.event_date,
            request_status: l.request_status,
            priority: l.priority,
        }
    }
}

/// A request with problem links embedded under `problems`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RequestWithProblemsDto {
    #[serde(flatten)]
    pub request: RequestResponseDto,
    pub problems: Vec<ProblemLinkResponseDto>,
}

impl RequestWithProblemsDto {
    pub fn new(request: Request, problems: Vec<ProblemLink>) -> Self {
        Self {
            request: request.into(),
            problems: problems.into_iter().map(Into::into).collect(),
        }
    }
}
