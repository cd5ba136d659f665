use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Database model for a problem attached to a request.
///
/// Addressed by `(request_id, problem_id)`; `category_id` is optional.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProblemLink {
    pub request_id: i32,
    pub problem_id: i32,
    pub category_id: Option<i32>,
    pub is_event: bool,
    pub event_date: Option<NaiveDateTime>,
    pub request_status: String,
    pub priority: String,
}

/// Problem link to insert alongside a new request
#[derive(Debug, Clone)]
pub struct NewProblemLink {
    pub problem_id: i32,
    pub category_id: Option<i32>,
    pub is_event: bool,
    pub event_date: Option<NaiveDateTime>,
    pub request_status: String,
    pub priority: String,
}

/// Partial update of a problem link; same absent/null convention as `RequestChanges`
#[derive(Debug, Clone, Default)]
pub struct ProblemLinkChanges {
    pub category_id: Option<Option<i32>>,
    pub is_event: Option<bool>,
    pub event_date: Option<Option<NaiveDateTime>>,
    pub request_status: Option<String>,
    pub priority: Option<String>,
}

impl ProblemLinkChanges {
    /// Change set that closes the link
    pub fn status(status: &str) -> Self {
        Self {
            request_status: Some(status.to_string()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.is_event.is_none()
            && self.event_date.is_none()
            && self.request_status.is_none()
            && self.priority.is_none()
    }
}
