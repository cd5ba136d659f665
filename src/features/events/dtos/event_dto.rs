use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

/// Query params for the event listing
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
pub struct EventQuery {
    /// Look ahead this many days from now; without it (or with 0), every event from today on
    #[validate(range(min = 0, max = 36500, message = "days_to_event must be between 0 and 36500"))]
    #[param(example = 7)]
    pub days_to_event: Option<i64>,
}
