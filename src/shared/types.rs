use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform envelope wrapped around every response body.
///
/// Success: `error` is null and `data` carries the payload (or null when nothing
/// matched). Failure: `error` carries the failure description and `data` is null.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
            data,
        }
    }

    pub fn error(message: impl Into<String>, error: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            message: message.into(),
            error: Some(error.into()),
            data: None,
        }
    }
}
