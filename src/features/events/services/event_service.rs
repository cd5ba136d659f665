use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

use crate::core::error::Result;
use crate::features::requests::dtos::RequestWithProblemsDto;
use crate::features::requests::models::EventWindow;
use crate::features::requests::repositories::ProblemLinkFilter;
use crate::features::requests::services::RequestService;

/// Service for the upcoming-events listing
pub struct EventService {
    requests: Arc<RequestService>,
}

impl EventService {
    pub fn new(requests: Arc<RequestService>) -> Self {
        Self { requests }
    }

    /// Events inside the window, each with its parent request. Status is ignored.
    pub async fn list(&self, days_to_event: Option<i64>) -> Result<Vec<RequestWithProblemsDto>> {
        self.list_at(days_to_event, Local::now().naive_local()).await
    }

    async fn list_at(
        &self,
        days_to_event: Option<i64>,
        now: NaiveDateTime,
    ) -> Result<Vec<RequestWithProblemsDto>> {
        let window = EventWindow::upcoming(days_to_event, now);
        self.requests
            .link_first(&ProblemLinkFilter::events_in(window))
            .await
    }
}
