use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

use crate::core::error::{AppError, Result};
use crate::features::requests::dtos::{
    CreateRequestDto, ListRequestsQuery, ProblemLinkResponseDto, RequestResponseDto,
    RequestWithProblemsDto, UpdateRequestDto,
};
use crate::features::requests::models::ProblemLinkChanges;
use crate::features::requests::repositories::{ProblemLinkFilter, RequestFilter, RequestStore};
use crate::features::requests::services::aggregator;
use crate::shared::constants::{MSG_ATTENDANT_PROTECTED, STATUS_SOLVED};

/// Service for opening, listing, updating and resolving requests
pub struct RequestService {
    store: Arc<dyn RequestStore>,
}

impl RequestService {
    pub fn new(store: Arc<dyn RequestStore>) -> Self {
        Self { store }
    }

    /// Open a request with all its problems in one transaction
    pub async fn create(&self, dto: CreateRequestDto) -> Result<RequestResponseDto> {
        self.create_at(dto, Local::now().naive_local()).await
    }

    async fn create_at(
        &self,
        dto: CreateRequestDto,
        now: NaiveDateTime,
    ) -> Result<RequestResponseDto> {
        let (request, problems) = dto.into_rows(now);
        let problem_count = problems.len();

        let created = self.store.create_request(request, problems).await?;

        tracing::info!(
            "Request {} opened with {} problem(s)",
            created.id,
            problem_count
        );

        Ok(created.into())
    }

    /// List requests.
    ///
    /// `problem_id` wins over `active`; both produce one entry per matching link.
    /// Without either, every request is returned with its full problem set.
    pub async fn list(&self, query: &ListRequestsQuery) -> Result<Vec<RequestWithProblemsDto>> {
        let link_filter = match query.problem_id {
            Some(problem_id) => Some(ProblemLinkFilter::by_problem_id(problem_id)),
            None if query.active => Some(ProblemLinkFilter::status_not(STATUS_SOLVED)),
            None => None,
        };

        match link_filter {
            Some(filter) => self.link_first(&filter).await,
            None => self.all_with_problems().await,
        }
    }

    /// Links matching `filter`, each paired with its parent request
    pub async fn link_first(
        &self,
        filter: &ProblemLinkFilter,
    ) -> Result<Vec<RequestWithProblemsDto>> {
        let links = self.store.find_problem_links(filter).await?;
        if links.is_empty() {
            return Ok(Vec::new());
        }

        let parents = self
            .store
            .find_requests(&RequestFilter::by_ids(aggregator::parent_ids(&links)))
            .await?;

        Ok(aggregator::embed_each(links, parents))
    }

    async fn all_with_problems(&self) -> Result<Vec<RequestWithProblemsDto>> {
        let requests = self.store.find_requests(&RequestFilter::all()).await?;
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let ids = requests.iter().map(|r| r.id).collect();
        let links = self
            .store
            .find_problem_links(&ProblemLinkFilter::by_request_ids(ids))
            .await?;

        Ok(aggregator::embed_all(requests, links))
    }

    /// Request `id` with its full problem set, if it exists
    pub async fn get(&self, id: i32) -> Result<Option<RequestWithProblemsDto>> {
        let request = self
            .store
            .find_requests(&RequestFilter::by_id(id))
            .await?
            .into_iter()
            .next();

        let Some(request) = request else {
            return Ok(None);
        };

        let links = self
            .store
            .find_problem_links(&ProblemLinkFilter::by_request_ids(vec![id]))
            .await?;

        Ok(Some(RequestWithProblemsDto::new(request, links)))
    }

    /// Apply a partial update to a request and its problems.
    ///
    /// Returns `None` when the request does not exist. Problems the request
    /// does not carry are skipped.
    pub async fn update(
        &self,
        id: i32,
        dto: &UpdateRequestDto,
    ) -> Result<Option<RequestWithProblemsDto>> {
        if dto.attendant_name.is_some() {
            tracing::warn!("Rejected attendant_name change on request {}", id);
            return Err(AppError::BadRequest(MSG_ATTENDANT_PROTECTED.to_string()));
        }

        let affected = self.store.update_request(id, &dto.request_changes()).await?;
        if affected == 0 {
            return Ok(None);
        }

        for (problem_id, changes) in dto.problem_changes() {
            let matched = self
                .store
                .update_problem_link(id, problem_id, &changes)
                .await?;
            if matched == 0 {
                tracing::debug!("Request {} has no problem {}, skipped", id, problem_id);
            }
        }

        tracing::info!("Request {} updated", id);

        self.get(id).await
    }

    /// Mark one problem of a request as solved; repeating it is harmless
    pub async fn resolve(
        &self,
        request_id: i32,
        problem_id: i32,
    ) -> Result<Option<ProblemLinkResponseDto>> {
        let affected = self
            .store
            .update_problem_link(
                request_id,
                problem_id,
                &ProblemLinkChanges::status(STATUS_SOLVED),
            )
            .await?;

        if affected == 0 {
            return Ok(None);
        }

        tracing::info!("Problem {} of request {} resolved", problem_id, request_id);

        let link = self
            .store
            .find_problem_links(&ProblemLinkFilter::by_key(request_id, problem_id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Problem {} of request {} missing after update",
                    problem_id, request_id
                ))
            })?;

        Ok(Some(link.into()))
    }
}
