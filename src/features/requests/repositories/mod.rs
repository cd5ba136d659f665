//! Persistence for requests and their problem links.
//!
//! Services only see [`RequestStore`]; production wires [`PgRequestStore`].

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::requests::models::{
    EventWindow, NewProblemLink, NewRequest, ProblemLink, ProblemLinkChanges, Request,
    RequestChanges,
};

pub use postgres::PgRequestStore;

/// Predicate over requests. An empty filter selects every request.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub ids: Option<Vec<i32>>,
}

impl RequestFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: i32) -> Self {
        Self::by_ids(vec![id])
    }

    pub fn by_ids(ids: Vec<i32>) -> Self {
        Self { ids: Some(ids) }
    }
}

/// Predicate over problem links; every set criterion must hold.
#[derive(Debug, Clone, Default)]
pub struct ProblemLinkFilter {
    pub request_ids: Option<Vec<i32>>,
    pub problem_id: Option<i32>,
    /// Keep only links whose status differs from this one
    pub status_not: Option<String>,
    /// Keep only events dated inside the window
    pub event_window: Option<EventWindow>,
}

impl ProblemLinkFilter {
    pub fn by_request_ids(ids: Vec<i32>) -> Self {
        Self {
            request_ids: Some(ids),
            ..Default::default()
        }
    }

    pub fn by_problem_id(problem_id: i32) -> Self {
        Self {
            problem_id: Some(problem_id),
            ..Default::default()
        }
    }

    pub fn by_key(request_id: i32, problem_id: i32) -> Self {
        Self {
            request_ids: Some(vec![request_id]),
            problem_id: Some(problem_id),
            ..Default::default()
        }
    }

    pub fn status_not(status: &str) -> Self {
        Self {
            status_not: Some(status.to_string()),
            ..Default::default()
        }
    }

    pub fn events_in(window: EventWindow) -> Self {
        Self {
            event_window: Some(window),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait RequestStore: Send + Sync {
    /// Insert a request and all of its problem links atomically.
    ///
    /// Either every row is written or none is.
    async fn create_request(
        &self,
        request: NewRequest,
        problems: Vec<NewProblemLink>,
    ) -> Result<Request>;

    /// Requests matching the filter, ordered by id
    async fn find_requests(&self, filter: &RequestFilter) -> Result<Vec<Request>>;

    /// Problem links matching the filter, in insertion order
    async fn find_problem_links(&self, filter: &ProblemLinkFilter) -> Result<Vec<ProblemLink>>;

    /// Apply `changes` to request `id`; returns the number of matched rows.
    ///
    /// An empty change set still reports whether the request exists.
    async fn update_request(&self, id: i32, changes: &RequestChanges) -> Result<u64>;

    /// Apply `changes` to every link addressed by `(request_id, problem_id)`;
    /// returns the number of matched rows.
    async fn update_problem_link(
        &self,
        request_id: i32,
        problem_id: i32,
        changes: &ProblemLinkChanges,
    ) -> Result<u64>;
}
