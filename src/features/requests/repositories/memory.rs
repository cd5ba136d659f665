//! In-process [`RequestStore`] used by the test suite.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::error::{AppError, Result};
use crate::features::requests::models::{
    NewProblemLink, NewRequest, ProblemLink, ProblemLinkChanges, Request, RequestChanges,
};
use crate::features::requests::repositories::{ProblemLinkFilter, RequestFilter, RequestStore};

#[derive(Default)]
struct Tables {
    requests: Vec<Request>,
    links: Vec<ProblemLink>,
    next_id: i32,
}

#[derive(Default)]
pub struct MemoryRequestStore {
    tables: Mutex<Tables>,
    offline: AtomicBool,
    rejected_problem_id: Mutex<Option<i32>>,
}

impl MemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail like an unreachable database
    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    /// Make inserts of this problem id fail like a foreign key violation
    pub fn reject_problem_id(&self, problem_id: i32) {
        *self.rejected_problem_id.lock().unwrap() = Some(problem_id);
    }

    pub fn request_count(&self) -> usize {
        self.tables.lock().unwrap().requests.len()
    }

    pub fn link_count(&self) -> usize {
        self.tables.lock().unwrap().links.len()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn request_matches(filter: &RequestFilter, request: &Request) -> bool {
    filter
        .ids
        .as_ref()
        .map_or(true, |ids| ids.contains(&request.id))
}

fn link_matches(filter: &ProblemLinkFilter, link: &ProblemLink) -> bool {
    if let Some(ref ids) = filter.request_ids {
        if !ids.contains(&link.request_id) {
            return false;
        }
    }
    if let Some(problem_id) = filter.problem_id {
        if link.problem_id != problem_id {
            return false;
        }
    }
    if let Some(ref status) = filter.status_not {
        if &link.request_status == status {
            return false;
        }
    }
    if let Some(window) = filter.event_window {
        // NULL event dates never satisfy the range, as in SQL
        let in_window = link.event_date.is_some_and(|date| {
            date >= window.from && window.until.map_or(true, |until| date <= until)
        });
        if !link.is_event || !in_window {
            return false;
        }
    }
    true
}

fn stored_link(request_id: i32, problem: NewProblemLink) -> ProblemLink {
    ProblemLink {
        request_id,
        problem_id: problem.problem_id,
        category_id: problem.category_id,
        is_event: problem.is_event,
        event_date: problem.event_date,
        request_status: problem.request_status,
        priority: problem.priority,
    }
}

fn apply_request_changes(changes: &RequestChanges, request: &mut Request) {
    if let Some(ref v) = changes.applicant_name {
        request.applicant_name = v.clone();
    }
    if let Some(ref v) = changes.applicant_phone {
        request.applicant_phone = v.clone();
    }
    if let Some(ref v) = changes.place {
        request.place = v.clone();
    }
    if let Some(ref v) = changes.description {
        request.description = v.clone();
    }
    if let Some(v) = changes.created_at {
        request.created_at = v;
    }
    if let Some(v) = changes.workstation_id {
        request.workstation_id = v;
    }
}

fn apply_link_changes(changes: &ProblemLinkChanges, link: &mut ProblemLink) {
    if let Some(v) = changes.category_id {
        link.category_id = v;
    }
    if let Some(v) = changes.is_event {
        link.is_event = v;
    }
    if let Some(v) = changes.event_date {
        link.event_date = v;
    }
    if let Some(ref v) = changes.request_status {
        link.request_status = v.clone();
    }
    if let Some(ref v) = changes.priority {
        link.priority = v.clone();
    }
}

#[async_trait]
impl RequestStore for MemoryRequestStore {
    async fn create_request(
        &self,
        request: NewRequest,
        problems: Vec<NewProblemLink>,
    ) -> Result<Request> {
        self.check_online()?;
        let rejected = *self.rejected_problem_id.lock().unwrap();
        let mut tables = self.tables.lock().unwrap();

        // Stage everything first so a failure leaves the tables untouched
        let id = tables.next_id + 1;
        let created = Request {
            id,
            attendant_name: request.attendant_name,
            applicant_name: request.applicant_name,
            applicant_phone: request.applicant_phone,
            place: request.place,
            description: request.description,
            created_at: request.created_at,
            workstation_id: request.workstation_id,
        };
        let mut staged = Vec::with_capacity(problems.len());
        for problem in problems {
            if Some(problem.problem_id) == rejected {
                return Err(AppError::Database(sqlx::Error::Protocol(format!(
                    "insert violates foreign key: problem {} does not exist",
                    problem.problem_id
                ))));
            }
            staged.push(stored_link(id, problem));
        }

        tables.next_id = id;
        tables.requests.push(created.clone());
        tables.links.extend(staged);
        Ok(created)
    }

    async fn find_requests(&self, filter: &RequestFilter) -> Result<Vec<Request>> {
        self.check_online()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .requests
            .iter()
            .filter(|r| request_matches(filter, r))
            .cloned()
            .collect())
    }

    async fn find_problem_links(&self, filter: &ProblemLinkFilter) -> Result<Vec<ProblemLink>> {
        self.check_online()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .links
            .iter()
            .filter(|l| link_matches(filter, l))
            .cloned()
            .collect())
    }

    async fn update_request(&self, id: i32, changes: &RequestChanges) -> Result<u64> {
        self.check_online()?;
        let mut tables = self.tables.lock().unwrap();
        let mut affected = 0;
        for request in tables.requests.iter_mut().filter(|r| r.id == id) {
            apply_request_changes(changes, request);
            affected += 1;
        }
        Ok(affected)
    }

    async fn update_problem_link(
        &self,
        request_id: i32,
        problem_id: i32,
        changes: &ProblemLinkChanges,
    ) -> Result<u64> {
        self.check_online()?;
        let mut tables = self.tables.lock().unwrap();
        let mut affected = 0;
        for link in tables
            .links
            .iter_mut()
            .filter(|l| l.request_id == request_id && l.problem_id == problem_id)
        {
            apply_link_changes(changes, link);
            affected += 1;
        }
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::requests::models::EventWindow;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn link(problem_id: i32, is_event: bool, event_date: Option<NaiveDateTime>) -> ProblemLink {
        ProblemLink {
            request_id: 1,
            problem_id,
            category_id: None,
            is_event,
            event_date,
            request_status: "pending".to_string(),
            priority: "normal".to_string(),
        }
    }

    #[test]
    fn test_event_filter_requires_flag_and_date_in_window() {
        let filter = ProblemLinkFilter::events_in(EventWindow {
            from: at(2030, 1, 1),
            until: Some(at(2030, 1, 10)),
        });

        assert!(link_matches(&filter, &link(1, true, Some(at(2030, 1, 5)))));
        assert!(link_matches(&filter, &link(1, true, Some(at(2030, 1, 10)))));
        assert!(!link_matches(&filter, &link(1, false, Some(at(2030, 1, 5)))));
        assert!(!link_matches(&filter, &link(1, true, Some(at(2030, 1, 11)))));
        assert!(!link_matches(&filter, &link(1, true, None)));
    }

    #[test]
    fn test_status_not_filter_excludes_solved() {
        let filter = ProblemLinkFilter::status_not("solved");
        let mut solved = link(1, false, None);
        solved.request_status = "solved".to_string();

        assert!(link_matches(&filter, &link(1, false, None)));
        assert!(!link_matches(&filter, &solved));
    }

    #[test]
    fn test_key_filter_matches_request_and_problem() {
        let filter = ProblemLinkFilter::by_key(1, 2);
        assert!(link_matches(&filter, &link(2, false, None)));
        assert!(!link_matches(&filter, &link(3, false, None)));
    }
}
