//! Read-side composition of requests and their problem links.

use std::collections::{HashMap, HashSet};

use crate::features::requests::dtos::RequestWithProblemsDto;
use crate::features::requests::models::{ProblemLink, Request};

/// Attach to each request every link carrying its id, keeping store order on both sides.
pub fn embed_all(requests: Vec<Request>, links: Vec<ProblemLink>) -> Vec<RequestWithProblemsDto> {
    let mut grouped: HashMap<i32, Vec<ProblemLink>> = HashMap::new();
    for link in links {
        grouped.entry(link.request_id).or_default().push(link);
    }

    requests
        .into_iter()
        .map(|request| {
            let problems = grouped.remove(&request.id).unwrap_or_default();
            RequestWithProblemsDto::new(request, problems)
        })
        .collect()
}

/// Link-first shape: one entry per link, its parent request carrying only that link.
///
/// Links whose parent is missing are dropped.
pub fn embed_each(links: Vec<ProblemLink>, requests: Vec<Request>) -> Vec<RequestWithProblemsDto> {
    let parents: HashMap<i32, Request> = requests.into_iter().map(|r| (r.id, r)).collect();

    links
        .into_iter()
        .filter_map(|link| match parents.get(&link.request_id) {
            Some(parent) => Some(RequestWithProblemsDto::new(parent.clone(), vec![link])),
            None => {
                tracing::warn!(
                    "Skipping problem {} of missing request {}",
                    link.problem_id,
                    link.request_id
                );
                None
            }
        })
        .collect()
}

/// Distinct parent ids of `links`, in first-seen order
pub fn parent_ids(links: &[ProblemLink]) -> Vec<i32> {
    let mut seen = HashSet::new();
    links
        .iter()
        .map(|link| link.request_id)
        .filter(|id| seen.insert(*id))
        .collect()
}
