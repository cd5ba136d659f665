//! Requests (chamados) feature.
//!
//! A request is opened at a workstation and carries one or more problem links,
//! each with its own status and priority. Problems flagged as events also carry
//! a scheduled date.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/chamado` | Open a request with its problems |
//! | GET | `/chamado` | List requests, optionally by `problem_id` or `active` |
//! | PUT | `/chamado/{request_id}` | Partially update a request and its problems |
//! | DELETE | `/chamado` | Mark one problem of a request as solved |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{PgRequestStore, RequestStore};
pub use services::RequestService;
