//! Upcoming events: problem links flagged as events, listed by date window.
//!
//! `GET /evento?days_to_event=N` lists events dated between now and N days
//! ahead; without N, every event from the start of today on.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::EventService;
