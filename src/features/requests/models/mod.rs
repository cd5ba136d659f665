pub mod event_window;
pub mod problem_link;
pub mod request;

pub use event_window::EventWindow;
pub use problem_link::{NewProblemLink, ProblemLink, ProblemLinkChanges};
pub use request::{NewRequest, Request, RequestChanges};
