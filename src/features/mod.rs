pub mod events;
pub mod requests;
