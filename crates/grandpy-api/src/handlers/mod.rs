//! API handlers

pub mod health;
pub mod query;

pub use health::{health_check, metrics};
pub use query::{form_handler, query_handler};
