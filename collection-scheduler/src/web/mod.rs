//! Web layer for the collection scheduler.
//!
//! JSON endpoints over the trip and schedule services.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
