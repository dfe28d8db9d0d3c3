//! Web layer for the dispatch server.
//!
//! Provides the trip request endpoint and the WebSocket channel that
//! vehicles and observers connect to.

mod dto;
mod routes;
mod socket;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
