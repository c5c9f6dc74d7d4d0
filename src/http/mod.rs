//! HTTP API server for the interview client
//!
//! This module provides a REST API for driving interview call sessions:
//! - POST /interviews/start - Register and start a new interview call
//! - POST /interviews/:call_id/stop - Hang up a live call
//! - GET /interviews/:call_id/status - Query session status
//! - GET /interviews/:call_id/outcome - Terminal outcome + navigation payload
//! - GET /interviews/:call_id/feedback - Generated feedback for the interview
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
