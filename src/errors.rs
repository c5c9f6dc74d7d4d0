//! Typed errors for the attempt-fatal boundary of a session.
//!
//! Everything past registration is best-effort by policy and stays on
//! `anyhow::Result` internally; these variants are the failures that kill
//! an interview attempt outright and need distinct handling upstream.

use thiserror::Error;

/// Errors that terminate an interview attempt before it produced an outcome.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to register interview call with the backend: {0}")]
    Registration(#[source] anyhow::Error),

    #[error("Failed to start the realtime call transport: {0}")]
    TransportStart(#[source] anyhow::Error),

    #[error("Session {call_id} is already live")]
    AlreadyStarted { call_id: String },
}
