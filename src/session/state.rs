use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

use super::config::InterviewMetadata;

/// Where a session's call currently is.
///
/// The live-call machine is Connecting → Active → Ending → Terminal;
/// `Idle` covers the registered-but-not-started window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallPhase {
    /// Registered with the backend, transport not started yet
    Idle,
    /// Transport started, waiting for the agent's first words
    Connecting,
    /// Agent has spoken; the interaction clock is running
    Active,
    /// Call ended, outcome not yet routed
    Ending,
    /// Outcome decided
    Terminal,
}

/// Backend-issued identifiers for one interview attempt
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub call_id: String,
    pub access_token: String,
    pub interview_id: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// The single mutable state bundle for one session.
///
/// Mutated only from the event task and the completion router; everything
/// else reads snapshots.
#[derive(Debug)]
pub struct SessionState {
    pub phase: CallPhase,

    /// Set on the first agent_start_talking, not on connect: elapsed time
    /// measures interaction, not connection setup
    pub started_at: Option<Instant>,
    pub started_at_utc: Option<DateTime<Utc>>,
    pub ended_at_utc: Option<DateTime<Utc>>,

    /// Interaction time, captured when the call leaves the live state
    pub elapsed: Option<Duration>,

    /// Sticky: the agent uttered the incompatibility script
    pub incompatibility_detected: bool,

    /// Sticky: the candidate asked to end the interview
    pub termination_requested: bool,

    /// Transport error that ended the call, if one did
    pub transport_failure: Option<String>,

    /// One-shot latch guarding the completion router
    pub completion_handled: bool,

    pub outcome: Option<SessionOutcome>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: CallPhase::Idle,
            started_at: None,
            started_at_utc: None,
            ended_at_utc: None,
            elapsed: None,
            incompatibility_detected: false,
            termination_requested: false,
            transport_failure: None,
            completion_handled: false,
            outcome: None,
        }
    }

    /// Interaction time so far: zero until the agent first speaks, frozen
    /// once the call has ended
    pub fn elapsed_now(&self) -> Duration {
        if let Some(elapsed) = self.elapsed {
            return elapsed;
        }

        self.started_at
            .map(|at| at.elapsed())
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal outcome kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Completed,
    EarlyInterruption,
    Incompatibility,
}

/// Where the client goes next, and with what payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "destination", rename_all = "snake_case")]
pub enum Navigation {
    /// Completed interviews land on the feedback screen
    Feedback {
        call_id: String,
        interview_id: Option<String>,
        metadata: InterviewMetadata,
    },

    /// Interrupted and incompatible interviews go home with an explanation
    Home {
        message: String,
        #[serde(rename = "type")]
        kind: OutcomeKind,
        #[serde(rename = "creditRestored")]
        credit_restored: bool,
    },
}

/// The session's terminal outcome, decided exactly once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub kind: OutcomeKind,
    pub credit_restored: bool,
    /// Human-readable copy shown to the candidate
    pub message: String,
    pub elapsed_ms: u64,
    pub navigation: Navigation,
}

/// Point-in-time snapshot served by the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub call_id: String,
    pub interview_id: Option<String>,
    pub phase: CallPhase,
    pub registered_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_ms: u64,
    pub incompatibility_detected: bool,
    pub termination_requested: bool,
    pub transport_failure: Option<String>,
    pub outcome_ready: bool,
}
