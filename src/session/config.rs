use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::config::SessionTimingConfig;

/// What the candidate is interviewing for. Forwarded verbatim to the
/// backend at registration and echoed in the feedback navigation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewMetadata {
    pub user_id: String,
    pub role_title: String,
    pub company: String,
    pub job_description: Option<String>,
    pub resume_text: Option<String>,
}

/// Duration thresholds governing outcome routing
#[derive(Debug, Clone, Copy)]
pub struct SessionTiming {
    /// Interviews shorter than this are treated as interrupted
    pub min_interview_duration: Duration,

    /// Interruptions shorter than this also restore the consumed credit.
    /// Invariant: never exceeds `min_interview_duration`.
    pub credit_restore_grace: Duration,

    /// Pause between call end and outcome bookkeeping, letting transport
    /// teardown drain
    pub settle_delay: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            min_interview_duration: Duration::from_secs(30),
            credit_restore_grace: Duration::from_secs(15),
            settle_delay: Duration::from_secs(4),
        }
    }
}

impl SessionTiming {
    pub fn from_config(cfg: &SessionTimingConfig) -> Self {
        let min_interview_duration = Duration::from_millis(cfg.min_interview_ms);
        let mut credit_restore_grace = Duration::from_millis(cfg.credit_restore_grace_ms);

        if credit_restore_grace > min_interview_duration {
            warn!(
                "credit_restore_grace_ms ({}) exceeds min_interview_ms ({}), clamping",
                cfg.credit_restore_grace_ms, cfg.min_interview_ms
            );
            credit_restore_grace = min_interview_duration;
        }

        Self {
            min_interview_duration,
            credit_restore_grace,
            settle_delay: Duration::from_millis(cfg.settle_delay_ms),
        }
    }

    /// Zero settle delay, for tests and for callers that already sequence
    /// teardown themselves
    pub fn without_settle_delay(mut self) -> Self {
        self.settle_delay = Duration::ZERO;
        self
    }
}
