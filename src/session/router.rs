use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::config::{InterviewMetadata, SessionTiming};
use super::state::{Navigation, OutcomeKind, SessionOutcome, SessionRecord, SessionState};
use crate::backend::{best_effort, BackendApi, InterviewCloseRequest};
use crate::credits::{CreditLedger, RestoreReason};

/// Decide `(outcome kind, credit restored)` from interaction time and the
/// incompatibility flag. Pure routing policy, no side effects.
///
/// Incompatibility wins regardless of elapsed time. Below the minimum
/// duration the run is an interruption, and inside the grace window the
/// consumed credit comes back.
pub fn classify(elapsed: Duration, incompatibility: bool, timing: &SessionTiming) -> (OutcomeKind, bool) {
    if incompatibility {
        return (OutcomeKind::Incompatibility, true);
    }

    if elapsed < timing.min_interview_duration {
        let restored = elapsed < timing.credit_restore_grace;
        return (OutcomeKind::EarlyInterruption, restored);
    }

    (OutcomeKind::Completed, false)
}

/// Routes a finished call to its terminal outcome: one classification, the
/// matching backend bookkeeping, and the navigation payload.
///
/// Every backend call here is best-effort by policy: bookkeeping failures
/// are logged and never block the candidate's exit from the flow.
pub struct CompletionRouter {
    timing: SessionTiming,
    backend: Arc<dyn BackendApi>,
    credits: CreditLedger,
}

impl CompletionRouter {
    pub fn new(timing: SessionTiming, backend: Arc<dyn BackendApi>, credits: CreditLedger) -> Self {
        Self {
            timing,
            backend,
            credits,
        }
    }

    /// Route the session to its outcome. Returns `None` when a previous
    /// invocation already handled completion; duplicate call-ended signals
    /// must not restore credit or navigate twice.
    pub async fn finish(
        &self,
        record: &SessionRecord,
        metadata: &InterviewMetadata,
        state: &Mutex<SessionState>,
    ) -> Option<SessionOutcome> {
        let (elapsed, incompatibility) = {
            let mut state = state.lock().await;

            if state.completion_handled {
                warn!("Completion already handled for {}, ignoring duplicate signal", record.call_id);
                return None;
            }
            state.completion_handled = true;

            (state.elapsed_now(), state.incompatibility_detected)
        };

        // Let in-flight transport teardown drain before bookkeeping
        if !self.timing.settle_delay.is_zero() {
            tokio::time::sleep(self.timing.settle_delay).await;
        }

        let (kind, credit_restored) = classify(elapsed, incompatibility, &self.timing);
        let elapsed_secs = elapsed.as_secs();

        info!(
            "Routing {} to {:?} (elapsed {}s, credit_restored={})",
            record.call_id, kind, elapsed_secs, credit_restored
        );

        let outcome = match kind {
            OutcomeKind::Incompatibility => {
                self.close_record(record, elapsed_secs, false).await;
                self.credits
                    .restore(RestoreReason::Incompatibility, &record.call_id)
                    .await;

                let message = "This role looks like a mismatch for your background, so the \
                               interview was ended. Your interview credit has been restored."
                    .to_string();

                SessionOutcome {
                    kind,
                    credit_restored: true,
                    message: message.clone(),
                    elapsed_ms: elapsed.as_millis() as u64,
                    navigation: Navigation::Home {
                        message,
                        kind,
                        credit_restored: true,
                    },
                }
            }

            OutcomeKind::EarlyInterruption => {
                self.close_record(record, elapsed_secs, false).await;

                if credit_restored {
                    self.credits
                        .restore(RestoreReason::EarlyInterruption, &record.call_id)
                        .await;
                }

                let message = if credit_restored {
                    format!(
                        "The interview ended after only {}s, so no feedback was generated. \
                         Your interview credit has been restored.",
                        elapsed_secs
                    )
                } else {
                    format!(
                        "The interview ended early, after {}s. Interviews shorter than {}s \
                         do not generate feedback.",
                        elapsed_secs,
                        self.timing.min_interview_duration.as_secs()
                    )
                };

                SessionOutcome {
                    kind,
                    credit_restored,
                    message: message.clone(),
                    elapsed_ms: elapsed.as_millis() as u64,
                    navigation: Navigation::Home {
                        message,
                        kind,
                        credit_restored,
                    },
                }
            }

            OutcomeKind::Completed => {
                self.close_record(record, elapsed_secs, true).await;

                SessionOutcome {
                    kind,
                    credit_restored: false,
                    message: "Interview complete. Your feedback is being prepared.".to_string(),
                    elapsed_ms: elapsed.as_millis() as u64,
                    navigation: Navigation::Feedback {
                        call_id: record.call_id.clone(),
                        interview_id: record.interview_id.clone(),
                        metadata: metadata.clone(),
                    },
                }
            }
        };

        Some(outcome)
    }

    /// Cancel or complete the backing interview record, when one exists
    async fn close_record(&self, record: &SessionRecord, elapsed_secs: u64, completed: bool) {
        let Some(interview_id) = &record.interview_id else {
            return;
        };

        let req = InterviewCloseRequest {
            interview_id: interview_id.clone(),
            call_id: record.call_id.clone(),
            elapsed_secs,
        };

        if completed {
            best_effort("Interview complete", self.backend.complete_interview(&req)).await;
        } else {
            best_effort("Interview cancel", self.backend.cancel_interview(&req)).await;
        }
    }
}
