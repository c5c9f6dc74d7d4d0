//! Credit ledger bridge
//!
//! One interview credit is consumed per attempted call and restored when
//! the outcome qualifies. The ledger itself lives in the backend; this
//! bridge only issues consume/restore requests and reports the returned
//! balance. Failures never propagate: the session must not be blocked on
//! ledger bookkeeping.

use std::sync::Arc;
use tracing::info;

use crate::backend::{best_effort, BackendApi, CreditConsumeRequest, CreditRestoreRequest};

/// Why a credit is being handed back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreReason {
    /// The agent ran the interview-incompatibility script
    Incompatibility,
    /// The call ended before the grace window elapsed
    EarlyInterruption,
}

impl RestoreReason {
    /// Stable reason string on the backend wire contract
    pub fn as_str(&self) -> &'static str {
        match self {
            RestoreReason::Incompatibility => "incompatibility",
            RestoreReason::EarlyInterruption => "early_interruption",
        }
    }
}

#[derive(Clone)]
pub struct CreditLedger {
    backend: Arc<dyn BackendApi>,
    user_id: String,
}

impl CreditLedger {
    pub fn new(backend: Arc<dyn BackendApi>, user_id: String) -> Self {
        Self { backend, user_id }
    }

    /// Consume one credit for this call. Returns the new balance when the
    /// backend answered; `None` when the request failed (logged, swallowed).
    pub async fn consume(&self, call_id: &str) -> Option<u32> {
        let req = CreditConsumeRequest {
            user_id: self.user_id.clone(),
            call_id: call_id.to_string(),
        };

        let balance = best_effort("Credit consume", self.backend.consume_credit(&req))
            .await
            .map(|r| r.balance);

        if let Some(balance) = balance {
            info!("Consumed interview credit for {} (balance now {})", call_id, balance);
        }

        balance
    }

    /// Restore one credit. Same failure policy as `consume`; the caller may
    /// report restoration to the user regardless, so the raw result is
    /// logged here for operators to reconcile.
    pub async fn restore(&self, reason: RestoreReason, call_id: &str) -> Option<u32> {
        let req = CreditRestoreRequest {
            user_id: self.user_id.clone(),
            call_id: call_id.to_string(),
            reason: reason.as_str().to_string(),
        };

        let balance = best_effort("Credit restore", self.backend.restore_credit(&req))
            .await
            .map(|r| r.balance);

        match balance {
            Some(balance) => info!(
                "Restored interview credit for {} ({}, balance now {})",
                call_id,
                reason.as_str(),
                balance
            ),
            None => info!(
                "Credit restore for {} ({}) not confirmed by backend",
                call_id,
                reason.as_str()
            ),
        }

        balance
    }
}
