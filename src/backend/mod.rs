//! Product backend interface
//!
//! Everything the session service asks of the remote backend goes through
//! the `BackendApi` trait:
//! - register-call: open a session, obtain call handle + access credential
//! - consume-credit / restore-credit: the usage ledger
//! - cancel-interview / complete-interview: record bookkeeping
//! - get-feedback: fetch the generated interview feedback
//!
//! `HttpBackend` is the production implementation; tests substitute their
//! own recording stubs.

pub mod client;
pub mod messages;

use anyhow::Result;
use std::future::Future;
use tracing::warn;

pub use client::HttpBackend;
pub use messages::{
    CreditBalance, CreditConsumeRequest, CreditRestoreRequest, FeedbackReport,
    InterviewCloseRequest, RegisterCallRequest, RegisterCallResponse,
};

#[async_trait::async_trait]
pub trait BackendApi: Send + Sync {
    /// Register a new interview call, obtaining a call handle and the
    /// credential the realtime transport presents to the vendor
    async fn register_call(&self, req: &RegisterCallRequest) -> Result<RegisterCallResponse>;

    /// Consume one interview credit for this call
    async fn consume_credit(&self, req: &CreditConsumeRequest) -> Result<CreditBalance>;

    /// Restore one interview credit with a stable reason string
    async fn restore_credit(&self, req: &CreditRestoreRequest) -> Result<CreditBalance>;

    /// Mark the interview record cancelled (interrupted or incompatible runs)
    async fn cancel_interview(&self, req: &InterviewCloseRequest) -> Result<()>;

    /// Mark the interview record completed
    async fn complete_interview(&self, req: &InterviewCloseRequest) -> Result<()>;

    /// Fetch generated feedback for an interview
    async fn get_feedback(&self, interview_id: &str) -> Result<FeedbackReport>;
}

/// Run a fallible backend operation without letting its failure escape.
///
/// Session policy: ledger and record bookkeeping must never trap the user in
/// the flow. Errors are logged with the operation name and the caller gets
/// `None` instead.
pub async fn best_effort<T>(what: &str, fut: impl Future<Output = Result<T>>) -> Option<T> {
    match fut.await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} failed, continuing: {:#}", what, e);
            None
        }
    }
}
