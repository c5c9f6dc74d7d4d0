#![allow(dead_code)]

// Shared test doubles for the session test suites.

use anyhow::Result;
use prepcall::backend::{
    BackendApi, CreditBalance, CreditConsumeRequest, CreditRestoreRequest, FeedbackReport,
    InterviewCloseRequest, RegisterCallRequest, RegisterCallResponse,
};
use prepcall::session::InterviewMetadata;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Backend stub that logs every operation it receives.
///
/// Log entries are "op" or "op:detail" strings so tests can count exactly
/// which bookkeeping calls a session issued.
pub struct RecordingBackend {
    ops: Mutex<Vec<String>>,
    fail_restores: AtomicBool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            ops: Mutex::new(Vec::new()),
            fail_restores: AtomicBool::new(false),
        }
    }

    /// Make every restore_credit call fail, to exercise the swallow policy
    pub fn fail_restores(&self) {
        self.fail_restores.store(true, Ordering::SeqCst);
    }

    pub fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| op.starts_with(prefix))
            .count()
    }

    fn record(&self, op: String) {
        self.ops.lock().unwrap().push(op);
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl BackendApi for RecordingBackend {
    async fn register_call(&self, req: &RegisterCallRequest) -> Result<RegisterCallResponse> {
        self.record(format!("register_call:{}", req.role_title));

        Ok(RegisterCallResponse {
            call_id: "call-123".to_string(),
            access_token: "tok-abc".to_string(),
            interview_id: Some("iv-123".to_string()),
        })
    }

    async fn consume_credit(&self, _req: &CreditConsumeRequest) -> Result<CreditBalance> {
        self.record("consume_credit".to_string());
        Ok(CreditBalance { balance: 4 })
    }

    async fn restore_credit(&self, req: &CreditRestoreRequest) -> Result<CreditBalance> {
        self.record(format!("restore_credit:{}", req.reason));

        if self.fail_restores.load(Ordering::SeqCst) {
            anyhow::bail!("ledger unavailable");
        }

        Ok(CreditBalance { balance: 5 })
    }

    async fn cancel_interview(&self, req: &InterviewCloseRequest) -> Result<()> {
        self.record(format!("cancel_interview:{}", req.elapsed_secs));
        Ok(())
    }

    async fn complete_interview(&self, req: &InterviewCloseRequest) -> Result<()> {
        self.record(format!("complete_interview:{}", req.elapsed_secs));
        Ok(())
    }

    async fn get_feedback(&self, interview_id: &str) -> Result<FeedbackReport> {
        self.record("get_feedback".to_string());

        Ok(FeedbackReport {
            interview_id: interview_id.to_string(),
            summary: "Solid fundamentals, work on conciseness.".to_string(),
            strengths: vec!["clear examples".to_string()],
            improvements: vec!["shorter answers".to_string()],
            score: Some(7.5),
        })
    }
}

/// Interview metadata used across the session tests
pub fn test_metadata() -> InterviewMetadata {
    InterviewMetadata {
        user_id: "user-42".to_string(),
        role_title: "Engineer".to_string(),
        company: "Acme".to_string(),
        job_description: Some("Build things".to_string()),
        resume_text: None,
    }
}
