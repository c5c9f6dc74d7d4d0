use serde::{Deserialize, Serialize};

/// Request body for registering a new interview call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCallRequest {
    pub user_id: String,
    pub role_title: String,
    pub company: String,
    pub job_description: Option<String>,
    pub resume_text: Option<String>,
}

/// Response from call registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCallResponse {
    /// Opaque call handle issued by the backend
    pub call_id: String,
    /// Time-bounded credential the transport presents to the vendor
    pub access_token: String,
    /// Interview record backing this call, when the backend created one
    pub interview_id: Option<String>,
}

/// Request body for consuming one interview credit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditConsumeRequest {
    pub user_id: String,
    pub call_id: String,
}

/// Request body for restoring one interview credit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditRestoreRequest {
    pub user_id: String,
    pub call_id: String,
    /// Stable reason string, e.g. "incompatibility" or "early_interruption"
    pub reason: String,
}

/// Credit balance as reported by the ledger after a consume/restore
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditBalance {
    pub balance: u32,
}

/// Request body for closing out an interview record (cancel or complete)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewCloseRequest {
    pub interview_id: String,
    pub call_id: String,
    /// Interaction time in whole seconds, measured from first agent speech
    pub elapsed_secs: u64,
}

/// Feedback produced by the backend for a completed interview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub interview_id: String,
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    /// Overall score (0.0 to 10.0), if the backend graded the interview
    pub score: Option<f32>,
}
