use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::backend::BackendApi;
use crate::session::{InterviewSession, SessionTiming};
use crate::transport::TransportKind;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Product backend client shared by all sessions
    pub backend: Arc<dyn BackendApi>,

    /// Outcome-routing thresholds applied to every session
    pub timing: SessionTiming,

    /// Transport implementation handed to new sessions
    pub transport_kind: TransportKind,

    /// Directory for per-call WAV captures; disabled when unset
    pub capture_dir: Option<PathBuf>,

    /// Live and finished sessions (call_id → session)
    pub sessions: Arc<RwLock<HashMap<String, Arc<InterviewSession>>>>,
}

impl AppState {
    pub fn new(backend: Arc<dyn BackendApi>, timing: SessionTiming, transport_kind: TransportKind) -> Self {
        Self {
            backend,
            timing,
            transport_kind,
            capture_dir: None,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_capture_dir(mut self, capture_dir: Option<PathBuf>) -> Self {
        self.capture_dir = capture_dir;
        self
    }
}
