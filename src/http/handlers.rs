use super::state::AppState;
use crate::audio::{LevelMeter, WavSink};
use crate::errors::SessionError;
use crate::session::{InterviewMetadata, InterviewSession, SessionOutcome, SessionStatus};
use crate::transport::TransportFactory;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// The vendor delivers 16kHz mono PCM
const CAPTURE_SAMPLE_RATE: u32 = 16_000;
const CAPTURE_CHANNELS: u16 = 1;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    pub user_id: String,
    pub role_title: String,
    pub company: String,
    pub job_description: Option<String>,
    pub resume_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    pub call_id: String,
    pub interview_id: Option<String>,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StopInterviewResponse {
    pub call_id: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub ready: bool,
    pub outcome: Option<SessionOutcome>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: String) -> axum::response::Response {
    (status, Json(ErrorResponse { error })).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /interviews/start
/// Register a call with the backend, consume the credit, start the transport
pub async fn start_interview(
    State(state): State<AppState>,
    Json(req): Json<StartInterviewRequest>,
) -> impl IntoResponse {
    let metadata = InterviewMetadata {
        user_id: req.user_id,
        role_title: req.role_title,
        company: req.company,
        job_description: req.job_description,
        resume_text: req.resume_text,
    };

    let transport = match TransportFactory::create(state.transport_kind.clone()) {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to create call transport: {:#}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create call transport: {}", e),
            );
        }
    };

    let mut session = match InterviewSession::register(
        metadata,
        state.timing,
        Arc::clone(&state.backend),
        transport,
    )
    .await
    {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to register interview: {}", e);
            return error_response(
                StatusCode::BAD_GATEWAY,
                format!("Failed to register interview: {}", e),
            );
        }
    };

    session.add_sink(Box::new(LevelMeter::new()));

    if let Some(dir) = &state.capture_dir {
        let path = dir.join(format!("{}.wav", session.call_id()));
        match WavSink::create(&path, CAPTURE_SAMPLE_RATE, CAPTURE_CHANNELS) {
            Ok(sink) => session.add_sink(Box::new(sink)),
            Err(e) => warn!("Call audio capture disabled for this call: {:#}", e),
        }
    }

    let session = Arc::new(session);

    if let Err(e) = session.start().await {
        error!("Failed to start interview call: {}", e);
        let status = match e {
            SessionError::AlreadyStarted { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        return error_response(status, format!("Failed to start interview call: {}", e));
    }

    let call_id = session.call_id().to_string();
    let interview_id = session.interview_id().map(|s| s.to_string());

    {
        let mut sessions = state.sessions.write().await;
        sessions.insert(call_id.clone(), session);
    }

    info!("Interview call {} started", call_id);

    (
        StatusCode::OK,
        Json(StartInterviewResponse {
            call_id,
            interview_id,
            status: "connecting".to_string(),
        }),
    )
        .into_response()
}

/// POST /interviews/:call_id/stop
/// External hangup; the session still routes to its outcome
pub async fn stop_interview(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> impl IntoResponse {
    let session = {
        let sessions = state.sessions.read().await;
        sessions.get(&call_id).cloned()
    };

    match session {
        Some(session) => {
            if let Err(e) = session.stop().await {
                error!("Failed to stop call {}: {:#}", call_id, e);
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to stop call: {}", e),
                );
            }

            (
                StatusCode::OK,
                Json(StopInterviewResponse {
                    call_id,
                    status: "stopping".to_string(),
                }),
            )
                .into_response()
        }
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Call {} not found", call_id),
        ),
    }
}

/// GET /interviews/:call_id/status
pub async fn get_interview_status(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> impl IntoResponse {
    let sessions = state.sessions.read().await;

    match sessions.get(&call_id) {
        Some(session) => {
            let status: SessionStatus = session.status().await;
            (StatusCode::OK, Json(status)).into_response()
        }
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Call {} not found", call_id),
        ),
    }
}

/// GET /interviews/:call_id/outcome
/// The terminal outcome and navigation payload, once routing has run
pub async fn get_interview_outcome(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> impl IntoResponse {
    let session = {
        let sessions = state.sessions.read().await;
        sessions.get(&call_id).cloned()
    };

    match session {
        Some(session) => {
            let outcome = session.outcome().await;
            (
                StatusCode::OK,
                Json(OutcomeResponse {
                    ready: outcome.is_some(),
                    outcome,
                }),
            )
                .into_response()
        }
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Call {} not found", call_id),
        ),
    }
}

/// GET /interviews/:call_id/feedback
/// Proxy the backend's generated feedback for this session's interview
pub async fn get_interview_feedback(
    State(state): State<AppState>,
    Path(call_id): Path<String>,
) -> impl IntoResponse {
    let session = {
        let sessions = state.sessions.read().await;
        sessions.get(&call_id).cloned()
    };

    let Some(session) = session else {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("Call {} not found", call_id),
        );
    };

    let Some(interview_id) = session.interview_id() else {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("Call {} has no interview record", call_id),
        );
    };

    match state.backend.get_feedback(interview_id).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            error!("Failed to fetch feedback for {}: {:#}", call_id, e);
            error_response(
                StatusCode::BAD_GATEWAY,
                format!("Failed to fetch feedback: {}", e),
            )
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
