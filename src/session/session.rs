use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::config::{InterviewMetadata, SessionTiming};
use super::router::CompletionRouter;
use super::state::{CallPhase, SessionOutcome, SessionRecord, SessionState, SessionStatus};
use super::watchers::TranscriptWatchers;
use crate::audio::AudioSink;
use crate::backend::{BackendApi, RegisterCallRequest};
use crate::credits::CreditLedger;
use crate::errors::SessionError;
use crate::transport::{CallTransport, TransportEvent};

/// One interview attempt, from registration to terminal outcome.
///
/// Owns the transport event loop and the single mutable state bundle; all
/// transitions happen on the event task. External callers read status
/// snapshots, request a stop, or await the outcome.
pub struct InterviewSession {
    metadata: InterviewMetadata,
    timing: SessionTiming,
    record: SessionRecord,
    backend: Arc<dyn BackendApi>,
    credits: CreditLedger,
    transport: Arc<dyn CallTransport>,
    state: Arc<Mutex<SessionState>>,
    sinks: Mutex<Vec<Box<dyn AudioSink>>>,
    event_task: Mutex<Option<JoinHandle<()>>>,
    done: Arc<Notify>,
}

impl InterviewSession {
    /// Register the call with the backend and consume the interview credit.
    ///
    /// The credit is taken up front, before the live call starts: a
    /// candidate who never connects still pays, unless a later outcome
    /// restores it. A consume failure is logged and does not block the
    /// interview; a registration failure kills the attempt.
    pub async fn register(
        metadata: InterviewMetadata,
        timing: SessionTiming,
        backend: Arc<dyn BackendApi>,
        transport: Arc<dyn CallTransport>,
    ) -> Result<Self, SessionError> {
        info!(
            "Registering interview call: {} at {} for user {}",
            metadata.role_title, metadata.company, metadata.user_id
        );

        let req = RegisterCallRequest {
            user_id: metadata.user_id.clone(),
            role_title: metadata.role_title.clone(),
            company: metadata.company.clone(),
            job_description: metadata.job_description.clone(),
            resume_text: metadata.resume_text.clone(),
        };

        let resp = backend
            .register_call(&req)
            .await
            .map_err(SessionError::Registration)?;

        info!(
            "Call {} registered (interview record: {})",
            resp.call_id,
            resp.interview_id.as_deref().unwrap_or("none")
        );

        let record = SessionRecord {
            call_id: resp.call_id,
            access_token: resp.access_token,
            interview_id: resp.interview_id,
            registered_at: Utc::now(),
        };

        let credits = CreditLedger::new(Arc::clone(&backend), metadata.user_id.clone());
        credits.consume(&record.call_id).await;

        Ok(Self {
            metadata,
            timing,
            record,
            backend,
            credits,
            transport,
            state: Arc::new(Mutex::new(SessionState::new())),
            sinks: Mutex::new(Vec::new()),
            event_task: Mutex::new(None),
            done: Arc::new(Notify::new()),
        })
    }

    /// Attach an audio sink before `start()`. Frames never influence
    /// control flow; they only feed sinks.
    pub fn add_sink(&mut self, sink: Box<dyn AudioSink>) {
        self.sinks.get_mut().push(sink);
    }

    pub fn call_id(&self) -> &str {
        &self.record.call_id
    }

    pub fn interview_id(&self) -> Option<&str> {
        self.record.interview_id.as_deref()
    }

    pub fn metadata(&self) -> &InterviewMetadata {
        &self.metadata
    }

    /// Start the live call and spawn the event loop
    pub async fn start(&self) -> Result<(), SessionError> {
        {
            let mut state = self.state.lock().await;
            if state.phase != CallPhase::Idle {
                return Err(SessionError::AlreadyStarted {
                    call_id: self.record.call_id.clone(),
                });
            }
            state.phase = CallPhase::Connecting;
        }

        let events = match self.transport.start(&self.record.access_token).await {
            Ok(rx) => rx,
            Err(e) => {
                let mut state = self.state.lock().await;
                state.phase = CallPhase::Idle;
                return Err(SessionError::TransportStart(e));
            }
        };

        info!(
            "Call {} connecting via {} transport",
            self.record.call_id,
            self.transport.name()
        );

        let sinks = {
            let mut slot = self.sinks.lock().await;
            std::mem::take(&mut *slot)
        };

        let router = CompletionRouter::new(
            self.timing,
            Arc::clone(&self.backend),
            self.credits.clone(),
        );

        let task = tokio::spawn(Self::event_loop(
            events,
            Arc::clone(&self.state),
            Arc::clone(&self.transport),
            router,
            self.record.clone(),
            self.metadata.clone(),
            sinks,
            Arc::clone(&self.done),
        ));

        {
            let mut slot = self.event_task.lock().await;
            *slot = Some(task);
        }

        Ok(())
    }

    /// External hangup: same path the termination watcher takes
    pub async fn stop(&self) -> Result<()> {
        info!("Stop requested for call {}", self.record.call_id);
        self.transport.stop().await
    }

    /// Point-in-time snapshot for the status endpoint
    pub async fn status(&self) -> SessionStatus {
        let state = self.state.lock().await;

        SessionStatus {
            call_id: self.record.call_id.clone(),
            interview_id: self.record.interview_id.clone(),
            phase: state.phase,
            registered_at: self.record.registered_at,
            started_at: state.started_at_utc,
            elapsed_ms: state.elapsed_now().as_millis() as u64,
            incompatibility_detected: state.incompatibility_detected,
            termination_requested: state.termination_requested,
            transport_failure: state.transport_failure.clone(),
            outcome_ready: state.outcome.is_some(),
        }
    }

    /// The terminal outcome, once decided
    pub async fn outcome(&self) -> Option<SessionOutcome> {
        self.state.lock().await.outcome.clone()
    }

    /// Wait until the session reaches its terminal outcome
    pub async fn wait_for_outcome(&self) -> SessionOutcome {
        loop {
            let notified = self.done.notified();

            if let Some(outcome) = self.outcome().await {
                // Reap the event task; its work is done
                let handle = { self.event_task.lock().await.take() };
                if let Some(task) = handle {
                    if let Err(e) = task.await {
                        error!("Session event task panicked: {}", e);
                    }
                }

                return outcome;
            }

            notified.await;
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn event_loop(
        mut events: tokio::sync::mpsc::Receiver<TransportEvent>,
        state: Arc<Mutex<SessionState>>,
        transport: Arc<dyn CallTransport>,
        router: CompletionRouter,
        record: SessionRecord,
        metadata: InterviewMetadata,
        mut sinks: Vec<Box<dyn AudioSink>>,
        done: Arc<Notify>,
    ) {
        let mut watchers = TranscriptWatchers::new();

        while let Some(event) = events.recv().await {
            match event {
                TransportEvent::CallStarted => {
                    info!("Call {} connected", record.call_id);
                }

                TransportEvent::AgentStartTalking => {
                    let mut state = state.lock().await;
                    if state.started_at.is_none() {
                        // Interaction clock starts at first agent speech,
                        // not at connect
                        state.started_at = Some(Instant::now());
                        state.started_at_utc = Some(Utc::now());
                        state.phase = CallPhase::Active;
                        info!("Agent speaking, interaction clock started for {}", record.call_id);
                    }
                }

                TransportEvent::AgentStopTalking => {
                    debug!("Agent paused on call {}", record.call_id);
                }

                TransportEvent::TranscriptUpdate(entries) => {
                    let report = watchers.observe(&entries);

                    if report.incompatibility_detected {
                        warn!("Incompatibility script detected on call {}", record.call_id);
                        state.lock().await.incompatibility_detected = true;
                    }

                    if report.request_stop {
                        info!("Candidate asked to end call {}", record.call_id);
                        state.lock().await.termination_requested = true;

                        if let Err(e) = transport.stop().await {
                            warn!("Failed to stop transport after termination request: {:#}", e);
                        }
                    }
                }

                TransportEvent::Audio(frame) => {
                    for sink in sinks.iter_mut() {
                        sink.accept(&frame);
                    }
                }

                TransportEvent::TransportError(message) => {
                    // Routed through the same completion path as a hangup
                    error!("Transport error on call {}: {}", record.call_id, message);
                    let mut state = state.lock().await;
                    state.transport_failure = Some(message);
                    break;
                }

                TransportEvent::CallEnded => {
                    info!("Call {} ended", record.call_id);
                    break;
                }
            }
        }

        {
            let mut state = state.lock().await;
            state.phase = CallPhase::Ending;
            state.ended_at_utc = Some(Utc::now());
            if state.elapsed.is_none() {
                state.elapsed = Some(
                    state
                        .started_at
                        .map(|at| at.elapsed())
                        .unwrap_or(Duration::ZERO),
                );
            }
        }

        for sink in sinks.iter_mut() {
            if let Err(e) = sink.finish() {
                warn!("Audio sink close failed: {:#}", e);
            }
        }

        let outcome = router.finish(&record, &metadata, &state).await;

        {
            let mut state = state.lock().await;
            state.phase = CallPhase::Terminal;
            if let Some(outcome) = outcome {
                state.outcome = Some(outcome);
            }
        }

        done.notify_waiters();
    }
}
