pub mod audio;
pub mod backend;
pub mod config;
pub mod credits;
pub mod errors;
pub mod http;
pub mod session;
pub mod transport;

pub use audio::{AudioFrame, AudioSink, LevelMeter, WavSink};
pub use backend::{BackendApi, HttpBackend};
pub use config::Config;
pub use credits::{CreditLedger, RestoreReason};
pub use errors::SessionError;
pub use http::{create_router, AppState};
pub use session::{
    CallPhase, InterviewMetadata, InterviewSession, Navigation, OutcomeKind, SessionOutcome,
    SessionStatus, SessionTiming,
};
pub use transport::{
    CallTransport, ScriptedTransport, SpeakerRole, TimedEvent, TranscriptEntry, TransportEvent,
    TransportFactory, TransportKind,
};
