use serde::{Deserialize, Serialize};

use crate::audio::AudioFrame;

/// Who produced a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerRole {
    Agent,
    User,
}

/// One role-attributed utterance from the realtime transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: SpeakerRole,
    pub text: String,
}

impl TranscriptEntry {
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: SpeakerRole::Agent,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: SpeakerRole::User,
            text: text.into(),
        }
    }
}

/// Events the realtime transport surfaces to the session controller.
///
/// These mirror the vendor SDK's documented event set; the controller never
/// inspects transport internals beyond them.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// Connection established; the call is live but the agent may not have
    /// spoken yet
    CallStarted,

    /// Connection ended (graceful hangup or remote teardown)
    CallEnded,

    /// The remote agent began speaking. The first occurrence starts the
    /// interaction clock
    AgentStartTalking,

    /// The remote agent stopped speaking
    AgentStopTalking,

    /// Full ordered transcript snapshot as of this update
    TranscriptUpdate(Vec<TranscriptEntry>),

    /// Raw PCM audio from the call, for visualization/capture sinks only
    Audio(AudioFrame),

    /// Transport-level failure; treated as a call-ended signal
    TransportError(String),
}
