//! Transcript phrase watchers
//!
//! The voice agent cannot emit structured signals mid-conversation, so two
//! behaviors are inferred from natural-language transcript content: the
//! backend's incompatibility script (agent side) and the candidate asking
//! to end the interview (user side). Matching is case-insensitive substring
//! over a fixed phrase list, kept explicit and swappable here rather than
//! scattered through control flow.

use crate::transport::{SpeakerRole, TranscriptEntry};

/// Agent-side phrases indicating the interview-incompatibility script ran.
/// Near-duplicates cover the wording drift observed across agent prompts.
pub const INCOMPATIBILITY_PHRASES: &[&str] = &[
    "your interview credit will be restored",
    "your credit will be restored",
    "your interview credit has been restored",
    "we will restore your interview credit",
    "this position isn't a match for your background",
];

/// User-side phrases treated as a request to end the interview
pub const TERMINATION_PHRASES: &[&str] = &[
    "end call",
    "end the call",
    "end this call",
    "end the interview",
    "end this interview",
    "let's stop here",
    "lets stop here",
    "stop the interview",
    "i'd like to stop",
    "i want to stop",
    "hang up",
];

/// Case-insensitive substring matcher over a fixed phrase list
#[derive(Debug, Clone)]
pub struct PhraseSet {
    phrases: Vec<String>,
}

impl PhraseSet {
    pub fn new(phrases: &[&str]) -> Self {
        Self {
            phrases: phrases.iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.phrases.iter().any(|p| text.contains(p.as_str()))
    }
}

/// What a transcript scan newly discovered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchReport {
    /// The incompatibility flag went from unset to set in this scan
    pub incompatibility_detected: bool,

    /// The termination watcher fired for the first time in this scan;
    /// the caller must stop the call, exactly once
    pub request_stop: bool,
}

/// Both phrase watchers plus the cursor that turns full transcript
/// snapshots into newly-arrived-entries-only scanning.
pub struct TranscriptWatchers {
    incompatibility: PhraseSet,
    termination: PhraseSet,
    entries_seen: usize,
    incompatibility_flag: bool,
    termination_flag: bool,
}

impl TranscriptWatchers {
    pub fn new() -> Self {
        Self::with_phrases(INCOMPATIBILITY_PHRASES, TERMINATION_PHRASES)
    }

    pub fn with_phrases(incompatibility: &[&str], termination: &[&str]) -> Self {
        Self {
            incompatibility: PhraseSet::new(incompatibility),
            termination: PhraseSet::new(termination),
            entries_seen: 0,
            incompatibility_flag: false,
            termination_flag: false,
        }
    }

    /// Sticky: never unset once an agent entry matched
    pub fn incompatibility_detected(&self) -> bool {
        self.incompatibility_flag
    }

    pub fn termination_requested(&self) -> bool {
        self.termination_flag
    }

    /// Scan one transcript snapshot. Only entries past the cursor are
    /// examined, each against the watcher for its role.
    pub fn observe(&mut self, transcript: &[TranscriptEntry]) -> WatchReport {
        let mut report = WatchReport::default();

        if transcript.len() <= self.entries_seen {
            return report;
        }

        for entry in &transcript[self.entries_seen..] {
            match entry.role {
                SpeakerRole::Agent => {
                    if !self.incompatibility_flag && self.incompatibility.matches(&entry.text) {
                        self.incompatibility_flag = true;
                        report.incompatibility_detected = true;
                    }
                }
                SpeakerRole::User => {
                    if !self.termination_flag && self.termination.matches(&entry.text) {
                        self.termination_flag = true;
                        report.request_stop = true;
                    }
                }
            }
        }

        self.entries_seen = transcript.len();

        report
    }
}

impl Default for TranscriptWatchers {
    fn default() -> Self {
        Self::new()
    }
}
