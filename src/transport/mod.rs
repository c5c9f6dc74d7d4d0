//! Realtime call transport
//!
//! The voice vendor's SDK is consumed as an opaque event emitter behind the
//! `CallTransport` trait. Implementations own the vendor connection and
//! translate its callbacks into `TransportEvent`s on an mpsc channel; the
//! session controller is the single consumer.

pub mod events;
pub mod scripted;

use anyhow::Result;
use tokio::sync::mpsc;

pub use events::{SpeakerRole, TranscriptEntry, TransportEvent};
pub use scripted::{ScriptedTransport, TimedEvent};

/// Realtime call transport trait
///
/// Implementations:
/// - Vendor bridge: dials the realtime voice vendor (linked separately)
/// - Scripted: replays a timed event script (tests, local development)
#[async_trait::async_trait]
pub trait CallTransport: Send + Sync {
    /// Dial the call using the backend-issued access credential.
    ///
    /// Returns a channel receiver that will deliver transport events until
    /// the call ends.
    async fn start(&self, access_token: &str) -> Result<mpsc::Receiver<TransportEvent>>;

    /// Hang up. Safe to call more than once; the transport emits a single
    /// `CallEnded` for the first effective stop.
    async fn stop(&self) -> Result<()>;

    /// Whether a call is currently live
    fn is_live(&self) -> bool;

    /// Transport name for logging
    fn name(&self) -> &str;
}

/// Which transport implementation to hand a session
#[derive(Debug, Clone)]
pub enum TransportKind {
    /// Realtime voice vendor bridge
    Vendor { ws_url: String },
    /// Timed event replay (tests, local development)
    Scripted(Vec<TimedEvent>),
}

/// Transport factory
pub struct TransportFactory;

impl TransportFactory {
    pub fn create(kind: TransportKind) -> Result<std::sync::Arc<dyn CallTransport>> {
        match kind {
            TransportKind::Vendor { ws_url } => {
                anyhow::bail!(
                    "No vendor transport bridge is linked into this build (requested {})",
                    ws_url
                )
            }
            TransportKind::Scripted(script) => {
                Ok(std::sync::Arc::new(ScriptedTransport::new(script)))
            }
        }
    }
}
