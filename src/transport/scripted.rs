use anyhow::Result;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::info;

use super::events::TransportEvent;
use super::CallTransport;

/// A transport event scheduled relative to call start
#[derive(Debug, Clone)]
pub struct TimedEvent {
    pub at: Duration,
    pub event: TransportEvent,
}

impl TimedEvent {
    pub fn new(at: Duration, event: TransportEvent) -> Self {
        Self { at, event }
    }

    pub fn at_ms(at_ms: u64, event: TransportEvent) -> Self {
        Self::new(Duration::from_millis(at_ms), event)
    }
}

/// Deterministic transport that replays a timed event script.
///
/// Stands in for the vendor bridge in tests and local development. `stop()`
/// halts the replay and emits a single `CallEnded`, the way a real hangup
/// surfaces through the vendor SDK. Stop invocations are counted so tests
/// can assert the controller never hangs up twice.
pub struct ScriptedTransport {
    script: Mutex<Option<Vec<TimedEvent>>>,
    live: Arc<AtomicBool>,
    stop_calls: AtomicUsize,
    events_tx: Mutex<Option<mpsc::Sender<TransportEvent>>>,
    replay_handle: Mutex<Option<JoinHandle<()>>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<TimedEvent>) -> Self {
        Self {
            script: Mutex::new(Some(script)),
            live: Arc::new(AtomicBool::new(false)),
            stop_calls: AtomicUsize::new(0),
            events_tx: Mutex::new(None),
            replay_handle: Mutex::new(None),
        }
    }

    /// How many times `stop()` has been invoked on this transport
    pub fn stop_count(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CallTransport for ScriptedTransport {
    async fn start(&self, _access_token: &str) -> Result<mpsc::Receiver<TransportEvent>> {
        let script = {
            let mut slot = self.script.lock().await;
            slot.take()
        };

        let Some(script) = script else {
            anyhow::bail!("Scripted transport already started");
        };

        let (tx, rx) = mpsc::channel(64);
        self.live.store(true, Ordering::SeqCst);

        {
            let mut slot = self.events_tx.lock().await;
            *slot = Some(tx.clone());
        }

        let live = Arc::clone(&self.live);
        let replay = tokio::spawn(async move {
            let started = tokio::time::Instant::now();

            for timed in script {
                tokio::time::sleep_until(started + timed.at).await;

                if !live.load(Ordering::SeqCst) {
                    break;
                }

                if tx.send(timed.event).await.is_err() {
                    break;
                }
            }
        });

        {
            let mut slot = self.replay_handle.lock().await;
            *slot = Some(replay);
        }

        Ok(rx)
    }

    async fn stop(&self) -> Result<()> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);

        // Only the first effective stop emits CallEnded
        if self.live.swap(false, Ordering::SeqCst) {
            info!("Scripted transport hanging up");

            let tx = {
                let slot = self.events_tx.lock().await;
                slot.clone()
            };

            if let Some(tx) = tx {
                let _ = tx.send(TransportEvent::CallEnded).await;
            }
        }

        Ok(())
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
