//! Call audio plumbing
//!
//! Audio frames from the transport never influence session control flow;
//! they only feed sinks. `LevelMeter` drives the client's voice
//! visualization, `WavSink` optionally captures the call to disk.

pub mod levels;
pub mod recorder;

pub use levels::LevelMeter;
pub use recorder::WavSink;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
}

/// Consumer of call audio frames.
///
/// Sinks must be cheap per frame; they run on the session event loop.
pub trait AudioSink: Send {
    /// Accept one frame. Every frame reaches the sink; sinks that log must
    /// rate-limit their own output.
    fn accept(&mut self, frame: &AudioFrame);

    /// Flush and close the sink at call end
    fn finish(&mut self) -> anyhow::Result<()>;
}
