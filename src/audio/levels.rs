use std::time::Instant;
use tracing::debug;

use super::{AudioFrame, AudioSink};

/// Peak/RMS meter feeding the voice visualization.
///
/// Every frame updates the meter; log output is limited to one line per
/// second so a 10 Hz frame stream does not flood the console.
pub struct LevelMeter {
    peak: f32,
    rms: f32,
    frames_seen: usize,
    last_log: Option<Instant>,
}

impl LevelMeter {
    pub fn new() -> Self {
        Self {
            peak: 0.0,
            rms: 0.0,
            frames_seen: 0,
            last_log: None,
        }
    }

    /// Latest (peak, rms) levels, normalized to 0.0..=1.0
    pub fn levels(&self) -> (f32, f32) {
        (self.peak, self.rms)
    }

    pub fn frames_seen(&self) -> usize {
        self.frames_seen
    }

    fn measure(samples: &[i16]) -> (f32, f32) {
        if samples.is_empty() {
            return (0.0, 0.0);
        }

        let mut peak = 0i32;
        let mut sum_squares = 0f64;

        for &s in samples {
            let v = (s as i32).abs();
            if v > peak {
                peak = v;
            }
            let f = s as f64 / i16::MAX as f64;
            sum_squares += f * f;
        }

        let peak = peak as f32 / i16::MAX as f32;
        let rms = (sum_squares / samples.len() as f64).sqrt() as f32;

        (peak, rms)
    }
}

impl Default for LevelMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for LevelMeter {
    fn accept(&mut self, frame: &AudioFrame) {
        let (peak, rms) = Self::measure(&frame.samples);
        self.peak = peak;
        self.rms = rms;
        self.frames_seen += 1;

        let due = match self.last_log {
            None => true,
            Some(at) => at.elapsed().as_secs() >= 1,
        };

        if due {
            debug!(
                "Audio levels: peak={:.3} rms={:.3} ({} frames)",
                self.peak, self.rms, self.frames_seen
            );
            self.last_log = Some(Instant::now());
        }
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        debug!("Level meter closed after {} frames", self.frames_seen);
        Ok(())
    }
}
