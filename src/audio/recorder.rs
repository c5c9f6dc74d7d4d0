use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{AudioFrame, AudioSink};

/// Captures call audio to a single WAV file.
///
/// Frames are appended as they arrive; `finish()` finalizes the header.
/// Dropping an unfinished sink finalizes best-effort so a crashed session
/// still leaves a readable file.
pub struct WavSink {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    path: PathBuf,
    samples_written: usize,
}

impl WavSink {
    pub fn create(path: impl AsRef<Path>, sample_rate: u32, channels: u16) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let writer = hound::WavWriter::create(&path, spec)
            .with_context(|| format!("Failed to create WAV file: {:?}", path))?;

        info!("Capturing call audio to {:?}", path);

        Ok(Self {
            writer: Some(writer),
            path,
            samples_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn samples_written(&self) -> usize {
        self.samples_written
    }
}

impl AudioSink for WavSink {
    fn accept(&mut self, frame: &AudioFrame) {
        if let Some(writer) = &mut self.writer {
            for &sample in &frame.samples {
                if let Err(e) = writer.write_sample(sample) {
                    warn!("Failed to write call audio sample: {}", e);
                    return;
                }
            }
            self.samples_written += frame.samples.len();
        }
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            writer.finalize().context("Failed to finalize call WAV file")?;
            info!(
                "Call audio capture complete: {:?} ({} samples)",
                self.path, self.samples_written
            );
        }

        Ok(())
    }
}

impl Drop for WavSink {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.finalize() {
                warn!("Failed to finalize WAV writer on drop: {}", e);
            }
        }
    }
}
