//! Debug WAV recording of the audio actually fed to the engine.

use anyhow::Result;
use chrono::Utc;
use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

/// Appends every fed chunk to one timestamped session WAV under the user
/// data directory. Finalize to flush the header; dropping without
/// finalizing leaves a truncated but readable file.
pub struct DebugRecorder {
    writer: WavWriter<BufWriter<File>>,
    path: PathBuf,
}

impl DebugRecorder {
    pub fn new(sample_rate: u32) -> Result<Self> {
        let session_id = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("could not determine data directory"))?
            .join("voice-transcriber")
            .join("debug");
        fs::create_dir_all(&dir)?;

        let path = dir.join(format!("session_{session_id}.wav"));
        let spec = WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let writer = WavWriter::create(&path, spec)?;
        info!("debug audio recording to {}", path.display());

        Ok(Self { writer, path })
    }

    pub fn record(&mut self, samples: &[f32]) -> Result<()> {
        for &sample in samples {
            self.writer.write_sample(sample)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn finalize(self) -> Result<()> {
        let path = self.path;
        self.writer.finalize()?;
        info!("debug recording finalized: {}", path.display());
        Ok(())
    }
}
