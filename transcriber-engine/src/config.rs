//! TOML configuration for the transcriber.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use transcriber_types::{ModelArch, TranscriberOption};

fn default_sample_rate() -> u32 {
    16000
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriberConfig {
    /// Directory holding the model files. Tilde is expanded.
    pub model_dir: String,
    pub model_arch: ModelArch,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    /// Capture device name. `None` means the host default.
    #[serde(default)]
    pub device: Option<String>,
    /// Engine options passed through at load time, e.g. `skip_transcription`.
    #[serde(default)]
    pub options: Vec<TranscriberOption>,
    /// Write everything fed to the engine to a WAV under the data dir.
    #[serde(default)]
    pub debug_audio: bool,
}

impl TranscriberConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let mut config: Self = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;
        config.model_dir = shellexpand::tilde(&config.model_dir).into_owned();
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("voice-transcriber").join("config.toml"))
    }
}
