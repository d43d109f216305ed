use serde::{Deserialize, Serialize};
use std::fmt;

/// Flag bit requesting a snapshot re-emit even without new audio.
///
/// Passed to the stream transcription call when stopping, so audio that was
/// buffered but not yet reflected in a snapshot is flushed out.
pub const FLAG_FORCE_UPDATE: u32 = 1 << 0;

/// Model architectures understood by the engine.
///
/// A closed set: the engine rejects anything outside these codes. The
/// streaming variants are required for live stream sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ModelArch {
    Tiny,
    Base,
    TinyStreaming,
    BaseStreaming,
    SmallStreaming,
    MediumStreaming,
}

impl ModelArch {
    /// Raw integer code as passed across the engine boundary.
    pub fn as_raw(self) -> i32 {
        match self {
            Self::Tiny => 0,
            Self::Base => 1,
            Self::TinyStreaming => 2,
            Self::BaseStreaming => 3,
            Self::SmallStreaming => 4,
            Self::MediumStreaming => 5,
        }
    }

    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Tiny),
            1 => Some(Self::Base),
            2 => Some(Self::TinyStreaming),
            3 => Some(Self::BaseStreaming),
            4 => Some(Self::SmallStreaming),
            5 => Some(Self::MediumStreaming),
            _ => None,
        }
    }

    pub fn is_streaming(self) -> bool {
        matches!(
            self,
            Self::TinyStreaming | Self::BaseStreaming | Self::SmallStreaming | Self::MediumStreaming
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Base => "base",
            Self::TinyStreaming => "tiny-streaming",
            Self::BaseStreaming => "base-streaming",
            Self::SmallStreaming => "small-streaming",
            Self::MediumStreaming => "medium-streaming",
        }
    }
}

impl fmt::Display for ModelArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an architecture name, e.g. from a config file. Case-insensitive.
impl std::str::FromStr for ModelArch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tiny" => Ok(Self::Tiny),
            "base" => Ok(Self::Base),
            "tiny-streaming" => Ok(Self::TinyStreaming),
            "base-streaming" => Ok(Self::BaseStreaming),
            "small-streaming" => Ok(Self::SmallStreaming),
            "medium-streaming" => Ok(Self::MediumStreaming),
            _ => Err(format!("unknown model architecture '{s}'")),
        }
    }
}

impl TryFrom<String> for ModelArch {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ModelArch> for String {
    fn from(arch: ModelArch) -> Self {
        arch.as_str().to_string()
    }
}

/// Error codes returned by engine calls.
///
/// Any negative code not listed here maps to `Unknown`; the engine reserves
/// the rest of the negative range for future use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    None,
    Unknown,
    InvalidHandle,
    InvalidArgument,
}

impl ErrorCode {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::None,
            -2 => Self::InvalidHandle,
            -3 => Self::InvalidArgument,
            _ => Self::Unknown,
        }
    }

    pub fn as_raw(self) -> i32 {
        match self {
            Self::None => 0,
            Self::Unknown => -1,
            Self::InvalidHandle => -2,
            Self::InvalidArgument => -3,
        }
    }

    pub fn is_ok(self) -> bool {
        self == Self::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "no error",
            Self::Unknown => "unknown error",
            Self::InvalidHandle => "invalid handle",
            Self::InvalidArgument => "invalid argument",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
