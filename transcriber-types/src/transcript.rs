use serde::{Deserialize, Serialize};

/// One line of a transcript snapshot.
///
/// Identity is the engine-assigned `id`, a stable 64-bit value that outlives
/// individual snapshots. The streaming flags (`is_complete`, `is_updated`,
/// `is_new`, `has_text_changed`) describe what changed since the engine's
/// previous snapshot for the same stream; for batch transcription they are
/// all set at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// Stable identifier for the line.
    pub id: u64,
    /// Transcribed text. Absent until the engine first emits text for the
    /// line, and absent forever when transcription output is disabled.
    pub text: Option<String>,
    /// Offset from the start of the stream, in seconds.
    pub start_time: f32,
    /// Current length of the segment, in seconds.
    pub duration: f32,
    /// The speaker has finished talking; the line's identity is retired.
    pub is_complete: bool,
    /// The line changed since the previous snapshot.
    pub is_updated: bool,
    /// The line was added since the previous snapshot.
    pub is_new: bool,
    /// The line's text changed since the previous snapshot.
    pub has_text_changed: bool,
    /// Diarization speaker id, once the engine has enough audio to assign one.
    pub speaker_id: Option<u64>,
    /// Order in which the speaker first appeared in the transcript.
    /// Meaningful only when `speaker_id` is set.
    pub speaker_index: u32,
    /// Latency of the last transcription pass in milliseconds (streaming only).
    pub last_latency_ms: Option<u32>,
}

impl TranscriptLine {
    /// A minimal line with the given id; all flags clear, no text.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            text: None,
            start_time: 0.0,
            duration: 0.0,
            is_complete: false,
            is_updated: false,
            is_new: false,
            has_text_changed: false,
            speaker_id: None,
            speaker_index: 0,
            last_latency_ms: None,
        }
    }
}

/// A complete transcript snapshot, as returned by a single engine call.
///
/// Immutable once returned; successive snapshots for the same stream re-emit
/// earlier lines with updated flags rather than sending deltas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub lines: Vec<TranscriptLine>,
}

impl Transcript {
    pub fn new(lines: Vec<TranscriptLine>) -> Self {
        Self { lines }
    }

    /// Concatenate all present line texts, newline-separated.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .filter_map(|line| line.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
