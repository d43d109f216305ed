//! A scripted engine for integration tests.
//!
//! Deterministic stand-in for the real engine: it "transcribes" by counting
//! samples. Every `SAMPLES_PER_WORD` samples fed to a stream yield one word
//! from a fixed list, every `WORDS_PER_LINE` words close out a line, and the
//! trailing partial line completes only on a force-update snapshot. Because
//! output is a pure function of cumulative input, streaming and batch runs
//! over the same audio must agree, which is exactly what the contract tests
//! lean on.

use std::collections::HashMap;
use std::sync::Mutex;

use transcriber_engine::{EngineGateway, RawHandle};
use transcriber_types::{ModelArch, Transcript, TranscriberOption, FLAG_FORCE_UPDATE};

pub const SAMPLES_PER_WORD: usize = 1600;
pub const WORDS_PER_LINE: usize = 4;

/// Route crate logs through the test harness; honors `RUST_LOG`.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

const WORDS: &[&str] = &[
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel",
];

#[derive(Default)]
struct StreamRecord {
    started: bool,
    samples: usize,
    // Last reported (word_count, complete) per line index, for update flags.
    reported: HashMap<usize, (usize, bool)>,
}

#[derive(Default)]
struct TranscriberRecord {
    skip_transcription: bool,
    streams: HashMap<RawHandle, StreamRecord>,
}

#[derive(Default)]
pub struct ScriptedEngine {
    state: Mutex<EngineState>,
}

#[derive(Default)]
struct EngineState {
    next_handle: RawHandle,
    transcribers: HashMap<RawHandle, TranscriberRecord>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

fn line_words(line: usize, count: usize) -> String {
    (0..count)
        .map(|i| WORDS[(line * WORDS_PER_LINE + i) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the snapshot for `samples` cumulative samples, updating the
/// per-line report record so is_new / is_updated / has_text_changed come
/// out right on repeat snapshots.
fn snapshot(
    samples: usize,
    force: bool,
    skip: bool,
    reported: &mut HashMap<usize, (usize, bool)>,
) -> Transcript {
    let total_words = samples / SAMPLES_PER_WORD;
    let mut lines = Vec::new();

    let mut line = 0;
    let mut remaining = total_words;
    while remaining > 0 {
        let count = remaining.min(WORDS_PER_LINE);
        remaining -= count;
        let complete = count == WORDS_PER_LINE || (force && remaining == 0);

        let prev = reported.get(&line).copied();
        let changed = prev.map_or(count > 0, |(w, _)| w != count);
        let updated = prev.map_or(true, |(w, c)| w != count || c != complete);

        let mut out = transcriber_types::TranscriptLine::new(line as u64);
        out.start_time = (line * WORDS_PER_LINE * SAMPLES_PER_WORD) as f32 / 16000.0;
        out.duration = (count * SAMPLES_PER_WORD) as f32 / 16000.0;
        out.is_new = prev.is_none();
        out.is_complete = complete;
        out.is_updated = updated;
        if !skip {
            out.text = Some(line_words(line, count));
            out.has_text_changed = changed;
        }
        reported.insert(line, (count, complete));
        lines.push(out);
        line += 1;
    }
    Transcript::new(lines)
}

impl EngineGateway for ScriptedEngine {
    fn load_from_files(
        &self,
        _path: &str,
        _arch: ModelArch,
        options: &[TranscriberOption],
    ) -> RawHandle {
        let mut state = self.state.lock().unwrap();
        state.next_handle += 1;
        let handle = state.next_handle;
        state.transcribers.insert(
            handle,
            TranscriberRecord {
                skip_transcription: options
                    .iter()
                    .any(|o| o.name == "skip_transcription" && o.value == "1"),
                streams: HashMap::new(),
            },
        );
        handle
    }

    fn load_from_memory(
        &self,
        _encoder: &[u8],
        _decoder: &[u8],
        _tokenizer: &[u8],
        arch: ModelArch,
        options: &[TranscriberOption],
    ) -> RawHandle {
        self.load_from_files("<memory>", arch, options)
    }

    fn free_transcriber(&self, transcriber: RawHandle) {
        self.state.lock().unwrap().transcribers.remove(&transcriber);
    }

    fn transcribe_without_streaming(
        &self,
        transcriber: RawHandle,
        audio: &[f32],
        _sample_rate: u32,
        _flags: u32,
    ) -> Option<Transcript> {
        let state = self.state.lock().unwrap();
        let record = state.transcribers.get(&transcriber)?;
        // Batch output is final: every line is new, updated, changed, complete.
        let mut reported = HashMap::new();
        Some(snapshot(
            audio.len(),
            true,
            record.skip_transcription,
            &mut reported,
        ))
    }

    fn create_stream(&self, transcriber: RawHandle, _flags: u32) -> RawHandle {
        let mut state = self.state.lock().unwrap();
        state.next_handle += 1;
        let handle = state.next_handle;
        match state.transcribers.get_mut(&transcriber) {
            Some(record) => {
                record.streams.insert(handle, StreamRecord::default());
                handle
            }
            None => -2,
        }
    }

    fn free_stream(&self, transcriber: RawHandle, stream: RawHandle) -> i32 {
        let mut state = self.state.lock().unwrap();
        match state.transcribers.get_mut(&transcriber) {
            Some(record) => {
                if record.streams.remove(&stream).is_some() {
                    0
                } else {
                    -2
                }
            }
            None => -2,
        }
    }

    fn start_stream(&self, transcriber: RawHandle, stream: RawHandle) -> i32 {
        let mut state = self.state.lock().unwrap();
        match state
            .transcribers
            .get_mut(&transcriber)
            .and_then(|r| r.streams.get_mut(&stream))
        {
            Some(record) => {
                record.started = true;
                0
            }
            None => -2,
        }
    }

    fn stop_stream(&self, transcriber: RawHandle, stream: RawHandle) -> i32 {
        let mut state = self.state.lock().unwrap();
        match state
            .transcribers
            .get_mut(&transcriber)
            .and_then(|r| r.streams.get_mut(&stream))
        {
            Some(record) => {
                record.started = false;
                0
            }
            None => -2,
        }
    }

    fn add_audio(
        &self,
        transcriber: RawHandle,
        stream: RawHandle,
        audio: &[f32],
        _sample_rate: u32,
    ) -> i32 {
        let mut state = self.state.lock().unwrap();
        match state
            .transcribers
            .get_mut(&transcriber)
            .and_then(|r| r.streams.get_mut(&stream))
        {
            Some(record) if record.started => {
                record.samples += audio.len();
                0
            }
            Some(_) => -3,
            None => -2,
        }
    }

    fn transcribe_stream(
        &self,
        transcriber: RawHandle,
        stream: RawHandle,
        flags: u32,
    ) -> Option<Transcript> {
        let mut state = self.state.lock().unwrap();
        let skip = state.transcribers.get(&transcriber)?.skip_transcription;
        let record = state
            .transcribers
            .get_mut(&transcriber)?
            .streams
            .get_mut(&stream)?;
        Some(snapshot(
            record.samples,
            flags & FLAG_FORCE_UPDATE != 0,
            skip,
            &mut record.reported,
        ))
    }
}

/// Audio sized to yield exactly `words` words.
pub fn audio_for_words(words: usize) -> Vec<f32> {
    vec![0.0; words * SAMPLES_PER_WORD]
}
