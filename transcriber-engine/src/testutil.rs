//! Shared test double for the engine boundary.

use std::sync::Mutex;

use crate::gateway::{EngineGateway, RawHandle};
use transcriber_types::{ModelArch, Transcript, TranscriberOption};

/// Records every gateway call and serves canned stream snapshots in FIFO
/// order. When the snapshot queue is empty, `transcribe_stream` returns an
/// empty transcript so lifecycle tests don't have to script every call.
#[derive(Default)]
pub(crate) struct FakeGateway {
    pub calls: Mutex<Vec<String>>,
    pub snapshots: Mutex<Vec<Option<Transcript>>>,
    pub batch_result: Mutex<Option<Transcript>>,
    pub fail_add_audio: Mutex<Option<i32>>,
    pub load_result: Mutex<Option<RawHandle>>,
}

impl FakeGateway {
    pub fn push_snapshot(&self, transcript: Option<Transcript>) {
        self.snapshots.lock().unwrap().push(transcript);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count_calls(&self, name: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == name).count()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl EngineGateway for FakeGateway {
    fn load_from_files(&self, _: &str, _: ModelArch, _: &[TranscriberOption]) -> RawHandle {
        self.record("load_from_files");
        self.load_result.lock().unwrap().unwrap_or(1)
    }

    fn load_from_memory(
        &self,
        _: &[u8],
        _: &[u8],
        _: &[u8],
        _: ModelArch,
        _: &[TranscriberOption],
    ) -> RawHandle {
        self.record("load_from_memory");
        self.load_result.lock().unwrap().unwrap_or(1)
    }

    fn free_transcriber(&self, _: RawHandle) {
        self.record("free_transcriber");
    }

    fn transcribe_without_streaming(
        &self,
        _: RawHandle,
        _: &[f32],
        _: u32,
        _: u32,
    ) -> Option<Transcript> {
        self.record("transcribe_without_streaming");
        self.batch_result.lock().unwrap().clone()
    }

    fn create_stream(&self, _: RawHandle, _: u32) -> RawHandle {
        self.record("create_stream");
        5
    }

    fn free_stream(&self, _: RawHandle, _: RawHandle) -> i32 {
        self.record("free_stream");
        0
    }

    fn start_stream(&self, _: RawHandle, _: RawHandle) -> i32 {
        self.record("start_stream");
        0
    }

    fn stop_stream(&self, _: RawHandle, _: RawHandle) -> i32 {
        self.record("stop_stream");
        0
    }

    fn add_audio(&self, _: RawHandle, _: RawHandle, _: &[f32], _: u32) -> i32 {
        self.record("add_audio");
        self.fail_add_audio.lock().unwrap().take().unwrap_or(0)
    }

    fn transcribe_stream(&self, _: RawHandle, _: RawHandle, flags: u32) -> Option<Transcript> {
        self.record(format!("transcribe_stream({flags})"));
        let mut snapshots = self.snapshots.lock().unwrap();
        if snapshots.is_empty() {
            Some(Transcript::default())
        } else {
            snapshots.remove(0)
        }
    }
}
