//! Producer/consumer staging buffer between the capture source and the
//! processing loop.
//!
//! The capture thread only calls `push`; the processing loop only calls
//! `drain_all`. One mutex covers both, and neither side blocks on size.

use std::sync::Mutex;

/// Thread-safe staging area for captured audio chunks.
///
/// Chunks are kept in arrival order and concatenated on drain. Push is safe
/// to call concurrently with a drain from another thread; a single consumer
/// is assumed.
#[derive(Default)]
pub struct CaptureBuffer {
    chunks: Mutex<Vec<Vec<f32>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of samples. Never blocks on buffer size.
    pub fn push(&self, chunk: Vec<f32>) {
        if chunk.is_empty() {
            return;
        }
        let mut chunks = self.chunks.lock().unwrap_or_else(|e| e.into_inner());
        chunks.push(chunk);
    }

    /// Atomically take everything accumulated since the last drain,
    /// concatenated in arrival order. Empty buffer yields an empty vec.
    pub fn drain_all(&self) -> Vec<f32> {
        let taken = {
            let mut chunks = self.chunks.lock().unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *chunks)
        };
        let total: usize = taken.iter().map(Vec::len).sum();
        let mut audio = Vec::with_capacity(total);
        for chunk in taken {
            audio.extend_from_slice(&chunk);
        }
        audio
    }

    /// Number of samples currently staged. Diagnostic only; racy by nature.
    pub fn len(&self) -> usize {
        let chunks = self.chunks.lock().unwrap_or_else(|e| e.into_inner());
        chunks.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Convert a raw little-endian 16-bit PCM byte buffer to normalized f32
/// samples.
///
/// Returns `None` for odd-length buffers (a torn read from the capture
/// device); callers drop the chunk and keep capturing, since microphone
/// I/O glitches are transient.
pub fn pcm16le_to_f32(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let samples = bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect();
    Some(samples)
}
