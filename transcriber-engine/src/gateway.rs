//! The engine boundary: a handle-based interface to the opaque native
//! transcription engine.
//!
//! The session layer consumes this trait; it never implements the engine
//! itself. Returns stay raw at this boundary (negative handles, integer
//! error codes, nullable transcripts) and are converted into typed errors
//! one layer up.

use transcriber_types::{ModelArch, Transcript, TranscriberOption};

/// Raw handle to a loaded transcriber or an open stream. Negative values
/// are error codes from the create/load call that produced the handle.
pub type RawHandle = i32;

/// Interface to the native transcription engine.
///
/// Implementations must be thread-safe (Send + Sync) because the handle is
/// shared across the session's caller threads, but the engine only supports
/// one call in flight per handle: the session serializes calls and the
/// trait makes no attempt to.
pub trait EngineGateway: Send + Sync {
    /// Load a transcriber from model files rooted at `path`.
    /// Returns a non-negative handle, or a negative error code.
    fn load_from_files(
        &self,
        path: &str,
        arch: ModelArch,
        options: &[TranscriberOption],
    ) -> RawHandle;

    /// Load a transcriber from in-memory model data.
    /// Returns a non-negative handle, or a negative error code.
    fn load_from_memory(
        &self,
        encoder_model: &[u8],
        decoder_model: &[u8],
        tokenizer: &[u8],
        arch: ModelArch,
        options: &[TranscriberOption],
    ) -> RawHandle;

    /// Release a transcriber and everything it owns.
    fn free_transcriber(&self, handle: RawHandle);

    /// One-shot batch transcription, no stream state involved.
    /// `None` models the engine's null transcript pointer.
    fn transcribe_without_streaming(
        &self,
        handle: RawHandle,
        audio: &[f32],
        sample_rate: u32,
        flags: u32,
    ) -> Option<Transcript>;

    /// Open a stream session bound to a loaded transcriber.
    /// Returns a non-negative stream handle, or a negative error code.
    fn create_stream(&self, handle: RawHandle, flags: u32) -> RawHandle;

    /// Release a stream. Returns an error code (0 = ok).
    fn free_stream(&self, handle: RawHandle, stream: RawHandle) -> i32;

    /// Begin accepting audio on a stream. Returns an error code.
    fn start_stream(&self, handle: RawHandle, stream: RawHandle) -> i32;

    /// Stop accepting audio on a stream. Returns an error code.
    fn stop_stream(&self, handle: RawHandle, stream: RawHandle) -> i32;

    /// Feed audio samples (mono PCM f32, -1.0 to 1.0) to a stream.
    /// Returns an error code.
    fn add_audio(
        &self,
        handle: RawHandle,
        stream: RawHandle,
        audio: &[f32],
        sample_rate: u32,
    ) -> i32;

    /// Request the current transcript snapshot for a stream. Pass
    /// `FLAG_FORCE_UPDATE` to re-emit even without new audio.
    fn transcribe_stream(&self, handle: RawHandle, stream: RawHandle, flags: u32)
        -> Option<Transcript>;
}
