//! Session orchestration: the public transcriber facade.

use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use crate::bus::{EventBus, ListenerId, TranscriptEvent};
use crate::error::{Result, TranscribeError};
use crate::gateway::{EngineGateway, RawHandle};
use crate::stream::{Stream, StreamState};
use transcriber_types::{ErrorCode, ModelArch, Transcript, TranscriberOption};

struct Inner {
    default_stream: Option<Stream>,
    closed: bool,
}

/// A loaded transcription session.
///
/// Owns the engine load handle, the option set, a lazily-created default
/// stream, and the listener registry. All engine calls for one session go
/// through the inner mutex, so the gateway never sees two concurrent calls
/// on the same handle no matter how many threads call `add_audio`.
///
/// Engine-side failures from streaming operations are delivered twice on
/// purpose: returned to the synchronous caller and emitted to listeners as
/// `TranscriptEvent::Error`, so observers of the live output are never
/// starved by an error on somebody else's call path.
pub struct Transcriber {
    gateway: Arc<dyn EngineGateway>,
    handle: RawHandle,
    options: Vec<TranscriberOption>,
    bus: EventBus,
    inner: Mutex<Inner>,
}

impl Transcriber {
    /// Load the engine from model files rooted at `path`.
    ///
    /// A negative handle from the engine is fatal: the session is never
    /// constructed and there is no retry.
    pub fn load_from_files(
        gateway: Arc<dyn EngineGateway>,
        path: &str,
        arch: ModelArch,
        options: Vec<TranscriberOption>,
    ) -> Result<Self> {
        let handle = gateway.load_from_files(path, arch, &options);
        if handle < 0 {
            return Err(TranscribeError::LoadFailure(ErrorCode::from_raw(handle)));
        }
        info!("loaded transcriber from '{path}' ({arch}), handle {handle}");
        Ok(Self::from_handle(gateway, handle, options))
    }

    /// Load the engine from in-memory model data. Platform asset loading
    /// resolves to this entry point.
    pub fn load_from_memory(
        gateway: Arc<dyn EngineGateway>,
        encoder_model: &[u8],
        decoder_model: &[u8],
        tokenizer: &[u8],
        arch: ModelArch,
        options: Vec<TranscriberOption>,
    ) -> Result<Self> {
        let handle =
            gateway.load_from_memory(encoder_model, decoder_model, tokenizer, arch, &options);
        if handle < 0 {
            return Err(TranscribeError::LoadFailure(ErrorCode::from_raw(handle)));
        }
        info!("loaded transcriber from memory ({arch}), handle {handle}");
        Ok(Self::from_handle(gateway, handle, options))
    }

    fn from_handle(
        gateway: Arc<dyn EngineGateway>,
        handle: RawHandle,
        options: Vec<TranscriberOption>,
    ) -> Self {
        Self {
            gateway,
            handle,
            options,
            bus: EventBus::new(),
            inner: Mutex::new(Inner {
                default_stream: None,
                closed: false,
            }),
        }
    }

    pub fn handle(&self) -> RawHandle {
        self.handle
    }

    pub fn options(&self) -> &[TranscriberOption] {
        &self.options
    }

    /// Start (or resume) the default stream, creating it on first use.
    pub fn start(&self) -> Result<()> {
        let mut inner = self.lock_open("start")?;
        let stream = Self::default_stream(&mut inner, &self.gateway, self.handle)?;
        let handle = stream.handle();
        let result = stream.start();
        drop(inner);
        result.map_err(|e| self.report(e, handle))
    }

    /// Stop the default stream, flushing buffered audio. The forced final
    /// snapshot is diffed and its events emitted before this returns.
    pub fn stop(&self) -> Result<()> {
        let mut inner = self.lock_open("stop")?;
        let stream = Self::default_stream(&mut inner, &self.gateway, self.handle)?;
        let handle = stream.handle();
        let result = stream.stop();
        drop(inner);
        // Listeners run without the session lock so they may call back in.
        let events = result.map_err(|e| self.report(e, handle))?;
        self.emit_all(&events);
        Ok(())
    }

    /// Feed audio to the default stream and emit the lifecycle events its
    /// snapshot produces. Audio is mono PCM f32 in [-1.0, 1.0].
    pub fn add_audio(&self, audio: &[f32], sample_rate: u32) -> Result<()> {
        let mut inner = self.lock_open("add_audio")?;
        let stream = Self::default_stream(&mut inner, &self.gateway, self.handle)?;
        let handle = stream.handle();
        let result = stream.feed(audio, sample_rate);
        drop(inner);
        let events = result.map_err(|e| self.report(e, handle))?;
        self.emit_all(&events);
        Ok(())
    }

    /// One-shot batch transcription, bypassing all stream state. Every line
    /// of the result is final: the engine marks them new, updated,
    /// text-changed, and complete in one go.
    pub fn transcribe_without_streaming(
        &self,
        audio: &[f32],
        sample_rate: u32,
    ) -> Result<Transcript> {
        // Holding the lock keeps the one-call-in-flight promise even though
        // no stream is involved.
        let _inner = self.lock_open("transcribe_without_streaming")?;
        self.gateway
            .transcribe_without_streaming(self.handle, audio, sample_rate, 0)
            .ok_or(TranscribeError::MissingTranscript {
                op: "transcribe_without_streaming",
            })
    }

    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&TranscriptEvent) + Send + Sync + 'static,
    {
        self.bus.add_listener(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) {
        self.bus.remove_listener(id);
    }

    pub fn remove_all_listeners(&self) {
        self.bus.clear();
    }

    /// Tear down the session: shut down the default stream and free the
    /// engine handle. Idempotent; also invoked on drop.
    pub fn close(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.closed {
            return;
        }
        inner.closed = true;
        if let Some(mut stream) = inner.default_stream.take() {
            stream.shutdown();
        }
        self.gateway.free_transcriber(self.handle);
        debug!("transcriber {} closed", self.handle);
    }

    fn lock_open(&self, op: &'static str) -> Result<std::sync::MutexGuard<'_, Inner>> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if inner.closed {
            return Err(TranscribeError::InvalidState {
                op,
                state: StreamState::Freed,
            });
        }
        Ok(inner)
    }

    fn default_stream<'a>(
        inner: &'a mut Inner,
        gateway: &Arc<dyn EngineGateway>,
        handle: RawHandle,
    ) -> Result<&'a mut Stream> {
        if inner.default_stream.is_none() {
            let stream = Stream::create(Arc::clone(gateway), handle, 0)?;
            debug!("created default stream {} for transcriber {handle}", stream.handle());
            inner.default_stream = Some(stream);
        }
        Ok(inner.default_stream.as_mut().expect("just populated"))
    }

    fn emit_all(&self, events: &[TranscriptEvent]) {
        for event in events {
            self.bus.emit(event);
        }
    }

    /// Route an engine-side failure to listeners before handing it back to
    /// the caller. Lifecycle misuse stays a plain return value: it is a
    /// caller bug, not something the stream's observers should see.
    fn report(&self, error: TranscribeError, stream: RawHandle) -> TranscribeError {
        match &error {
            TranscribeError::InvalidState { .. } | TranscribeError::LoadFailure(_) => {}
            _ => {
                self.bus.emit(&TranscriptEvent::Error {
                    error: error.clone(),
                    stream,
                });
            }
        }
        error
    }
}

impl Drop for Transcriber {
    fn drop(&mut self) {
        self.close();
    }
}
