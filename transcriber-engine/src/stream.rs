//! Stream lifecycle: the per-session state machine around one engine
//! stream handle.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::bus::TranscriptEvent;
use crate::diff::LineTracker;
use crate::error::{Result, TranscribeError};
use crate::gateway::{EngineGateway, RawHandle};
use transcriber_types::FLAG_FORCE_UPDATE;

/// Lifecycle states of a stream. `Freed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Created,
    Running,
    Stopped,
    Freed,
}

/// One live transcription session bound to a loaded engine instance.
///
/// Owned exclusively by the session that created it. The engine allows only
/// one call in flight per handle; a `Stream` used outside a session must be
/// serialized by its caller.
pub struct Stream {
    gateway: Arc<dyn EngineGateway>,
    transcriber: RawHandle,
    handle: RawHandle,
    state: StreamState,
    tracker: LineTracker,
}

impl Stream {
    /// Allocate an engine-side stream bound to `transcriber`.
    pub fn create(
        gateway: Arc<dyn EngineGateway>,
        transcriber: RawHandle,
        flags: u32,
    ) -> Result<Self> {
        let handle = gateway.create_stream(transcriber, flags);
        if handle < 0 {
            return Err(TranscribeError::engine("create_stream", handle));
        }
        debug!("created stream {handle}");
        Ok(Self {
            gateway,
            transcriber,
            handle,
            state: StreamState::Created,
            tracker: LineTracker::new(),
        })
    }

    pub fn handle(&self) -> RawHandle {
        self.handle
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Begin (or resume) accepting audio. A no-op when already running;
    /// anything on a freed stream is a programming error.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            StreamState::Running => Ok(()),
            StreamState::Created | StreamState::Stopped => {
                let code = self.gateway.start_stream(self.transcriber, self.handle);
                if code != 0 {
                    return Err(TranscribeError::engine("start_stream", code));
                }
                self.state = StreamState::Running;
                debug!("stream {} running", self.handle);
                Ok(())
            }
            StreamState::Freed => Err(TranscribeError::InvalidState {
                op: "start",
                state: self.state,
            }),
        }
    }

    /// Forward audio to the engine, request a snapshot, and diff it into
    /// lifecycle events. Valid only while running.
    pub fn feed(&mut self, audio: &[f32], sample_rate: u32) -> Result<Vec<TranscriptEvent>> {
        if self.state != StreamState::Running {
            return Err(TranscribeError::InvalidState {
                op: "feed",
                state: self.state,
            });
        }

        let code = self
            .gateway
            .add_audio(self.transcriber, self.handle, audio, sample_rate);
        if code != 0 {
            return Err(TranscribeError::engine("add_audio", code));
        }

        let transcript = self
            .gateway
            .transcribe_stream(self.transcriber, self.handle, 0)
            .ok_or(TranscribeError::MissingTranscript { op: "add_audio" })?;

        self.tracker.diff(&transcript, self.handle)
    }

    /// Stop the stream and force one final snapshot so buffered audio is
    /// flushed. The forced snapshot is diffed like any other: stopping
    /// produces events.
    pub fn stop(&mut self) -> Result<Vec<TranscriptEvent>> {
        if self.state != StreamState::Running {
            return Err(TranscribeError::InvalidState {
                op: "stop",
                state: self.state,
            });
        }

        let code = self.gateway.stop_stream(self.transcriber, self.handle);
        if code != 0 {
            return Err(TranscribeError::engine("stop_stream", code));
        }
        self.state = StreamState::Stopped;
        debug!("stream {} stopped, flushing", self.handle);

        // The engine may hold audio it has not yet reflected in a snapshot.
        let transcript = self
            .gateway
            .transcribe_stream(self.transcriber, self.handle, FLAG_FORCE_UPDATE)
            .ok_or(TranscribeError::MissingTranscript { op: "stop" })?;

        self.tracker.diff(&transcript, self.handle)
    }

    /// Release the engine-side handle. Terminal.
    pub fn free(&mut self) -> Result<()> {
        match self.state {
            StreamState::Created | StreamState::Stopped => {
                let code = self.gateway.free_stream(self.transcriber, self.handle);
                self.state = StreamState::Freed;
                if code != 0 {
                    return Err(TranscribeError::engine("free_stream", code));
                }
                Ok(())
            }
            StreamState::Running | StreamState::Freed => Err(TranscribeError::InvalidState {
                op: "free",
                state: self.state,
            }),
        }
    }

    /// Best-effort teardown for session close: stop if running (no flush
    /// diff), then free. Never errors; failures are logged.
    pub(crate) fn shutdown(&mut self) {
        if self.state == StreamState::Running {
            let code = self.gateway.stop_stream(self.transcriber, self.handle);
            if code != 0 {
                warn!("stop_stream failed during shutdown of stream {}: code {code}", self.handle);
            }
            self.state = StreamState::Stopped;
        }
        if matches!(self.state, StreamState::Created | StreamState::Stopped) {
            let code = self.gateway.free_stream(self.transcriber, self.handle);
            if code != 0 {
                warn!("free_stream failed during shutdown of stream {}: code {code}", self.handle);
            }
            self.state = StreamState::Freed;
        }
    }
}
