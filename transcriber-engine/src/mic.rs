//! Microphone transcription: a plain session composed with an audio source.
//!
//! Threading contract (one role per thread):
//! - the capture source only pushes into the shared `CaptureBuffer`;
//! - one processing-loop thread drains the buffer and drives the session's
//!   default stream, sampling the run flag once per iteration;
//! - `start`/`stop` flip the run flag from any thread. A stop takes effect
//!   before the next iteration and forces one final flush, whose events are
//!   emitted like any other.

use anyhow::{Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::capture::CaptureBuffer;
use crate::debug_audio::DebugRecorder;
use crate::session::Transcriber;
use crate::source::AudioSource;

/// Idle wait when nothing was captured and the stream is paused.
const IDLE_POLL: Duration = Duration::from_millis(10);

/// Drives a `Transcriber` from a capture source.
///
/// The session must already be loaded when this is constructed, and `run`
/// starts the source before spawning the loop, so by the time audio can
/// arrive both prerequisites are in place.
pub struct MicTranscriber {
    session: Arc<Transcriber>,
    buffer: Arc<CaptureBuffer>,
    source: Box<dyn AudioSource>,
    running: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    sample_rate: u32,
    worker: Option<JoinHandle<()>>,
    debug_audio: bool,
}

impl MicTranscriber {
    pub fn new(
        session: Arc<Transcriber>,
        source: Box<dyn AudioSource>,
        buffer: Arc<CaptureBuffer>,
        sample_rate: u32,
    ) -> Self {
        Self {
            session,
            buffer,
            source,
            running: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(AtomicBool::new(false)),
            sample_rate,
            worker: None,
            debug_audio: false,
        }
    }

    /// Record everything fed to the engine to a debug WAV. Takes effect at
    /// the next `run`.
    pub fn with_debug_audio(mut self, enabled: bool) -> Self {
        self.debug_audio = enabled;
        self
    }

    /// Start the capture source and spawn the processing loop. The loop
    /// idles until `start` flips the run flag.
    pub fn run(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }
        self.source.start().context("failed to start audio source")?;

        let recorder = if self.debug_audio {
            match DebugRecorder::new(self.sample_rate) {
                Ok(recorder) => Some(recorder),
                Err(e) => {
                    warn!("debug recording disabled: {e}");
                    None
                }
            }
        } else {
            None
        };

        let session = Arc::clone(&self.session);
        let buffer = Arc::clone(&self.buffer);
        let running = Arc::clone(&self.running);
        let shutdown = Arc::clone(&self.shutdown);
        let sample_rate = self.sample_rate;

        self.worker = Some(std::thread::spawn(move || {
            processing_loop(&session, &buffer, &running, &shutdown, sample_rate, recorder);
        }));
        info!("processing loop started");
        Ok(())
    }

    /// Begin transcribing captured audio. Safe from any thread.
    pub fn start(&self) {
        self.running.store(true, Ordering::Release);
    }

    /// Pause transcription. The loop stops the stream before its next feed,
    /// flushing buffered audio and emitting the final events.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn session(&self) -> &Arc<Transcriber> {
        &self.session
    }

    /// Stop the source and join the processing loop. Idempotent.
    pub fn close(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("processing loop panicked");
            }
        }
        if let Err(e) = self.source.stop() {
            warn!("failed to stop audio source: {e}");
        }
    }
}

impl Drop for MicTranscriber {
    fn drop(&mut self) {
        self.close();
    }
}

fn processing_loop(
    session: &Transcriber,
    buffer: &CaptureBuffer,
    running: &AtomicBool,
    shutdown: &AtomicBool,
    sample_rate: u32,
    mut recorder: Option<DebugRecorder>,
) {
    let mut was_running = false;

    while !shutdown.load(Ordering::Acquire) {
        // Sampled once per iteration; a flip mid-iteration waits for the next.
        let now_running = running.load(Ordering::Acquire);
        let audio = buffer.drain_all();

        if now_running && !audio.is_empty() {
            if let Some(rec) = recorder.as_mut() {
                if let Err(e) = rec.record(&audio) {
                    warn!("debug recording failed, disabling: {e}");
                    recorder = None;
                }
            }
        }

        if let Err(e) = pump(session, &audio, was_running, now_running, sample_rate) {
            // Already delivered to listeners as an Error event by the
            // session; the loop itself keeps consuming capture data.
            error!("processing loop: {e}");
        }
        was_running = now_running;

        if audio.is_empty() {
            std::thread::sleep(IDLE_POLL);
        }
    }

    if was_running {
        if let Err(e) = session.stop() {
            error!("final stop failed: {e}");
        }
    }
    if let Some(recorder) = recorder {
        if let Err(e) = recorder.finalize() {
            warn!("failed to finalize debug recording: {e}");
        }
    }
}

/// One iteration of the processing loop, split out so the run/pause edge
/// transitions can be driven deterministically in tests.
fn pump(
    session: &Transcriber,
    audio: &[f32],
    was_running: bool,
    now_running: bool,
    sample_rate: u32,
) -> crate::error::Result<()> {
    match (was_running, now_running) {
        // Idle: discard drained audio captured while paused.
        (false, false) => Ok(()),
        // Pause -> run edge: start the stream, then feed this iteration's audio.
        (false, true) => {
            session.start()?;
            session.add_audio(audio, sample_rate)
        }
        (true, true) => session.add_audio(audio, sample_rate),
        // Run -> pause edge: feed the tail drained this iteration before
        // stopping, so the forced flush covers it. Stop even if the feed
        // failed; the stream must not be left running.
        (true, false) => {
            let fed = session.add_audio(audio, sample_rate);
            let stopped = session.stop();
            fed.and(stopped)
        }
    }
}
