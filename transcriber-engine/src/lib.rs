//! Session layer in front of a streaming speech-transcription engine.
//!
//! The engine itself is opaque: it is reached through [`gateway::EngineGateway`]
//! as raw integer handles and status codes, and it reports transcripts as full
//! snapshots rather than deltas. This crate supplies everything a caller needs
//! on top of that boundary:
//!
//! - [`session::Transcriber`] owns an engine handle and a lazily created
//!   default stream, serializing engine calls behind one lock;
//! - [`diff::LineTracker`] turns consecutive snapshots into per-line lifecycle
//!   events (started, updated, text changed, completed);
//! - [`bus::EventBus`] fans those events out to registered listeners;
//! - [`mic::MicTranscriber`] composes a session with a capture source and a
//!   [`capture::CaptureBuffer`] into a live microphone pipeline.

pub mod bus;
pub mod capture;
pub mod config;
pub mod debug_audio;
pub mod diff;
pub mod error;
pub mod gateway;
pub mod mic;
pub mod session;
pub mod source;
pub mod stream;

#[cfg(test)]
mod testutil;

pub use bus::{EventBus, Listener, ListenerId, TranscriptEvent};
pub use capture::CaptureBuffer;
pub use config::TranscriberConfig;
pub use error::{Result, TranscribeError};
pub use gateway::{EngineGateway, RawHandle};
pub use mic::MicTranscriber;
pub use session::Transcriber;
pub use source::{AudioSource, CpalSource, DeviceInfo};
pub use stream::{Stream, StreamState};
