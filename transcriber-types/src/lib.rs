//! Shared data model for the voice transcriber session layer.
//!
//! Pure data: transcript snapshots, engine option pairs, and the closed
//! enums mirroring the engine's wire constants. No engine or session logic
//! lives here so UI and logging consumers can depend on this crate alone.

mod arch;
mod option;
mod transcript;

pub use arch::{ErrorCode, ModelArch, FLAG_FORCE_UPDATE};
pub use option::TranscriberOption;
pub use transcript::{Transcript, TranscriptLine};
