//! Transcript diffing: turning repeatedly re-emitted full snapshots into a
//! minimal, well-ordered sequence of line-lifecycle events.

use std::collections::{HashMap, HashSet};
use tracing::warn;

use crate::bus::TranscriptEvent;
use crate::error::{Result, TranscribeError};
use crate::gateway::RawHandle;
use transcriber_types::Transcript;

/// Per-stream diff memory.
///
/// `prev` is replaced wholesale after each clean diff; ids that disappear
/// from a snapshot are dropped without any closing event. `started` and
/// `completed` persist for the stream's lifetime so the at-most-once
/// invariants can be policed: a retired id reappearing, or a completed line
/// changing again, is an engine contract breach, never silently fixed up.
#[derive(Default)]
pub struct LineTracker {
    prev: HashMap<u64, transcriber_types::TranscriptLine>,
    started: HashSet<u64>,
    completed: HashSet<u64>,
}

impl LineTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a snapshot to its lifecycle events, in snapshot order, with the
    /// fixed per-line order started, updated, text-changed, completed.
    ///
    /// On a contract violation the memory is left uncommitted and the error
    /// is returned for the session to surface as an `Error` event.
    pub fn diff(&mut self, transcript: &Transcript, stream: RawHandle) -> Result<Vec<TranscriptEvent>> {
        let mut events = Vec::new();

        for line in &transcript.lines {
            let id = line.id;

            if self.completed.contains(&id) {
                if !line.is_complete {
                    warn!("line {id} reappeared incomplete after completion");
                    return Err(TranscribeError::ContractViolation {
                        id,
                        detail: "completed line reported incomplete",
                    });
                }
                if line.is_updated || line.has_text_changed {
                    warn!("line {id} reported changed after completion");
                    return Err(TranscribeError::ContractViolation {
                        id,
                        detail: "completed line reported updated again",
                    });
                }
                // Benign re-emission of a finished line: no events.
                continue;
            }

            let is_new = !self.prev.contains_key(&id);
            if is_new && self.started.contains(&id) {
                warn!("line {id} restarted after dropping out of the snapshot");
                return Err(TranscribeError::ContractViolation {
                    id,
                    detail: "retired line id restarted",
                });
            }

            if is_new {
                events.push(TranscriptEvent::LineStarted {
                    line: line.clone(),
                    stream,
                });
            }
            if line.is_updated && !is_new && !line.is_complete {
                events.push(TranscriptEvent::LineUpdated {
                    line: line.clone(),
                    stream,
                });
            }
            if line.has_text_changed {
                events.push(TranscriptEvent::LineTextChanged {
                    line: line.clone(),
                    stream,
                });
            }
            if line.is_complete && line.is_updated {
                events.push(TranscriptEvent::LineCompleted {
                    line: line.clone(),
                    stream,
                });
            }
        }

        // Clean pass: commit the new snapshot as the previous mapping.
        self.prev = transcript
            .lines
            .iter()
            .map(|line| (line.id, line.clone()))
            .collect();
        for line in &transcript.lines {
            self.started.insert(line.id);
            if line.is_complete {
                self.completed.insert(line.id);
            }
        }

        Ok(events)
    }

    /// Number of line ids observed so far, including completed ones.
    pub fn lines_seen(&self) -> usize {
        self.started.len()
    }
}
