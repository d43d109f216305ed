//! Line-lifecycle events and the listener registry that fans them out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::TranscribeError;
use crate::gateway::RawHandle;
use transcriber_types::TranscriptLine;

/// A line-lifecycle event derived from successive transcript snapshots, or
/// an engine failure delivered in-band so listeners observing the stream
/// are not starved by an error path.
///
/// Per line and snapshot, events always arrive in this order: started,
/// updated, text-changed, completed.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEvent {
    LineStarted {
        line: TranscriptLine,
        stream: RawHandle,
    },
    LineUpdated {
        line: TranscriptLine,
        stream: RawHandle,
    },
    LineTextChanged {
        line: TranscriptLine,
        stream: RawHandle,
    },
    LineCompleted {
        line: TranscriptLine,
        stream: RawHandle,
    },
    Error {
        error: TranscribeError,
        stream: RawHandle,
    },
}

impl TranscriptEvent {
    /// The line the event refers to, if any.
    pub fn line(&self) -> Option<&TranscriptLine> {
        match self {
            Self::LineStarted { line, .. }
            | Self::LineUpdated { line, .. }
            | Self::LineTextChanged { line, .. }
            | Self::LineCompleted { line, .. } => Some(line),
            Self::Error { .. } => None,
        }
    }

    /// The stream handle the event originated from.
    pub fn stream(&self) -> RawHandle {
        match self {
            Self::LineStarted { stream, .. }
            | Self::LineUpdated { stream, .. }
            | Self::LineTextChanged { stream, .. }
            | Self::LineCompleted { stream, .. }
            | Self::Error { stream, .. } => *stream,
        }
    }
}

/// Listener callback invoked synchronously for every emitted event.
pub type Listener = dyn Fn(&TranscriptEvent) + Send + Sync;

/// Identifier returned by `add_listener`, used to remove that listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener registry with synchronous fan-out in registration order.
///
/// Emission iterates a snapshot of the registry taken under the lock, so a
/// callback may add or remove listeners (itself included) during dispatch;
/// the change takes effect from the next emit.
#[derive(Default)]
pub struct EventBus {
    listeners: Mutex<Vec<(ListenerId, Arc<Listener>)>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&TranscriptEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener by id. Unknown ids are ignored.
    pub fn remove_listener(&self, id: ListenerId) {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.retain(|(lid, _)| *lid != id);
    }

    pub fn clear(&self) {
        let mut listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        let listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
        listeners.len()
    }

    /// Deliver an event to all currently registered listeners, in
    /// registration order, on the calling thread.
    pub fn emit(&self, event: &TranscriptEvent) {
        let snapshot: Vec<Arc<Listener>> = {
            let listeners = self.listeners.lock().unwrap_or_else(|e| e.into_inner());
            listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        if snapshot.is_empty() {
            debug!("emitting {:?} with no listeners registered", event);
        }
        for listener in snapshot {
            listener(event);
        }
    }
}
