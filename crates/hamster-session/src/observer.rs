//! Change notifications for hosts (candidate bar, toolbar label, space key).

use std::sync::mpsc;
use std::sync::Arc;

use hamster_core::SchemaDescriptor;

use super::types::{CandidateMenu, SessionState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    StateChanged(SessionState),
    MenuChanged(CandidateMenu),
    SchemaChanged {
        schema_id: String,
        schema: Option<SchemaDescriptor>,
    },
    AsciiModeChanged(bool),
    SimplifiedModeChanged(bool),
    ColorSchemeChanged(Option<String>),
    Deployed(Vec<SchemaDescriptor>),
}

/// Receives every `SessionEvent`, synchronously, on the thread that drives
/// the session. Implementations must not call back into the session.
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

/// A channel sender is an observer; the receiving side gets owned events.
impl SessionObserver for mpsc::Sender<SessionEvent> {
    fn on_event(&self, event: &SessionEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = self.send(event.clone());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Numeric handle for hosts that cannot hold Rust values.
    pub fn as_raw(self) -> u64 {
        self.0
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<(ObserverId, Arc<dyn SessionObserver>)>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn SessionObserver>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&self, event: SessionEvent) {
        for (_, observer) in &self.entries {
            observer.on_event(&event);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
