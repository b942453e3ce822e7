//! Input session layer between key events and a phonetic composition engine.
//!
//! `InputSession` owns the composition state and the candidate menu, drives an
//! [`InputEngine`] one call per event, and returns a [`KeyResponse`] telling
//! the host what to insert and what to show. Hosts that receive events from
//! several threads wrap the session in a mutex; the session itself is never
//! shared.

pub(crate) mod types;

mod candidate_access;
mod commit;
mod controller;
mod key_handlers;
mod observer;
mod response;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use hamster_core::{InputEngine, SchemaDescriptor, SessionConfig};

pub use observer::{ObserverId, SessionEvent, SessionObserver};
pub use types::{
    CandidateAction, CandidateMenu, KeyResponse, Outcome, PageDirection, SessionError,
    SessionState,
};

use observer::Observers;

/// Stateful input session driving one engine.
pub struct InputSession<E> {
    engine: E,
    config: SessionConfig,
    state: SessionState,
    menu: CandidateMenu,
    /// Schemas reported by the engine at the last deploy.
    schemas: Vec<SchemaDescriptor>,
    observers: Observers,
}

impl<E: InputEngine> InputSession<E> {
    /// Create a session. Mode flags come from `config`; the configured
    /// schema is applied by [`InputSession::start`].
    pub fn new(engine: E, config: SessionConfig) -> Self {
        let state = SessionState {
            ascii_mode: config.input.ascii_mode,
            simplified_mode: config.input.simplified,
            ..SessionState::default()
        };
        Self {
            engine,
            config,
            state,
            menu: CandidateMenu::default(),
            schemas: Vec::new(),
            observers: Observers::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn candidates(&self) -> &CandidateMenu {
        &self.menu
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn schemas(&self) -> &[SchemaDescriptor] {
        &self.schemas
    }

    pub fn current_schema(&self) -> Option<&SchemaDescriptor> {
        self.schemas
            .iter()
            .find(|s| s.id == self.state.current_schema_id)
    }

    pub fn is_composing(&self) -> bool {
        self.state.composing
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn subscribe(&mut self, observer: Arc<dyn SessionObserver>) -> ObserverId {
        self.observers.add(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    pub(crate) fn notify(&self, event: SessionEvent) {
        self.observers.notify(event);
    }

    /// Publish the state and menu snapshots.
    pub(crate) fn notify_state(&self) {
        if self.observers.is_empty() {
            return;
        }
        self.notify(SessionEvent::StateChanged(self.state.clone()));
        self.notify(SessionEvent::MenuChanged(self.menu.clone()));
    }
}
