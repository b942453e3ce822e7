use hamster_core::InputEngine;
use tracing::debug;

use super::types::{CandidateMenu, KeyResponse};
use super::InputSession;

impl<E: InputEngine> InputSession<E> {
    /// Drop the composition: engine, buffer and menu together.
    pub(crate) fn reset_state(&mut self) {
        self.engine.clear_composition();
        let changed = self.state.composing
            || !self.state.input_buffer.is_empty()
            || !self.menu.is_empty();
        self.state.composing = false;
        self.state.input_buffer.clear();
        self.menu = CandidateMenu::default();
        if changed {
            self.notify_state();
        }
    }

    /// Re-read composing status, raw input and the menu page from the engine.
    pub(crate) fn refresh_from_engine(&mut self) {
        self.state.composing = self.engine.is_composing();
        self.state.input_buffer = self.engine.raw_input();
        self.menu = if self.state.composing {
            CandidateMenu::from(self.engine.candidate_menu())
        } else {
            CandidateMenu::default()
        };
        self.notify_state();
    }

    /// Classify the engine's state after it accepted an input.
    pub(crate) fn after_engine_input(&mut self) -> KeyResponse {
        let commit = self.engine.commit_text();
        if !commit.is_empty() {
            debug!(text = %commit, "engine committed");
            self.reset_state();
            return KeyResponse::committed(commit);
        }
        if !self.engine.is_composing() {
            self.reset_state();
            return KeyResponse::idle();
        }
        self.refresh_from_engine();
        KeyResponse::composing(&self.menu)
    }
}
