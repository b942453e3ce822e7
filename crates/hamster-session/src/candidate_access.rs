use hamster_core::keysym;
use hamster_core::InputEngine;
use tracing::{debug, error, warn};

use super::types::{CandidateAction, KeyResponse, PageDirection, SessionError};
use super::InputSession;

impl<E: InputEngine> InputSession<E> {
    /// Commit the top candidate. `None` when there is nothing to commit.
    pub fn first_candidate_commit(&mut self) -> Option<String> {
        self.commit_candidate_at(0)
    }

    /// Quick second choice.
    pub fn second_candidate_commit(&mut self) -> Option<String> {
        self.commit_candidate_at(1)
    }

    fn commit_candidate_at(&mut self, index: usize) -> Option<String> {
        if !self.state.composing {
            return None;
        }
        let text = self.menu.candidates.get(index)?.text.clone();
        debug!(index, %text, "candidate committed");
        self.reset_state();
        Some(text)
    }

    /// Select a candidate on the current page through the engine. The engine
    /// may commit it or keep composing the rest of the input.
    pub fn select_candidate(&mut self, index: usize) -> KeyResponse {
        if !self.state.composing {
            return KeyResponse::not_consumed();
        }
        if index >= self.menu.len() {
            return KeyResponse::composing(&self.menu);
        }
        if self.engine.select_candidate(index) {
            self.after_engine_input()
        } else {
            error!(index, "engine rejected candidate selection");
            self.reset_state();
            KeyResponse::idle().with_error(SessionError::EngineInput {
                input: format!("select #{index}"),
            })
        }
    }

    pub fn next_page(&mut self) -> Result<(), SessionError> {
        self.turn_page(PageDirection::Next)
    }

    pub fn previous_page(&mut self) -> Result<(), SessionError> {
        self.turn_page(PageDirection::Previous)
    }

    /// The engine owns the page cursor; a refusal means there is no such page
    /// and nothing changed.
    pub(crate) fn turn_page(&mut self, direction: PageDirection) -> Result<(), SessionError> {
        if self.state.ascii_mode || !self.state.composing {
            warn!(%direction, "no composition to paginate");
            return Err(SessionError::PaginationUnavailable { direction });
        }
        let code = match direction {
            PageDirection::Previous => keysym::PAGE_UP,
            PageDirection::Next => keysym::PAGE_DOWN,
        };
        if self.engine.input_key_code(code) {
            self.refresh_from_engine();
            Ok(())
        } else {
            warn!(%direction, "engine has no candidate page");
            Err(SessionError::PaginationUnavailable { direction })
        }
    }

    /// Commit the raw input instead of any candidate.
    pub fn user_input_on_screen(&mut self) -> Option<String> {
        if self.state.input_buffer.is_empty() {
            return None;
        }
        let raw = self.state.input_buffer.clone();
        self.reset_state();
        Some(raw)
    }

    /// Resolve the composition with the engine's space key, then append
    /// `symbol` (punctuation picked from a symbol list). When the engine
    /// cannot resolve it, the raw input is committed instead.
    pub fn commit_with_symbol(&mut self, symbol: &str) -> KeyResponse {
        if self.state.ascii_mode || !self.state.composing {
            return KeyResponse::pass_through(symbol);
        }

        let raw = self.state.input_buffer.clone();
        let mut text = String::new();
        if self.engine.input_key_code(keysym::SPACE) {
            text = self.engine.commit_text();
        }
        self.reset_state();

        if !text.is_empty() {
            text.push_str(symbol);
            return KeyResponse::committed(text);
        }
        warn!(input = %raw, "engine could not resolve composition before symbol");
        if raw.is_empty() {
            let mut resp = KeyResponse::pass_through(symbol);
            resp.candidates = CandidateAction::Hide;
            return resp;
        }
        let mut resp = KeyResponse::committed(format!("{raw}{symbol}"));
        resp.error = Some(SessionError::EngineInput { input: raw });
        resp
    }
}
