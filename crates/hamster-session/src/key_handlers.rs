use hamster_core::keysym;
use hamster_core::InputEngine;
use tracing::{debug_span, error};

use super::types::{KeyResponse, PageDirection, SessionError};
use super::InputSession;

impl<E: InputEngine> InputSession<E> {
    /// Process one piece of text from the keyboard.
    pub fn handle_text(&mut self, text: &str) -> KeyResponse {
        let _span = debug_span!("handle_text", ?text).entered();

        if text == keysym::CARRIAGE_RETURN_TEXT || text == keysym::TAB_TEXT {
            return KeyResponse::pass_through(text);
        }
        if self.state.ascii_mode {
            return KeyResponse::pass_through(text);
        }

        // Space selects the first candidate; with nothing to select it is a space.
        if text == keysym::SPACE_TEXT {
            if !self.state.composing {
                return KeyResponse::pass_through(text);
            }
            return match self.first_candidate_commit() {
                Some(committed) => KeyResponse::committed(committed),
                None => KeyResponse::pass_through(text),
            };
        }

        // Newline commits what was typed, literally.
        if text == keysym::NEWLINE_TEXT {
            return match self.user_input_on_screen() {
                Some(raw) => KeyResponse::committed(raw),
                None => KeyResponse::pass_through(text),
            };
        }

        if self.engine.input_text(text) {
            self.after_engine_input()
        } else {
            error!(text, "engine rejected input");
            self.reset_state();
            KeyResponse::pass_through(text).with_error(SessionError::EngineInput {
                input: text.to_string(),
            })
        }
    }

    /// Process one key symbol (hardware keyboard, toolbar buttons).
    pub fn handle_key_code(&mut self, code: u32) -> KeyResponse {
        let _span = debug_span!("handle_key_code", code).entered();

        if self.state.ascii_mode {
            return KeyResponse::not_consumed();
        }
        match code {
            keysym::BACKSPACE => return self.handle_backspace(),
            keysym::PAGE_UP | keysym::PAGE_DOWN => {
                if !self.state.composing {
                    return KeyResponse::not_consumed();
                }
                let direction = if code == keysym::PAGE_UP {
                    PageDirection::Previous
                } else {
                    PageDirection::Next
                };
                return match self.turn_page(direction) {
                    Ok(()) => KeyResponse::composing(&self.menu),
                    Err(e) => {
                        let mut resp = KeyResponse::composing(&self.menu);
                        resp.error = Some(e);
                        resp
                    }
                };
            }
            _ => {}
        }

        if self.engine.input_key_code(code) {
            self.after_engine_input()
        } else {
            error!(code, "engine rejected key code");
            self.reset_state();
            KeyResponse::not_consumed().with_error(SessionError::EngineInput {
                input: format!("{code:#x}"),
            })
        }
    }

    pub fn handle_backspace(&mut self) -> KeyResponse {
        let _span = debug_span!("handle_backspace").entered();

        if self.state.input_buffer.is_empty() {
            return KeyResponse::delete_backward();
        }
        if self.engine.input_key_code(keysym::BACKSPACE) {
            self.after_engine_input()
        } else {
            error!("engine rejected backspace");
            self.reset_state();
            KeyResponse::idle().with_error(SessionError::EngineInput {
                input: "BackSpace".to_string(),
            })
        }
    }
}
