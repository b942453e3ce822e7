use std::fmt;

use hamster_core::{Candidate, MenuPage};

/// Per-session composition state. Owned by exactly one `InputSession`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Raw keystrokes the engine has not resolved yet.
    pub input_buffer: String,
    pub ascii_mode: bool,
    pub simplified_mode: bool,
    /// Empty means the engine default.
    pub current_schema_id: String,
    /// Engine composing status, cached once per dispatch cycle.
    pub composing: bool,
}

impl SessionState {
    pub fn is_idle(&self) -> bool {
        !self.composing && self.input_buffer.is_empty()
    }
}

/// Current page of engine candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateMenu {
    pub candidates: Vec<Candidate>,
    pub page_index: usize,
    pub is_last_page: bool,
}

impl CandidateMenu {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.text.as_str()).collect()
    }
}

impl From<MenuPage> for CandidateMenu {
    fn from(page: MenuPage) -> Self {
        Self {
            candidates: page.candidates,
            page_index: page.page_index,
            is_last_page: page.is_last_page,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Previous,
    Next,
}

impl fmt::Display for PageDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Previous => f.write_str("previous"),
            Self::Next => f.write_str("next"),
        }
    }
}

/// Failures reported by the session. None of them leave the session in a
/// composing state the engine does not agree with.
///
/// An empty commit from the engine is not an error: composition continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The engine rejected an input. The session was reset and the literal
    /// input (if any) passed through.
    #[error("engine rejected input {input:?}")]
    EngineInput { input: String },
    #[error("failed to switch to schema {schema_id:?}")]
    SchemaSwitchFailed { schema_id: String },
    #[error("no {direction} candidate page")]
    PaginationUnavailable { direction: PageDirection },
    #[error("engine refused simplified = {simplified}")]
    ModeSwitchFailed { simplified: bool },
    /// The engine may be degraded; the host should reinitialize it.
    #[error("deploy failed (full_check = {full_check})")]
    RedeployFailed { full_check: bool },
}

/// What the host should do with the event it delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Insert this text verbatim; the engine was not involved or gave up.
    PassThrough(String),
    /// The key code is not for the session; let the host handle it.
    NotConsumed,
    /// Insert this resolved text; the session is Idle again.
    Committed(String),
    /// The engine holds a composition; nothing to insert.
    Composing,
    /// The engine consumed the input without leaving anything pending.
    Idle,
    /// Nothing composing: delete one grapheme before the cursor.
    DeleteBackward,
}

/// Candidate panel action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateAction {
    /// Leave the panel as-is.
    Keep,
    Show(CandidateMenu),
    Hide,
}

/// Response from every dispatch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyResponse {
    pub outcome: Outcome,
    pub candidates: CandidateAction,
    /// Non-fatal error that was recovered locally.
    pub error: Option<SessionError>,
}

impl KeyResponse {
    /// Text the host must insert, if any.
    pub fn output(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::PassThrough(text) | Outcome::Committed(text) if !text.is_empty() => {
                Some(text)
            }
            _ => None,
        }
    }

    pub fn is_committed(&self) -> bool {
        matches!(self.outcome, Outcome::Committed(_))
    }
}
