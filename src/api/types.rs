use hamster_core::{Candidate, ConfigError, SchemaDescriptor};
use hamster_session::{
    CandidateAction, CandidateMenu, KeyResponse, Outcome, SessionError, SessionEvent,
    SessionState,
};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum HamsterError {
    #[error("invalid configuration: {msg}")]
    Config { msg: String },
    #[error("session error: {msg}")]
    Session { msg: String },
    #[error("internal error: {msg}")]
    Internal { msg: String },
    /// A deploy is running or queued key events await `poll`.
    #[error("session busy: poll first")]
    Busy,
}

impl From<ConfigError> for HamsterError {
    fn from(e: ConfigError) -> Self {
        HamsterError::Config { msg: e.to_string() }
    }
}

impl From<SessionError> for HamsterError {
    fn from(e: SessionError) -> Self {
        HamsterError::Session { msg: e.to_string() }
    }
}

// ---------------------------------------------------------------------------
// Records (value types, copied across FFI boundary)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq, uniffi::Record)]
pub struct HamsterCandidate {
    pub text: String,
    pub comment: String,
}

#[derive(Clone, Debug, PartialEq, Eq, uniffi::Record)]
pub struct HamsterMenuPage {
    pub candidates: Vec<HamsterCandidate>,
    pub page_index: u32,
    pub is_last_page: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, uniffi::Record)]
pub struct HamsterSchema {
    pub id: String,
    pub display_name: String,
    pub color_scheme_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, uniffi::Record)]
pub struct HamsterState {
    pub input_buffer: String,
    pub composing: bool,
    pub ascii_mode: bool,
    pub simplified_mode: bool,
    pub schema_id: String,
}

/// Event-driven response from key handlers and `poll`.
#[derive(Clone, Debug, PartialEq, Eq, uniffi::Record)]
pub struct HamsterKeyResponse {
    pub consumed: bool,
    pub events: Vec<HamsterEvent>,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Instructions for the keyboard, applied in order.
#[derive(Clone, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum HamsterEvent {
    /// Resolved text from the engine.
    Commit { text: String },
    /// A keystroke the engine did not take; insert as typed.
    InsertText { text: String },
    DeleteBackward,
    ShowCandidates { page: HamsterMenuPage },
    HideCandidates,
    /// Recovered failure, for logging or a toast.
    Error { message: String },
    DeployFinished { error: Option<String> },
    /// Work is pending; call `poll`.
    SchedulePoll,
}

/// Observer notifications, mirroring the session's change events.
#[derive(Clone, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum HamsterNotification {
    StateChanged { state: HamsterState },
    MenuChanged { page: HamsterMenuPage },
    SchemaChanged {
        schema_id: String,
        schema: Option<HamsterSchema>,
    },
    AsciiModeChanged { enabled: bool },
    SimplifiedModeChanged { enabled: bool },
    ColorSchemeChanged { name: Option<String> },
    Deployed { schemas: Vec<HamsterSchema> },
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

impl From<&Candidate> for HamsterCandidate {
    fn from(c: &Candidate) -> Self {
        Self {
            text: c.text.clone(),
            comment: c.comment.clone(),
        }
    }
}

impl From<HamsterCandidate> for Candidate {
    fn from(c: HamsterCandidate) -> Self {
        Candidate::new(c.text, c.comment)
    }
}

impl From<&CandidateMenu> for HamsterMenuPage {
    fn from(menu: &CandidateMenu) -> Self {
        Self {
            candidates: menu.candidates.iter().map(HamsterCandidate::from).collect(),
            page_index: u32::try_from(menu.page_index).unwrap_or(u32::MAX),
            is_last_page: menu.is_last_page,
        }
    }
}

impl From<&SchemaDescriptor> for HamsterSchema {
    fn from(s: &SchemaDescriptor) -> Self {
        Self {
            id: s.id.clone(),
            display_name: s.display_name.clone(),
            color_scheme_name: s.color_scheme_name.clone(),
        }
    }
}

impl From<HamsterSchema> for SchemaDescriptor {
    fn from(s: HamsterSchema) -> Self {
        Self {
            id: s.id,
            display_name: s.display_name,
            color_scheme_name: s.color_scheme_name,
        }
    }
}

impl From<&SessionState> for HamsterState {
    fn from(s: &SessionState) -> Self {
        Self {
            input_buffer: s.input_buffer.clone(),
            composing: s.composing,
            ascii_mode: s.ascii_mode,
            simplified_mode: s.simplified_mode,
            schema_id: s.current_schema_id.clone(),
        }
    }
}

impl From<&SessionEvent> for HamsterNotification {
    fn from(event: &SessionEvent) -> Self {
        match event {
            SessionEvent::StateChanged(state) => Self::StateChanged {
                state: state.into(),
            },
            SessionEvent::MenuChanged(menu) => Self::MenuChanged { page: menu.into() },
            SessionEvent::SchemaChanged { schema_id, schema } => Self::SchemaChanged {
                schema_id: schema_id.clone(),
                schema: schema.as_ref().map(HamsterSchema::from),
            },
            SessionEvent::AsciiModeChanged(enabled) => {
                Self::AsciiModeChanged { enabled: *enabled }
            }
            SessionEvent::SimplifiedModeChanged(enabled) => {
                Self::SimplifiedModeChanged { enabled: *enabled }
            }
            SessionEvent::ColorSchemeChanged(name) => {
                Self::ColorSchemeChanged { name: name.clone() }
            }
            SessionEvent::Deployed(schemas) => Self::Deployed {
                schemas: schemas.iter().map(HamsterSchema::from).collect(),
            },
        }
    }
}

pub(super) fn convert_to_events(resp: KeyResponse) -> HamsterKeyResponse {
    let mut events = Vec::new();
    let consumed = resp.outcome != Outcome::NotConsumed;

    // 1. Text
    match resp.outcome {
        Outcome::Committed(text) => events.push(HamsterEvent::Commit { text }),
        Outcome::PassThrough(text) if !text.is_empty() => {
            events.push(HamsterEvent::InsertText { text })
        }
        Outcome::DeleteBackward => events.push(HamsterEvent::DeleteBackward),
        _ => {}
    }

    // 2. Candidates
    match &resp.candidates {
        CandidateAction::Show(menu) => {
            events.push(HamsterEvent::ShowCandidates { page: menu.into() })
        }
        CandidateAction::Hide => events.push(HamsterEvent::HideCandidates),
        CandidateAction::Keep => {}
    }

    // 3. Recovered error
    if let Some(e) = resp.error {
        events.push(HamsterEvent::Error {
            message: e.to_string(),
        });
    }

    HamsterKeyResponse { consumed, events }
}
