use super::types::{CandidateAction, CandidateMenu, KeyResponse, Outcome, SessionError};

impl KeyResponse {
    pub(crate) fn pass_through(text: &str) -> Self {
        Self::new(Outcome::PassThrough(text.to_string()), CandidateAction::Keep)
    }

    pub(crate) fn not_consumed() -> Self {
        Self::new(Outcome::NotConsumed, CandidateAction::Keep)
    }

    pub(crate) fn committed(text: String) -> Self {
        Self::new(Outcome::Committed(text), CandidateAction::Hide)
    }

    pub(crate) fn composing(menu: &CandidateMenu) -> Self {
        let candidates = if menu.is_empty() {
            CandidateAction::Hide
        } else {
            CandidateAction::Show(menu.clone())
        };
        Self::new(Outcome::Composing, candidates)
    }

    pub(crate) fn idle() -> Self {
        Self::new(Outcome::Idle, CandidateAction::Hide)
    }

    pub(crate) fn delete_backward() -> Self {
        Self::new(Outcome::DeleteBackward, CandidateAction::Keep)
    }

    /// Engine failure: the session was reset, so the panel goes away.
    pub(crate) fn with_error(mut self, error: SessionError) -> Self {
        self.candidates = CandidateAction::Hide;
        self.error = Some(error);
        self
    }

    fn new(outcome: Outcome, candidates: CandidateAction) -> Self {
        Self {
            outcome,
            candidates,
            error: None,
        }
    }
}
