use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use hamster_core::settings::parse_config_toml;
use hamster_session::{InputSession, KeyResponse, ObserverId};
use tracing::{debug, info, warn};

use crate::deploy_worker::{lock, DeployKind, DeployWorker};

use super::binding::{ForeignEngine, HamsterObserver, ObserverBridge, RimeBinding};
use super::types::{
    convert_to_events, HamsterError, HamsterEvent, HamsterKeyResponse, HamsterMenuPage,
    HamsterSchema, HamsterState,
};

type Session = InputSession<ForeignEngine>;

/// A key event that arrived while a deploy was running.
#[derive(Debug)]
enum QueuedEvent {
    Text(String),
    KeyCode(u32),
    Backspace,
    Symbol(String),
    Select(u32),
}

impl QueuedEvent {
    fn dispatch(self, session: &mut Session) -> KeyResponse {
        match self {
            QueuedEvent::Text(text) => session.handle_text(&text),
            QueuedEvent::KeyCode(code) => session.handle_key_code(code),
            QueuedEvent::Backspace => session.handle_backspace(),
            QueuedEvent::Symbol(symbol) => session.commit_with_symbol(&symbol),
            QueuedEvent::Select(index) => session.select_candidate(index as usize),
        }
    }
}

#[derive(uniffi::Object)]
pub struct HamsterSession {
    // Lock order: `queued` before `session`.
    queued: Mutex<VecDeque<QueuedEvent>>,
    session: Arc<Mutex<Session>>,
    worker: DeployWorker,
}

#[uniffi::export]
impl HamsterSession {
    /// `config_toml` is the keyboard's settings file; empty means defaults.
    #[uniffi::constructor]
    pub fn new(
        binding: Arc<dyn RimeBinding>,
        config_toml: String,
    ) -> Result<Arc<Self>, HamsterError> {
        let config = if config_toml.trim().is_empty() {
            Default::default()
        } else {
            parse_config_toml(&config_toml)?
        };
        let session = Arc::new(Mutex::new(InputSession::new(
            ForeignEngine::new(binding),
            config,
        )));
        let worker = DeployWorker::new(Arc::clone(&session)).map_err(|e| {
            HamsterError::Internal {
                msg: format!("failed to spawn deploy worker: {e}"),
            }
        })?;
        Ok(Arc::new(Self {
            queued: Mutex::new(VecDeque::new()),
            session,
            worker,
        }))
    }

    // --- Key events ---

    pub fn handle_text(&self, text: String) -> HamsterKeyResponse {
        self.dispatch(QueuedEvent::Text(text))
    }

    pub fn handle_key_code(&self, code: u32) -> HamsterKeyResponse {
        self.dispatch(QueuedEvent::KeyCode(code))
    }

    pub fn handle_backspace(&self) -> HamsterKeyResponse {
        self.dispatch(QueuedEvent::Backspace)
    }

    pub fn commit_with_symbol(&self, symbol: String) -> HamsterKeyResponse {
        self.dispatch(QueuedEvent::Symbol(symbol))
    }

    // --- Candidates ---
    //
    // Quick commits return `None` while key events wait on a deploy: the
    // composition they would commit is not there yet.

    pub fn first_candidate_commit(&self) -> Option<String> {
        self.when_settled(Session::first_candidate_commit)
            .ok()
            .flatten()
    }

    pub fn second_candidate_commit(&self) -> Option<String> {
        self.when_settled(Session::second_candidate_commit)
            .ok()
            .flatten()
    }

    pub fn select_candidate(&self, index: u32) -> HamsterKeyResponse {
        self.dispatch(QueuedEvent::Select(index))
    }

    pub fn user_input_on_screen(&self) -> Option<String> {
        self.when_settled(Session::user_input_on_screen)
            .ok()
            .flatten()
    }

    pub fn next_page(&self) -> Result<(), HamsterError> {
        Ok(self.when_settled(Session::next_page)??)
    }

    pub fn previous_page(&self) -> Result<(), HamsterError> {
        Ok(self.when_settled(Session::previous_page)??)
    }

    // --- Schema and modes ---
    //
    // Rejected with `Busy` while key events wait on a deploy, so a mode
    // change never overtakes keys typed before it.

    pub fn switch_schema(&self, schema_id: String) -> Result<(), HamsterError> {
        Ok(self.when_settled(|s| s.switch_schema(&schema_id))??)
    }

    pub fn toggle_ascii_mode(&self) -> Result<bool, HamsterError> {
        self.when_settled(Session::toggle_ascii_mode)
    }

    pub fn toggle_simplified_traditional(&self) -> Result<bool, HamsterError> {
        Ok(self.when_settled(Session::toggle_simplified_traditional)??)
    }

    pub fn apply_config(&self, config_toml: String) -> Result<(), HamsterError> {
        let config = parse_config_toml(&config_toml)?;
        Ok(self.when_settled(|s| s.apply_config(config))??)
    }

    pub fn active_color_scheme(&self) -> Option<String> {
        lock(&self.session).active_color_scheme()
    }

    // --- Deploy ---

    /// First deploy and the configured schema, in the background.
    pub fn start(&self) {
        self.worker.submit(DeployKind::Start);
    }

    /// Reload the engine in the background. Key events are queued until the
    /// deploy finishes; `poll` returns the result and their responses.
    pub fn redeploy(&self, full_check: bool) {
        self.worker.submit(DeployKind::Redeploy { full_check });
    }

    pub fn cancel_deploy(&self) -> bool {
        self.worker.cancel()
    }

    pub fn is_deploying(&self) -> bool {
        self.worker.is_deploying()
    }

    pub fn poll(&self) -> Option<HamsterKeyResponse> {
        let mut queued = lock(&self.queued);
        let mut events = Vec::new();
        if self.worker.is_deploying() {
            let outcome = self.worker.try_recv()?;
            match &outcome.result {
                Ok(()) => info!(kind = ?outcome.kind, "deploy finished"),
                Err(e) => warn!(kind = ?outcome.kind, error = %e, "deploy finished with error"),
            }
            events.push(HamsterEvent::DeployFinished {
                error: outcome.result.err().map(|e| e.to_string()),
            });
        } else if queued.is_empty() {
            return None;
        }

        let mut session = lock(&self.session);
        if !queued.is_empty() {
            debug!(count = queued.len(), "replaying queued key events");
        }
        let mut consumed = true;
        for event in queued.drain(..) {
            let resp = convert_to_events(event.dispatch(&mut session));
            consumed &= resp.consumed;
            events.extend(resp.events);
        }
        Some(HamsterKeyResponse { consumed, events })
    }

    // --- Observers ---

    pub fn subscribe(&self, observer: Arc<dyn HamsterObserver>) -> u64 {
        lock(&self.session)
            .subscribe(Arc::new(ObserverBridge(observer)))
            .as_raw()
    }

    pub fn unsubscribe(&self, id: u64) -> bool {
        lock(&self.session).unsubscribe(ObserverId::from_raw(id))
    }

    // --- Snapshots ---

    pub fn state(&self) -> HamsterState {
        lock(&self.session).state().into()
    }

    pub fn candidates(&self) -> HamsterMenuPage {
        lock(&self.session).candidates().into()
    }

    pub fn is_composing(&self) -> bool {
        lock(&self.session).is_composing()
    }

    pub fn schemas(&self) -> Vec<HamsterSchema> {
        lock(&self.session)
            .schemas()
            .iter()
            .map(HamsterSchema::from)
            .collect()
    }

    pub fn current_schema(&self) -> Option<HamsterSchema> {
        lock(&self.session).current_schema().map(HamsterSchema::from)
    }
}

impl HamsterSession {
    /// Run `f` if no deploy is pending and no key event is waiting for
    /// replay; otherwise `Busy`.
    fn when_settled<R>(&self, f: impl FnOnce(&mut Session) -> R) -> Result<R, HamsterError> {
        let queued = lock(&self.queued);
        if self.worker.is_deploying() || !queued.is_empty() {
            debug!(queued = queued.len(), "session call rejected until poll");
            return Err(HamsterError::Busy);
        }
        let mut session = lock(&self.session);
        Ok(f(&mut session))
    }

    /// Run a key event now, or queue it behind a running deploy.
    fn dispatch(&self, event: QueuedEvent) -> HamsterKeyResponse {
        let mut queued = lock(&self.queued);
        if self.worker.is_deploying() || !queued.is_empty() {
            debug!(?event, "deploy running, key event queued");
            queued.push_back(event);
            return HamsterKeyResponse {
                consumed: true,
                events: vec![HamsterEvent::SchedulePoll],
            };
        }
        let mut session = lock(&self.session);
        convert_to_events(event.dispatch(&mut session))
    }
}
