//! Foreign traits the host implements, and their adapters into the session.

use std::sync::Arc;

use hamster_core::{InputEngine, MenuPage, SchemaDescriptor};
use hamster_session::{SessionEvent, SessionObserver};

use super::types::{HamsterMenuPage, HamsterNotification, HamsterSchema};

/// The phonetic engine as seen from Rust. On iOS this wraps librime; calls
/// arrive serialized, one session at a time.
#[uniffi::export(with_foreign)]
pub trait RimeBinding: Send + Sync {
    fn input_text(&self, text: String) -> bool;
    fn input_key_code(&self, code: u32) -> bool;
    fn is_composing(&self) -> bool;
    fn candidate_menu(&self) -> HamsterMenuPage;
    /// Text the engine resolved since the last call; empty when none.
    fn commit_text(&self) -> String;
    fn raw_input(&self) -> String;
    fn clear_composition(&self);
    fn select_candidate(&self, index: u32) -> bool;
    fn set_schema(&self, schema_id: String) -> bool;
    fn set_simplified(&self, simplified: bool) -> bool;
    fn deploy(&self, full_check: bool) -> bool;
    fn schema_list(&self) -> Vec<HamsterSchema>;
}

/// Receives session change notifications. Called with the session locked:
/// implementations must not call back into the session.
#[uniffi::export(with_foreign)]
pub trait HamsterObserver: Send + Sync {
    fn on_event(&self, event: HamsterNotification);
}

pub(super) struct ForeignEngine {
    binding: Arc<dyn RimeBinding>,
}

impl ForeignEngine {
    pub(super) fn new(binding: Arc<dyn RimeBinding>) -> Self {
        Self { binding }
    }
}

impl InputEngine for ForeignEngine {
    fn input_text(&mut self, text: &str) -> bool {
        self.binding.input_text(text.to_string())
    }

    fn input_key_code(&mut self, code: u32) -> bool {
        self.binding.input_key_code(code)
    }

    fn is_composing(&self) -> bool {
        self.binding.is_composing()
    }

    fn candidate_menu(&self) -> MenuPage {
        let page = self.binding.candidate_menu();
        MenuPage {
            candidates: page.candidates.into_iter().map(Into::into).collect(),
            page_index: page.page_index as usize,
            is_last_page: page.is_last_page,
        }
    }

    fn commit_text(&mut self) -> String {
        self.binding.commit_text()
    }

    fn raw_input(&self) -> String {
        self.binding.raw_input()
    }

    fn clear_composition(&mut self) {
        self.binding.clear_composition();
    }

    fn select_candidate(&mut self, index: usize) -> bool {
        match u32::try_from(index) {
            Ok(index) => self.binding.select_candidate(index),
            Err(_) => false,
        }
    }

    fn set_schema(&mut self, schema_id: &str) -> bool {
        self.binding.set_schema(schema_id.to_string())
    }

    fn set_simplified(&mut self, simplified: bool) -> bool {
        self.binding.set_simplified(simplified)
    }

    fn deploy(&mut self, full_check: bool) -> bool {
        self.binding.deploy(full_check)
    }

    fn schema_list(&self) -> Vec<SchemaDescriptor> {
        self.binding
            .schema_list()
            .into_iter()
            .map(SchemaDescriptor::from)
            .collect()
    }
}

pub(super) struct ObserverBridge(pub(super) Arc<dyn HamsterObserver>);

impl SessionObserver for ObserverBridge {
    fn on_event(&self, event: &SessionEvent) {
        self.0.on_event(HamsterNotification::from(event));
    }
}
