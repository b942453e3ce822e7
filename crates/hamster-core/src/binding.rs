//! The narrow capability set the session layer drives.
//!
//! An `InputEngine` owns the real composition (input code, candidate cursor,
//! active schema). The session never mutates engine state except through
//! these methods, and never calls them concurrently.

use serde::{Deserialize, Serialize};

/// One entry of the candidate menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    /// Annotation shown next to the text (remaining code, pronunciation, ...).
    #[serde(default)]
    pub comment: String,
}

impl Candidate {
    pub fn new(text: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            comment: comment.into(),
        }
    }
}

/// The page of the candidate menu the engine currently exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPage {
    pub candidates: Vec<Candidate>,
    pub page_index: usize,
    pub is_last_page: bool,
}

/// An input schema as reported by the engine after deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub color_scheme_name: Option<String>,
}

/// Opaque phonetic composition engine.
///
/// Boolean returns mirror librime: `false` means the engine rejected the
/// request and its state is unspecified until the caller clears it.
pub trait InputEngine {
    /// Feed one piece of text (usually a single character).
    fn input_text(&mut self, text: &str) -> bool;

    /// Feed one key symbol (see [`crate::keysym`]).
    fn input_key_code(&mut self, code: u32) -> bool;

    fn is_composing(&self) -> bool;

    fn candidate_menu(&self) -> MenuPage;

    /// Take the text the engine resolved for commit. Empty if none.
    fn commit_text(&mut self) -> String;

    /// The raw, unresolved input code of the current composition.
    fn raw_input(&self) -> String;

    fn clear_composition(&mut self);

    /// Select a candidate on the current page.
    fn select_candidate(&mut self, index: usize) -> bool;

    fn set_schema(&mut self, schema_id: &str) -> bool;

    fn set_simplified(&mut self, simplified: bool) -> bool;

    /// Reload schemas and dictionaries from the data directories.
    fn deploy(&mut self, full_check: bool) -> bool;

    fn schema_list(&self) -> Vec<SchemaDescriptor>;
}

impl<E: InputEngine + ?Sized> InputEngine for Box<E> {
    fn input_text(&mut self, text: &str) -> bool {
        (**self).input_text(text)
    }

    fn input_key_code(&mut self, code: u32) -> bool {
        (**self).input_key_code(code)
    }

    fn is_composing(&self) -> bool {
        (**self).is_composing()
    }

    fn candidate_menu(&self) -> MenuPage {
        (**self).candidate_menu()
    }

    fn commit_text(&mut self) -> String {
        (**self).commit_text()
    }

    fn raw_input(&self) -> String {
        (**self).raw_input()
    }

    fn clear_composition(&mut self) {
        (**self).clear_composition()
    }

    fn select_candidate(&mut self, index: usize) -> bool {
        (**self).select_candidate(index)
    }

    fn set_schema(&mut self, schema_id: &str) -> bool {
        (**self).set_schema(schema_id)
    }

    fn set_simplified(&mut self, simplified: bool) -> bool {
        (**self).set_simplified(simplified)
    }

    fn deploy(&mut self, full_check: bool) -> bool {
        (**self).deploy(full_check)
    }

    fn schema_list(&self) -> Vec<SchemaDescriptor> {
        (**self).schema_list()
    }
}
