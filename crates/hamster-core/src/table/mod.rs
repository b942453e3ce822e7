//! Table-driven reference engine.
//!
//! Schemas are `*.schema.toml` files read from the shared support directory
//! and then the user data directory; a user file replaces a shared file with
//! the same schema id. The engine keeps one composition: the typed code, the
//! page cursor and any text resolved for commit.

mod schema_file;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, error, info};

use crate::binding::{Candidate, InputEngine, MenuPage, SchemaDescriptor};
use crate::keysym;

pub use schema_file::{TableError, TableSchema, SCHEMA_FILE_SUFFIX};

/// (path, modified, len) of every schema file seen by the last deploy.
type Fingerprint = Vec<(PathBuf, Option<SystemTime>, u64)>;

pub struct TableEngine {
    shared_dir: PathBuf,
    user_dir: PathBuf,
    schemas: Vec<TableSchema>,
    fingerprint: Option<Fingerprint>,
    active: usize,
    simplified: bool,
    input: String,
    page: usize,
    commit: String,
}

impl TableEngine {
    /// Create an engine over the two data directories. Nothing is loaded
    /// until the first `deploy`.
    pub fn new(shared_dir: impl Into<PathBuf>, user_dir: impl Into<PathBuf>) -> Self {
        Self {
            shared_dir: shared_dir.into(),
            user_dir: user_dir.into(),
            schemas: Vec::new(),
            fingerprint: None,
            active: 0,
            simplified: true,
            input: String::new(),
            page: 0,
            commit: String::new(),
        }
    }

    pub fn active_schema(&self) -> Option<&TableSchema> {
        self.schemas.get(self.active)
    }

    /// Load every schema, shared first, user files overriding by id.
    pub fn load_schemas(&self) -> Result<Vec<TableSchema>, TableError> {
        let mut schemas: Vec<TableSchema> = Vec::new();
        for dir in [&self.shared_dir, &self.user_dir] {
            for path in schema_files(dir)? {
                let schema = TableSchema::load(&path)?;
                match schemas.iter_mut().find(|s| s.id() == schema.id()) {
                    Some(existing) => {
                        debug!(id = schema.id(), path = %path.display(), "schema overridden");
                        *existing = schema;
                    }
                    None => schemas.push(schema),
                }
            }
        }
        Ok(schemas)
    }

    fn fingerprint(&self) -> Result<Fingerprint, TableError> {
        let mut fp = Vec::new();
        for dir in [&self.shared_dir, &self.user_dir] {
            for path in schema_files(dir)? {
                let meta = std::fs::metadata(&path).map_err(|source| TableError::Io {
                    path: path.clone(),
                    source,
                })?;
                fp.push((path, meta.modified().ok(), meta.len()));
            }
        }
        Ok(fp)
    }

    fn all_candidates(&self) -> Vec<Candidate> {
        let Some(schema) = self.active_schema() else {
            return Vec::new();
        };
        if self.input.is_empty() {
            return Vec::new();
        }
        let convert = |word: &str| {
            if self.simplified {
                word.to_string()
            } else {
                schema.to_traditional(word)
            }
        };

        let mut out: Vec<Candidate> = schema
            .entries
            .get(&self.input)
            .into_iter()
            .flatten()
            .map(|w| Candidate::new(convert(w), ""))
            .collect();
        let completions = schema
            .entries
            .range::<str, _>((
                std::ops::Bound::Excluded(self.input.as_str()),
                std::ops::Bound::Unbounded,
            ))
            .take_while(|(code, _)| code.starts_with(&self.input));
        for (code, words) in completions {
            let rest = &code[self.input.len()..];
            out.extend(words.iter().map(|w| Candidate::new(convert(w), rest)));
        }
        out
    }

    fn page_size(&self) -> usize {
        self.active_schema().map_or(1, |s| s.page_size)
    }

    fn page_count(&self) -> usize {
        self.all_candidates().len().div_ceil(self.page_size())
    }

    fn resolve(&mut self, text: String) {
        self.commit.push_str(&text);
        self.input.clear();
        self.page = 0;
    }

    fn try_auto_commit(&mut self) {
        let Some(schema) = self.active_schema() else {
            return;
        };
        if !schema.auto_commit || schema.has_longer_code(&self.input) {
            return;
        }
        let candidates = self.all_candidates();
        if let [only] = candidates.as_slice() {
            let text = only.text.clone();
            debug!(code = %self.input, %text, "unique code auto-committed");
            self.resolve(text);
        }
    }
}

fn schema_files(dir: &Path) -> Result<Vec<PathBuf>, TableError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let read = std::fs::read_dir(dir).map_err(|source| TableError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = read
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(SCHEMA_FILE_SUFFIX))
        })
        .collect();
    files.sort();
    Ok(files)
}

impl InputEngine for TableEngine {
    fn input_text(&mut self, text: &str) -> bool {
        let accepted = self.active_schema().is_some_and(|s| s.accepts(text));
        if !accepted {
            return false;
        }
        self.input.push_str(text);
        self.page = 0;
        self.try_auto_commit();
        true
    }

    fn input_key_code(&mut self, code: u32) -> bool {
        let composing = self.is_composing();
        match code {
            keysym::SPACE if composing => {
                let first = self
                    .candidate_menu()
                    .candidates
                    .into_iter()
                    .next()
                    .map(|c| c.text);
                match first {
                    Some(text) => {
                        self.resolve(text);
                        true
                    }
                    None => false,
                }
            }
            keysym::RETURN if composing => {
                let raw = self.input.clone();
                self.resolve(raw);
                true
            }
            keysym::BACKSPACE if composing => {
                self.input.pop();
                self.page = 0;
                true
            }
            keysym::ESCAPE if composing => {
                self.clear_composition();
                true
            }
            keysym::PAGE_DOWN if composing => {
                if self.page + 1 < self.page_count() {
                    self.page += 1;
                    true
                } else {
                    false
                }
            }
            keysym::PAGE_UP if composing => {
                if self.page > 0 {
                    self.page -= 1;
                    true
                } else {
                    false
                }
            }
            0x21..=0x7e => match char::from_u32(code) {
                Some(c) => self.input_text(c.encode_utf8(&mut [0; 4])),
                None => false,
            },
            _ => false,
        }
    }

    fn is_composing(&self) -> bool {
        !self.input.is_empty()
    }

    fn candidate_menu(&self) -> MenuPage {
        let all = self.all_candidates();
        let size = self.page_size();
        let start = self.page * size;
        let candidates: Vec<Candidate> = all.iter().skip(start).take(size).cloned().collect();
        MenuPage {
            candidates,
            page_index: self.page,
            is_last_page: start + size >= all.len(),
        }
    }

    fn commit_text(&mut self) -> String {
        std::mem::take(&mut self.commit)
    }

    fn raw_input(&self) -> String {
        self.input.clone()
    }

    fn clear_composition(&mut self) {
        self.input.clear();
        self.page = 0;
    }

    fn select_candidate(&mut self, index: usize) -> bool {
        if index >= self.page_size() {
            return false;
        }
        let global = self.page * self.page_size() + index;
        match self.all_candidates().into_iter().nth(global) {
            Some(c) => {
                self.resolve(c.text);
                true
            }
            None => false,
        }
    }

    fn set_schema(&mut self, schema_id: &str) -> bool {
        match self.schemas.iter().position(|s| s.id() == schema_id) {
            Some(idx) => {
                self.active = idx;
                self.clear_composition();
                info!(schema_id, "schema selected");
                true
            }
            None => false,
        }
    }

    fn set_simplified(&mut self, simplified: bool) -> bool {
        self.simplified = simplified;
        true
    }

    fn deploy(&mut self, full_check: bool) -> bool {
        let fingerprint = match self.fingerprint() {
            Ok(fp) => fp,
            Err(e) => {
                error!(error = %e, "deploy failed to scan data directories");
                return false;
            }
        };
        let unchanged = self.fingerprint.as_ref() == Some(&fingerprint);
        if !full_check && !self.schemas.is_empty() && unchanged {
            info!("deploy skipped, schema files unchanged");
            return true;
        }
        let schemas = match self.load_schemas() {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "deploy failed");
                return false;
            }
        };
        if schemas.is_empty() {
            error!(
                shared = %self.shared_dir.display(),
                user = %self.user_dir.display(),
                "deploy found no schema files"
            );
            return false;
        }
        info!(count = schemas.len(), full_check, "deployed schemas");
        self.schemas = schemas;
        self.fingerprint = Some(fingerprint);
        // A fresh deploy selects the default (first) schema.
        self.active = 0;
        self.clear_composition();
        self.commit.clear();
        true
    }

    fn schema_list(&self) -> Vec<SchemaDescriptor> {
        self.schemas.iter().map(|s| s.descriptor.clone()).collect()
    }
}
