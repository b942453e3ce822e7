use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::binding::SchemaDescriptor;

pub const SCHEMA_FILE_SUFFIX: &str = ".schema.toml";

const DEFAULT_PAGE_SIZE: usize = 5;
const MAX_PAGE_SIZE: usize = 10;
const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error in {path}: {msg}")]
    Parse { path: PathBuf, msg: String },
    #[error("invalid schema {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

#[derive(Deserialize)]
struct SchemaFile {
    schema: SchemaHeader,
    #[serde(default)]
    entries: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    traditional: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct SchemaHeader {
    id: String,
    name: String,
    #[serde(default)]
    color_scheme: Option<String>,
    #[serde(default = "default_page_size")]
    page_size: usize,
    #[serde(default)]
    auto_commit: bool,
    #[serde(default = "default_alphabet")]
    alphabet: String,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_alphabet() -> String {
    DEFAULT_ALPHABET.to_string()
}

/// A compiled schema: code table plus the options that drive composition.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub(crate) descriptor: SchemaDescriptor,
    pub(crate) page_size: usize,
    pub(crate) auto_commit: bool,
    pub(crate) alphabet: Vec<char>,
    /// code → words, ordered by code so completions are a range scan.
    pub(crate) entries: BTreeMap<String, Vec<String>>,
    pub(crate) traditional: HashMap<char, char>,
}

impl TableSchema {
    pub fn parse(content: &str, path: &Path) -> Result<Self, TableError> {
        let file: SchemaFile = toml::from_str(content).map_err(|e| TableError::Parse {
            path: path.to_path_buf(),
            msg: e.to_string(),
        })?;
        let invalid = |reason: String| TableError::Invalid {
            path: path.to_path_buf(),
            reason,
        };

        let header = file.schema;
        if header.id.is_empty() || header.id.chars().any(char::is_whitespace) {
            return Err(invalid(format!("bad schema id {:?}", header.id)));
        }
        if header.page_size == 0 || header.page_size > MAX_PAGE_SIZE {
            return Err(invalid(format!(
                "page_size must be in 1..={MAX_PAGE_SIZE}, got {}",
                header.page_size
            )));
        }
        let alphabet: Vec<char> = header.alphabet.chars().collect();
        if alphabet.is_empty() {
            return Err(invalid("alphabet is empty".to_string()));
        }
        for code in file.entries.keys() {
            if code.is_empty() || !code.chars().all(|c| alphabet.contains(&c)) {
                return Err(invalid(format!("code {code:?} is outside the alphabet")));
            }
        }

        let mut traditional = HashMap::with_capacity(file.traditional.len());
        for (simp, trad) in &file.traditional {
            let mut s = simp.chars();
            let mut t = trad.chars();
            match (s.next(), s.next(), t.next(), t.next()) {
                (Some(a), None, Some(b), None) => {
                    traditional.insert(a, b);
                }
                _ => {
                    return Err(invalid(format!(
                        "traditional mapping {simp:?} = {trad:?} must map one character to one"
                    )))
                }
            }
        }

        Ok(Self {
            descriptor: SchemaDescriptor {
                id: header.id,
                display_name: header.name,
                color_scheme_name: header.color_scheme.filter(|s| !s.is_empty()),
            },
            page_size: header.page_size,
            auto_commit: header.auto_commit,
            alphabet,
            entries: file.entries,
            traditional,
        })
    }

    pub fn load(path: &Path) -> Result<Self, TableError> {
        let content = std::fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    pub fn descriptor(&self) -> &SchemaDescriptor {
        &self.descriptor
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub(crate) fn accepts(&self, text: &str) -> bool {
        !text.is_empty() && text.chars().all(|c| self.alphabet.contains(&c))
    }

    /// Whether any code other than `code` itself starts with `code`.
    pub(crate) fn has_longer_code(&self, code: &str) -> bool {
        self.entries
            .range::<str, _>((std::ops::Bound::Excluded(code), std::ops::Bound::Unbounded))
            .next()
            .is_some_and(|(k, _)| k.starts_with(code))
    }

    pub(crate) fn to_traditional(&self, text: &str) -> String {
        text.chars()
            .map(|c| self.traditional.get(&c).copied().unwrap_or(c))
            .collect()
    }
}
