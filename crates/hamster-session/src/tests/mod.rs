mod table;

use std::collections::{BTreeMap, HashMap};

use hamster_core::keysym;
use hamster_core::{Candidate, InputEngine, MenuPage, SchemaDescriptor, SessionConfig};

use super::{InputSession, KeyResponse};

/// Mutating engine calls, in order. Queries are not recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Call {
    InputText(String),
    InputKeyCode(u32),
    Clear,
    Select(usize),
    SetSchema(String),
    SetSimplified(bool),
    Deploy(bool),
}

/// Scripted engine: exact-code lookup, fixed page size, configurable failures.
pub(super) struct MockEngine {
    pub dict: BTreeMap<String, Vec<String>>,
    /// Codes the engine resolves on its own as soon as they are typed.
    pub auto_commit: HashMap<String, String>,
    pub page_size: usize,
    pub schemas: Vec<SchemaDescriptor>,
    pub active_schema: String,
    pub simplified: bool,
    pub input: String,
    pub page: usize,
    pub commit: String,
    pub fail_inputs: Vec<String>,
    pub fail_simplified: bool,
    pub fail_deploy: bool,
    pub calls: Vec<Call>,
}

impl MockEngine {
    pub fn new() -> Self {
        let mut dict = BTreeMap::new();
        let mut add = |code: &str, words: &[&str]| {
            dict.insert(
                code.to_string(),
                words.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
            );
        };
        add("ni", &["你", "尼", "泥"]);
        add("hao", &["好", "号"]);
        add("nihao", &["你好"]);
        add("men", &["们", "门"]);
        add("shi", &["是", "时", "事", "十", "市", "使", "式"]);

        let mut auto_commit = HashMap::new();
        auto_commit.insert("wo".to_string(), "我".to_string());

        Self {
            dict,
            auto_commit,
            page_size: 5,
            schemas: vec![
                SchemaDescriptor {
                    id: "luna_pinyin".to_string(),
                    display_name: "朙月拼音".to_string(),
                    color_scheme_name: Some("lost_temple".to_string()),
                },
                SchemaDescriptor {
                    id: "double_pinyin".to_string(),
                    display_name: "自然碼雙拼".to_string(),
                    color_scheme_name: None,
                },
            ],
            active_schema: String::new(),
            simplified: true,
            input: String::new(),
            page: 0,
            commit: String::new(),
            fail_inputs: vec!["x".to_string()],
            fail_simplified: false,
            fail_deploy: false,
            calls: Vec::new(),
        }
    }

    fn words(&self) -> Vec<String> {
        let words = self.dict.get(&self.input).cloned().unwrap_or_default();
        if self.simplified {
            return words;
        }
        words
            .into_iter()
            .map(|w| w.replace('们', "們").replace('门', "門"))
            .collect()
    }

    pub fn input_calls(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::InputText(_) | Call::InputKeyCode(_)))
            .count()
    }
}

impl InputEngine for MockEngine {
    fn input_text(&mut self, text: &str) -> bool {
        self.calls.push(Call::InputText(text.to_string()));
        if self.fail_inputs.iter().any(|f| f == text) {
            return false;
        }
        if text.is_empty() || !text.chars().all(|c| c.is_ascii_lowercase()) {
            return false;
        }
        self.input.push_str(text);
        self.page = 0;
        if let Some(word) = self.auto_commit.get(&self.input) {
            self.commit = word.clone();
            self.input.clear();
        }
        true
    }

    fn input_key_code(&mut self, code: u32) -> bool {
        self.calls.push(Call::InputKeyCode(code));
        if self.input.is_empty() {
            return false;
        }
        match code {
            keysym::BACKSPACE => {
                self.input.pop();
                self.page = 0;
                true
            }
            keysym::PAGE_DOWN => {
                if (self.page + 1) * self.page_size < self.words().len() {
                    self.page += 1;
                    true
                } else {
                    false
                }
            }
            keysym::PAGE_UP => {
                if self.page > 0 {
                    self.page -= 1;
                    true
                } else {
                    false
                }
            }
            keysym::SPACE => match self.candidate_menu().candidates.first() {
                Some(c) => {
                    self.commit = c.text.clone();
                    self.input.clear();
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn is_composing(&self) -> bool {
        !self.input.is_empty()
    }

    fn candidate_menu(&self) -> MenuPage {
        let words = self.words();
        let start = self.page * self.page_size;
        MenuPage {
            candidates: words
                .iter()
                .skip(start)
                .take(self.page_size)
                .map(|w| Candidate::new(w.clone(), ""))
                .collect(),
            page_index: self.page,
            is_last_page: start + self.page_size >= words.len(),
        }
    }

    fn commit_text(&mut self) -> String {
        std::mem::take(&mut self.commit)
    }

    fn raw_input(&self) -> String {
        self.input.clone()
    }

    fn clear_composition(&mut self) {
        self.calls.push(Call::Clear);
        self.input.clear();
        self.page = 0;
    }

    fn select_candidate(&mut self, index: usize) -> bool {
        self.calls.push(Call::Select(index));
        match self.candidate_menu().candidates.get(index) {
            Some(c) => {
                self.commit = c.text.clone();
                self.input.clear();
                true
            }
            None => false,
        }
    }

    fn set_schema(&mut self, schema_id: &str) -> bool {
        self.calls.push(Call::SetSchema(schema_id.to_string()));
        if self.schemas.iter().any(|s| s.id == schema_id) {
            self.active_schema = schema_id.to_string();
            self.input.clear();
            true
        } else {
            false
        }
    }

    fn set_simplified(&mut self, simplified: bool) -> bool {
        self.calls.push(Call::SetSimplified(simplified));
        if self.fail_simplified {
            return false;
        }
        self.simplified = simplified;
        true
    }

    fn deploy(&mut self, full_check: bool) -> bool {
        self.calls.push(Call::Deploy(full_check));
        if self.fail_deploy {
            return false;
        }
        // Like librime, a deploy forgets the selected schema and options.
        self.active_schema.clear();
        self.simplified = true;
        self.input.clear();
        self.page = 0;
        true
    }

    fn schema_list(&self) -> Vec<SchemaDescriptor> {
        self.schemas.clone()
    }
}

pub(super) fn make_session() -> InputSession<MockEngine> {
    InputSession::new(MockEngine::new(), SessionConfig::default())
}

/// A session that has been deployed, so the schema list is known.
pub(super) fn started_session() -> InputSession<MockEngine> {
    let mut session = InputSession::new(
        MockEngine::new(),
        SessionConfig::default().with_schema("luna_pinyin"),
    );
    session.start().unwrap();
    session
}

// Helper: simulate typing a string one character at a time
pub(super) fn type_string<E: InputEngine>(
    session: &mut InputSession<E>,
    s: &str,
) -> Vec<KeyResponse> {
    s.chars()
        .map(|ch| session.handle_text(&ch.to_string()))
        .collect()
}

/// Mutating calls recorded since `mark`.
pub(super) fn calls_since(session: &InputSession<MockEngine>, mark: usize) -> &[Call] {
    &session.engine().calls[mark..]
}
