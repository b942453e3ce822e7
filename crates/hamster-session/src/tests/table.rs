//! End-to-end runs against the table engine and schema files on disk.

use std::fs;
use std::path::Path;

use hamster_core::table::TableEngine;

use super::*;
use crate::Outcome;

const PINYIN: &str = r#"
[schema]
id = "pinyin"
name = "拼音"
color_scheme = "lost_temple"
page_size = 2

[entries]
ni = ["你", "尼", "泥"]
nihao = ["你好"]
hao = ["好", "号"]

[traditional]
"号" = "號"
"#;

const CANGJIE: &str = r#"
[schema]
id = "cangjie"
name = "倉頡"
auto_commit = true

[entries]
oiar = ["倉"]
jrmr = ["頡"]
"#;

fn write(dir: &Path, name: &str, content: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

fn table_session() -> (tempfile::TempDir, InputSession<TableEngine>) {
    let root = tempfile::tempdir().unwrap();
    let shared = root.path().join("SharedSupport");
    write(&shared, "pinyin.schema.toml", PINYIN);
    write(&shared, "cangjie.schema.toml", CANGJIE);
    let engine = TableEngine::new(shared, root.path().join("Rime"));
    let mut session = InputSession::new(engine, SessionConfig::default().with_schema("pinyin"));
    session.start().unwrap();
    (root, session)
}

#[test]
fn test_table_compose_and_page() {
    let (_root, mut session) = table_session();
    type_string(&mut session, "ni");
    assert_eq!(session.candidates().texts(), vec!["你", "尼"]);

    session.next_page().unwrap();
    assert_eq!(session.candidates().texts(), vec!["泥", "你好"]);
    assert_eq!(session.candidates().candidates[1].comment, "hao");
    assert!(session.next_page().is_err());

    let resp = session.select_candidate(1);
    assert_eq!(resp.outcome, Outcome::Committed("你好".to_string()));
    assert!(session.state().is_idle());
}

#[test]
fn test_table_space_and_newline() {
    let (_root, mut session) = table_session();
    type_string(&mut session, "hao");
    assert_eq!(session.handle_text(" ").output(), Some("好"));

    type_string(&mut session, "nihao");
    assert_eq!(session.handle_text("\n").output(), Some("nihao"));
}

#[test]
fn test_table_rejects_outside_alphabet() {
    let (_root, mut session) = table_session();
    let resp = session.handle_text("1");
    assert_eq!(resp.outcome, Outcome::PassThrough("1".to_string()));
    assert!(resp.error.is_some());
}

#[test]
fn test_table_traditional_toggle() {
    let (_root, mut session) = table_session();
    type_string(&mut session, "hao");
    assert_eq!(session.candidates().texts(), vec!["好", "号"]);

    session.toggle_simplified_traditional().unwrap();
    assert_eq!(session.candidates().texts(), vec!["好", "號"]);
}

#[test]
fn test_table_auto_commit_after_switch() {
    let (_root, mut session) = table_session();
    session.switch_schema("cangjie").unwrap();
    assert_eq!(session.active_color_scheme(), None);

    let responses = type_string(&mut session, "oiar");
    assert_eq!(
        responses.last().map(|r| r.outcome.clone()),
        Some(Outcome::Committed("倉".to_string()))
    );
}

#[test]
fn test_table_full_redeploy_keeps_schema() {
    let (_root, mut session) = table_session();
    // A full deploy makes the table engine fall back to its first schema
    // (cangjie); the session selects pinyin again.
    session.redeploy(true).unwrap();
    assert_eq!(session.state().current_schema_id, "pinyin");
    assert_eq!(session.engine().active_schema().map(|s| s.id()), Some("pinyin"));

    type_string(&mut session, "ni");
    assert_eq!(session.candidates().len(), 2);
}
