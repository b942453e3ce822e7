use std::fs;
use std::path::Path;

use super::*;

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

fn deployed() -> (tempfile::TempDir, TableEngine) {
    let root = tempfile::tempdir().unwrap();
    let shared = root.path().join("SharedSupport");
    let user = root.path().join("Rime");
    write(&shared, "pinyin.schema.toml", PINYIN);
    write(&shared, "cangjie.schema.toml", CANGJIE);
    let mut engine = TableEngine::new(shared, user);
    assert!(engine.deploy(true));
    assert!(engine.set_schema("pinyin"));
    (root, engine)
}

fn texts(menu: &MenuPage) -> Vec<&str> {
    menu.candidates.iter().map(|c| c.text.as_str()).collect()
}

#[test]
fn deploy_without_schemas_fails() {
    let root = tempfile::tempdir().unwrap();
    let mut engine = TableEngine::new(root.path().join("a"), root.path().join("b"));
    assert!(!engine.deploy(true));
    assert!(engine.schema_list().is_empty());
}

#[test]
fn deploy_lists_schemas_in_file_order() {
    let (_root, engine) = deployed();
    let ids: Vec<String> = engine.schema_list().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["cangjie", "pinyin"]);
    let pinyin = engine
        .schema_list()
        .into_iter()
        .find(|s| s.id == "pinyin")
        .unwrap();
    assert_eq!(pinyin.color_scheme_name.as_deref(), Some("lost_temple"));
}

#[test]
fn user_schema_overrides_shared() {
    let root = tempfile::tempdir().unwrap();
    let shared = root.path().join("shared");
    let user = root.path().join("user");
    write(&shared, "pinyin.schema.toml", PINYIN);
    write(
        &user,
        "pinyin.custom.schema.toml",
        "[schema]\nid = \"pinyin\"\nname = \"自定义\"\n[entries]\nni = [\"妮\"]\n",
    );
    let mut engine = TableEngine::new(shared, user);
    assert!(engine.deploy(true));
    let list = engine.schema_list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].display_name, "自定义");

    assert!(engine.input_text("n"));
    assert!(engine.input_text("i"));
    assert_eq!(texts(&engine.candidate_menu()), vec!["妮"]);
}

#[test]
fn invalid_schema_file_fails_deploy_and_keeps_previous_state() {
    let (root, mut engine) = deployed();
    write(
        &root.path().join("Rime"),
        "broken.schema.toml",
        "[schema]\nid = \"broken\"\nname = \"x\"\npage_size = 0\n",
    );
    assert!(!engine.deploy(true));
    assert_eq!(engine.schema_list().len(), 2);
}

#[test]
fn exact_matches_rank_before_completions() {
    let (_root, mut engine) = deployed();
    assert!(engine.input_text("n"));
    assert!(engine.input_text("i"));
    assert!(engine.is_composing());
    assert_eq!(engine.raw_input(), "ni");

    let menu = engine.candidate_menu();
    assert_eq!(texts(&menu), vec!["你", "尼"]);
    assert_eq!(menu.page_index, 0);
    assert!(!menu.is_last_page);

    assert!(engine.input_key_code(keysym::PAGE_DOWN));
    let menu = engine.candidate_menu();
    assert_eq!(texts(&menu), vec!["泥", "你好"]);
    assert_eq!(menu.candidates[1].comment, "hao");
    assert!(menu.is_last_page);

    assert!(!engine.input_key_code(keysym::PAGE_DOWN));
    assert!(engine.input_key_code(keysym::PAGE_UP));
    assert!(!engine.input_key_code(keysym::PAGE_UP));
}

#[test]
fn rejects_input_outside_alphabet() {
    let (_root, mut engine) = deployed();
    assert!(!engine.input_text("1"));
    assert!(!engine.input_text(","));
    assert!(!engine.is_composing());
}

#[test]
fn space_commits_first_candidate_on_page() {
    let (_root, mut engine) = deployed();
    engine.input_text("h");
    engine.input_text("a");
    engine.input_text("o");
    assert!(engine.input_key_code(keysym::SPACE));
    assert_eq!(engine.commit_text(), "好");
    assert_eq!(engine.commit_text(), "");
    assert!(!engine.is_composing());
}

#[test]
fn return_commits_raw_input() {
    let (_root, mut engine) = deployed();
    engine.input_text("n");
    assert!(engine.input_key_code(keysym::RETURN));
    assert_eq!(engine.commit_text(), "n");
}

#[test]
fn backspace_and_escape_edit_composition() {
    let (_root, mut engine) = deployed();
    assert!(!engine.input_key_code(keysym::BACKSPACE));
    engine.input_text("n");
    engine.input_text("i");
    assert!(engine.input_key_code(keysym::BACKSPACE));
    assert_eq!(engine.raw_input(), "n");
    assert!(engine.input_key_code(keysym::ESCAPE));
    assert!(!engine.is_composing());
}

#[test]
fn select_candidate_uses_current_page() {
    let (_root, mut engine) = deployed();
    engine.input_text("n");
    engine.input_text("i");
    engine.input_key_code(keysym::PAGE_DOWN);
    assert!(!engine.select_candidate(5));
    assert!(engine.select_candidate(0));
    assert_eq!(engine.commit_text(), "泥");
}

#[test]
fn traditional_mode_maps_characters() {
    let (_root, mut engine) = deployed();
    assert!(engine.set_simplified(false));
    engine.input_text("h");
    engine.input_text("a");
    engine.input_text("o");
    assert_eq!(texts(&engine.candidate_menu()), vec!["好", "號"]);
}

#[test]
fn unique_code_auto_commits() {
    let (_root, mut engine) = deployed();
    assert!(engine.set_schema("cangjie"));
    for c in ["o", "i", "a"] {
        assert!(engine.input_text(c));
        assert!(engine.commit_text().is_empty());
    }
    assert!(engine.input_text("r"));
    assert_eq!(engine.commit_text(), "倉");
    assert!(!engine.is_composing());
}

#[test]
fn set_schema_rejects_unknown_id() {
    let (_root, mut engine) = deployed();
    assert!(!engine.set_schema("wubi"));
    assert_eq!(engine.active_schema().unwrap().id(), "pinyin");
}

#[test]
fn full_deploy_resets_schema_selection() {
    let (_root, mut engine) = deployed();
    assert!(engine.deploy(true));
    assert_eq!(engine.active_schema().unwrap().id(), "cangjie");
}

#[test]
fn quick_deploy_skips_unchanged_files() {
    let (_root, mut engine) = deployed();
    assert!(engine.deploy(false));
    // Nothing reloaded, so the selection survives.
    assert_eq!(engine.active_schema().unwrap().id(), "pinyin");
}

#[test]
fn quick_deploy_reloads_changed_files() {
    let (root, mut engine) = deployed();
    write(
        &root.path().join("Rime"),
        "wubi.schema.toml",
        "[schema]\nid = \"wubi\"\nname = \"五笔\"\n",
    );
    assert!(engine.deploy(false));
    assert_eq!(engine.schema_list().len(), 3);
}
