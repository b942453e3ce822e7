//! Replay scripts: one event per line, run against an input session.
//!
//! A plain line is typed one character at a time. Lines starting with `:`
//! are commands (`:space`, `:bs`, `:enter`, `:next`, `:prev`, `:1`..`:9`,
//! `:raw`, `:sym <text>`, `:ascii`, `:simp`, `:schema <id>`, `:deploy`,
//! `:deploy!`). Blank lines and `#` comments are skipped.

use hamster_core::InputEngine;
use hamster_session::{CandidateAction, InputSession, KeyResponse, Outcome};
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command :{command}")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: :{command} needs an argument")]
    MissingArgument { line: usize, command: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptEvent {
    Text(String),
    Space,
    Backspace,
    Enter,
    NextPage,
    PreviousPage,
    /// Zero-based index on the visible page.
    Select(usize),
    Raw,
    Symbol(String),
    ToggleAscii,
    ToggleSimplified,
    Schema(String),
    Deploy { full_check: bool },
}

pub fn parse_script(content: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    let mut events = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        events.extend(parse_line(idx + 1, line)?);
    }
    Ok(events)
}

fn parse_line(line_no: usize, line: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    if line.trim().is_empty() || line.starts_with('#') {
        return Ok(Vec::new());
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(line
            .chars()
            .map(|c| ScriptEvent::Text(c.to_string()))
            .collect());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    let needs_arg = |event: fn(String) -> ScriptEvent| {
        if arg.is_empty() {
            Err(ScriptError::MissingArgument {
                line: line_no,
                command: name.to_string(),
            })
        } else {
            Ok(event(arg.to_string()))
        }
    };

    let event = match name {
        "space" => ScriptEvent::Space,
        "bs" => ScriptEvent::Backspace,
        "enter" => ScriptEvent::Enter,
        "next" => ScriptEvent::NextPage,
        "prev" => ScriptEvent::PreviousPage,
        "raw" => ScriptEvent::Raw,
        "ascii" => ScriptEvent::ToggleAscii,
        "simp" => ScriptEvent::ToggleSimplified,
        "deploy" => ScriptEvent::Deploy { full_check: false },
        "deploy!" => ScriptEvent::Deploy { full_check: true },
        "sym" => needs_arg(ScriptEvent::Symbol)?,
        "schema" => needs_arg(ScriptEvent::Schema)?,
        digit => match digit.parse::<usize>() {
            Ok(n @ 1..=9) => ScriptEvent::Select(n - 1),
            _ => {
                return Err(ScriptError::UnknownCommand {
                    line: line_no,
                    command: name.to_string(),
                })
            }
        },
    };
    Ok(vec![event])
}

/// One line of replay output.
#[derive(Debug, Serialize)]
pub struct StepRecord {
    pub event: String,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub input: String,
    pub candidates: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn run_event<E: InputEngine>(
    session: &mut InputSession<E>,
    event: &ScriptEvent,
) -> StepRecord {
    let (outcome, output, error) = match event {
        ScriptEvent::Text(text) => from_response(session.handle_text(text)),
        ScriptEvent::Space => from_response(session.handle_text(" ")),
        ScriptEvent::Enter => from_response(session.handle_text("\n")),
        ScriptEvent::Backspace => from_response(session.handle_backspace()),
        ScriptEvent::Select(index) => from_response(session.select_candidate(*index)),
        ScriptEvent::Symbol(symbol) => from_response(session.commit_with_symbol(symbol)),
        ScriptEvent::NextPage => from_result("page", session.next_page()),
        ScriptEvent::PreviousPage => from_result("page", session.previous_page()),
        ScriptEvent::Raw => match session.user_input_on_screen() {
            Some(raw) => ("committed".to_string(), Some(raw), None),
            None => ("idle".to_string(), None, None),
        },
        ScriptEvent::ToggleAscii => {
            let on = session.toggle_ascii_mode();
            (format!("ascii_mode={on}"), None, None)
        }
        ScriptEvent::ToggleSimplified => match session.toggle_simplified_traditional() {
            Ok(on) => (format!("simplified={on}"), None, None),
            Err(e) => ("error".to_string(), None, Some(e.to_string())),
        },
        ScriptEvent::Schema(id) => from_result("schema", session.switch_schema(id)),
        ScriptEvent::Deploy { full_check } => {
            from_result("deployed", session.redeploy(*full_check))
        }
    };

    StepRecord {
        event: describe(event),
        outcome,
        output,
        input: session.state().input_buffer.clone(),
        candidates: session
            .candidates()
            .texts()
            .into_iter()
            .map(str::to_string)
            .collect(),
        error,
    }
}

type Step = (String, Option<String>, Option<String>);

fn from_response(resp: KeyResponse) -> Step {
    let output = resp.output().map(str::to_string);
    let outcome = match &resp.outcome {
        Outcome::PassThrough(_) => "pass_through",
        Outcome::NotConsumed => "not_consumed",
        Outcome::Committed(_) => "committed",
        Outcome::Composing => match resp.candidates {
            CandidateAction::Show(_) => "composing",
            _ => "composing_no_candidates",
        },
        Outcome::Idle => "idle",
        Outcome::DeleteBackward => "delete_backward",
    };
    (
        outcome.to_string(),
        output,
        resp.error.map(|e| e.to_string()),
    )
}

fn from_result<T>(ok: &str, result: Result<T, hamster_session::SessionError>) -> Step {
    match result {
        Ok(_) => (ok.to_string(), None, None),
        Err(e) => ("error".to_string(), None, Some(e.to_string())),
    }
}

fn describe(event: &ScriptEvent) -> String {
    match event {
        ScriptEvent::Text(text) => text.clone(),
        ScriptEvent::Space => ":space".to_string(),
        ScriptEvent::Backspace => ":bs".to_string(),
        ScriptEvent::Enter => ":enter".to_string(),
        ScriptEvent::NextPage => ":next".to_string(),
        ScriptEvent::PreviousPage => ":prev".to_string(),
        ScriptEvent::Select(index) => format!(":{}", index + 1),
        ScriptEvent::Raw => ":raw".to_string(),
        ScriptEvent::Symbol(symbol) => format!(":sym {symbol}"),
        ScriptEvent::ToggleAscii => ":ascii".to_string(),
        ScriptEvent::ToggleSimplified => ":simp".to_string(),
        ScriptEvent::Schema(id) => format!(":schema {id}"),
        ScriptEvent::Deploy { full_check: false } => ":deploy".to_string(),
        ScriptEvent::Deploy { full_check: true } => ":deploy!".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use hamster_core::table::TableEngine;
    use hamster_core::SessionConfig;

    use super::*;

    #[test]
    fn parse_text_and_commands() {
        let events =
            parse_script("# greeting\nni\n:space\n\n:2\n:schema pinyin\n:deploy!\n").unwrap();
        assert_eq!(
            events,
            vec![
                ScriptEvent::Text("n".into()),
                ScriptEvent::Text("i".into()),
                ScriptEvent::Space,
                ScriptEvent::Select(1),
                ScriptEvent::Schema("pinyin".into()),
                ScriptEvent::Deploy { full_check: true },
            ]
        );
    }

    #[test]
    fn parse_errors_carry_line_numbers() {
        assert_eq!(
            parse_script("ni\n:bogus"),
            Err(ScriptError::UnknownCommand {
                line: 2,
                command: "bogus".into()
            })
        );
        assert_eq!(
            parse_script(":schema"),
            Err(ScriptError::MissingArgument {
                line: 1,
                command: "schema".into()
            })
        );
        assert!(parse_script(":0").is_err());
        assert!(parse_script(":10").is_err());
    }

    #[test]
    fn replay_against_table_engine() {
        let root = tempfile::tempdir().unwrap();
        let shared = root.path().join("shared");
        fs::create_dir_all(&shared).unwrap();
        fs::write(
            shared.join("pinyin.schema.toml"),
            "[schema]\nid = \"pinyin\"\nname = \"拼音\"\n\n[entries]\nni = [\"你\", \"尼\"]\n",
        )
        .unwrap();
        let engine = TableEngine::new(shared, root.path().join("user"));
        let mut session =
            InputSession::new(engine, SessionConfig::default().with_schema("pinyin"));
        session.start().unwrap();

        let events = parse_script("ni\n:2\n:bs\n").unwrap();
        let records: Vec<StepRecord> = events.iter().map(|e| run_event(&mut session, e)).collect();

        assert_eq!(records[1].outcome, "composing");
        assert_eq!(records[1].candidates, vec!["你", "尼"]);
        assert_eq!(records[2].outcome, "committed");
        assert_eq!(records[2].output.as_deref(), Some("尼"));
        assert_eq!(records[3].outcome, "delete_backward");
    }
}
