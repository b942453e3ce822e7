use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process;

use hamster_core::table::TableEngine;
use hamster_core::SessionConfig;
use hamster_session::InputSession;

use crate::script::{parse_script, run_event};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

fn open_session(
    shared_dir: &str,
    user_dir: &str,
    config_file: Option<&str>,
) -> InputSession<TableEngine> {
    let config = match config_file {
        Some(path) => die!(
            SessionConfig::load(Path::new(path)),
            "Error loading config {path}: {}"
        ),
        None => SessionConfig::default(),
    };
    let engine = TableEngine::new(shared_dir, user_dir);
    let mut session = InputSession::new(engine, config);
    die!(session.start(), "Error deploying schemas: {}");
    session
}

/// Print the deployed schemas as a JSON array.
pub fn schemas(shared_dir: &str, user_dir: &str) {
    let session = open_session(shared_dir, user_dir, None);
    let json = die!(
        serde_json::to_string_pretty(session.schemas()),
        "Error serializing schemas: {}"
    );
    println!("{json}");
}

/// Run a replay script, printing one JSON record per event.
pub fn replay(script_file: &str, shared_dir: &str, user_dir: &str, config_file: Option<&str>) {
    let content = die!(
        fs::read_to_string(script_file),
        "Error reading {script_file}: {}"
    );
    let events = die!(parse_script(&content), "Error in {script_file}: {}");
    let mut session = open_session(shared_dir, user_dir, config_file);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for event in &events {
        let record = run_event(&mut session, event);
        let line = die!(serde_json::to_string(&record), "Error serializing record: {}");
        die!(writeln!(out, "{line}"), "Error writing output: {}");
    }
    die!(out.flush(), "Error writing output: {}");
}
