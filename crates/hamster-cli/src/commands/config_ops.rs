use std::path::Path;
use std::process;

use hamster_core::settings::{SessionConfig, DEFAULT_CONFIG_TOML};

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            process::exit(1);
        })
    };
}

pub fn config_export() {
    print!("{DEFAULT_CONFIG_TOML}");
}

pub fn config_validate(file: &str) {
    let config = die!(SessionConfig::load(Path::new(file)), "Error in {file}: {}");
    let schema = if config.input.schema.is_empty() {
        "(engine default)"
    } else {
        config.input.schema.as_str()
    };
    println!(
        "OK: schema={schema}, ascii_mode={}, simplified={}, color_scheme={}",
        config.input.ascii_mode,
        config.input.simplified,
        config.color_scheme_override().unwrap_or("(per schema)"),
    );
}
