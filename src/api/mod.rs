//! UniFFI export layer: Swift bindings for the keyboard extension.
//!
//! Each public type here maps to a generated Swift class, struct, enum or
//! protocol.

mod binding;
mod session;
mod types;


pub use binding::{HamsterObserver, RimeBinding};
pub use session::HamsterSession;
pub use types::{
    HamsterCandidate, HamsterError, HamsterEvent, HamsterKeyResponse, HamsterMenuPage,
    HamsterNotification, HamsterSchema, HamsterState,
};

use std::path::Path;

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

#[uniffi::export]
fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[uniffi::export]
fn trace_init(log_dir: String) {
    crate::trace_init::init_tracing(Path::new(&log_dir));
}

/// The built-in settings file, for the host to seed its editor with.
#[uniffi::export]
fn config_default() -> String {
    hamster_core::settings::DEFAULT_CONFIG_TOML.to_string()
}

#[uniffi::export]
fn config_validate(config_toml: String) -> Result<(), HamsterError> {
    hamster_core::settings::parse_config_toml(&config_toml)?;
    Ok(())
}
