//! Engine-facing building blocks shared by the session layer and its hosts.
//!
//! - [`binding`]: the capability set a composition engine exposes
//! - [`keysym`]: X11 key symbols understood by RIME-style engines
//! - [`settings`]: explicit session configuration loaded from TOML
//! - [`table`]: a table-driven reference engine

pub mod binding;
pub mod keysym;
pub mod settings;
pub mod table;

pub use binding::{Candidate, InputEngine, MenuPage, SchemaDescriptor};
pub use settings::{ConfigError, SessionConfig};
