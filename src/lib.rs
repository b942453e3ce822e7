//! Keyboard extension engine: the input session behind a UniFFI surface.
//!
//! The host (Swift keyboard) implements [`api::RimeBinding`] over librime and
//! drives an [`api::HamsterSession`] with key events. Redeploys run on a
//! background thread; key events arriving meanwhile are queued and returned
//! from [`api::HamsterSession::poll`].

uniffi::setup_scaffolding!();

pub mod api;
mod deploy_worker;
mod trace_init;
