use hamster_core::{InputEngine, SessionConfig};
use tracing::{error, info, info_span, warn};

use super::observer::SessionEvent;
use super::types::SessionError;
use super::InputSession;

impl<E: InputEngine> InputSession<E> {
    /// First deploy, then the configured schema.
    pub fn start(&mut self) -> Result<(), SessionError> {
        let full_check = self.config.deploy.full_check_on_start;
        self.redeploy(full_check)?;
        let schema = self.config.input.schema.clone();
        if schema.is_empty() {
            return Ok(());
        }
        self.switch_schema(&schema)
    }

    pub fn switch_schema(&mut self, schema_id: &str) -> Result<(), SessionError> {
        if schema_id.is_empty() || !self.engine.set_schema(schema_id) {
            error!(schema_id, "failed to switch schema");
            return Err(SessionError::SchemaSwitchFailed {
                schema_id: schema_id.to_string(),
            });
        }
        info!(schema_id, "schema switched");
        self.state.current_schema_id = schema_id.to_string();
        self.notify_schema_changed();
        // Switching may drop the engine's composition.
        self.refresh_from_engine();
        Ok(())
    }

    /// Flip ascii mode and return the new value. A pending composition is
    /// abandoned (reset and announced), never merged into ascii output.
    pub fn toggle_ascii_mode(&mut self) -> bool {
        if !self.state.is_idle() {
            warn!(input = %self.state.input_buffer, "ascii toggle abandons composition");
            self.reset_state();
        }
        self.state.ascii_mode = !self.state.ascii_mode;
        self.notify(SessionEvent::AsciiModeChanged(self.state.ascii_mode));
        self.state.ascii_mode
    }

    /// Flip simplified/traditional output and return the new value.
    pub fn toggle_simplified_traditional(&mut self) -> Result<bool, SessionError> {
        let simplified = !self.state.simplified_mode;
        if !self.engine.set_simplified(simplified) {
            error!(simplified, "engine refused orthography switch");
            return Err(SessionError::ModeSwitchFailed { simplified });
        }
        self.state.simplified_mode = simplified;
        self.notify(SessionEvent::SimplifiedModeChanged(simplified));
        if self.state.composing {
            // Candidate texts change with the orthography.
            self.refresh_from_engine();
        }
        Ok(simplified)
    }

    /// Reload the engine from its data directories and restore the schema
    /// and orthography the session had before.
    pub fn redeploy(&mut self, full_check: bool) -> Result<(), SessionError> {
        let _span = info_span!("redeploy", full_check).entered();

        self.reset_state();
        if !self.engine.deploy(full_check) {
            error!("engine deploy failed");
            return Err(SessionError::RedeployFailed { full_check });
        }
        self.schemas = self.engine.schema_list();
        info!(schemas = self.schemas.len(), "engine deployed");

        if !self.engine.set_simplified(self.state.simplified_mode) {
            warn!(
                simplified = self.state.simplified_mode,
                "engine refused orthography after deploy"
            );
        }
        let reapplied = self.reapply_schema();
        self.notify(SessionEvent::Deployed(self.schemas.clone()));
        reapplied
    }

    /// Deploy may reset the engine's schema selection. Idempotent.
    fn reapply_schema(&mut self) -> Result<(), SessionError> {
        let schema_id = self.state.current_schema_id.clone();
        if schema_id.is_empty() {
            return Ok(());
        }
        if !self.engine.set_schema(&schema_id) {
            error!(%schema_id, "schema missing after deploy");
            return Err(SessionError::SchemaSwitchFailed { schema_id });
        }
        self.notify_schema_changed();
        Ok(())
    }

    /// Apply a changed configuration through the regular mode and schema
    /// paths. Every part is attempted; the first failure is returned.
    pub fn apply_config(&mut self, config: SessionConfig) -> Result<(), SessionError> {
        let appearance_changed = self.config.appearance != config.appearance;
        self.config = config;
        let input = self.config.input.clone();
        let mut result = Ok(());

        if input.ascii_mode != self.state.ascii_mode {
            self.toggle_ascii_mode();
        }
        if input.simplified != self.state.simplified_mode {
            if let Err(e) = self.toggle_simplified_traditional() {
                result = result.and(Err(e));
            }
        }
        if !input.schema.is_empty() && input.schema != self.state.current_schema_id {
            if let Err(e) = self.switch_schema(&input.schema) {
                result = result.and(Err(e));
            }
        }
        if appearance_changed {
            self.notify(SessionEvent::ColorSchemeChanged(self.active_color_scheme()));
        }
        result
    }

    /// The configured color scheme when forced, else the schema's own.
    pub fn active_color_scheme(&self) -> Option<String> {
        if let Some(name) = self.config.color_scheme_override() {
            return Some(name.to_string());
        }
        self.current_schema()
            .and_then(|s| s.color_scheme_name.clone())
    }

    fn notify_schema_changed(&self) {
        self.notify(SessionEvent::SchemaChanged {
            schema_id: self.state.current_schema_id.clone(),
            schema: self.current_schema().cloned(),
        });
    }
}
