//! Backend settings and destructive maintenance actions.

use crate::client::CortexApi;
use crate::config::UiSettings;
use crate::models::{BackendConfig, ConfigField, ConfigUpdateReceipt};
use crate::state::{Notices, RequestState};
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// Actions gated behind a confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceAction {
    /// Rebuild embeddings and the graph.
    Reindex,
    /// Delete every stored memory.
    Reset,
}

impl MaintenanceAction {
    /// Confirmation prompt.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Reindex => "Re-index the whole vault? This may take a while.",
            Self::Reset => "Wipe every memory? This cannot be undone.",
        }
    }

    const fn failure_message(self) -> &'static str {
        match self {
            Self::Reindex => "Re-index failed.",
            Self::Reset => "Failed to wipe brain.",
        }
    }
}

impl fmt::Display for MaintenanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Reindex => "reindex",
            Self::Reset => "reset",
        })
    }
}

impl FromStr for MaintenanceAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "reindex" => Ok(Self::Reindex),
            "reset" | "wipe" => Ok(Self::Reset),
            other => Err(Error::InvalidInput(format!("unknown action '{other}'"))),
        }
    }
}

/// Settings view state.
#[derive(Debug, Clone)]
pub struct SettingsView {
    config: Option<BackendConfig>,
    load: RequestState<()>,
    update: RequestState<ConfigUpdateReceipt>,
    action: RequestState<String>,
    pending_action: Option<MaintenanceAction>,
    notices: Notices,
    saved_ttl: Duration,
    action_ttl: Duration,
}

impl Default for SettingsView {
    fn default() -> Self {
        Self::new(&UiSettings::default())
    }
}

impl SettingsView {
    /// Creates an unloaded view.
    #[must_use]
    pub fn new(ui: &UiSettings) -> Self {
        Self {
            config: None,
            load: RequestState::Idle,
            update: RequestState::Idle,
            action: RequestState::Idle,
            pending_action: None,
            notices: Notices::new(),
            saved_ttl: Duration::from_millis(ui.saved_notice_ms),
            action_ttl: Duration::from_millis(ui.action_notice_ms),
        }
    }

    /// Fetches the backend config, replacing what is displayed.
    pub fn load(&mut self, api: &dyn CortexApi) {
        self.load = RequestState::Pending;
        match api.config() {
            Ok(config) => {
                self.config = Some(config);
                self.load = RequestState::Succeeded(());
            },
            Err(e) => {
                tracing::warn!(error = %e, "Loading settings failed");
                self.notices.error(format!("Failed to load settings: {e}"));
                self.load = RequestState::Failed(e.to_string());
            },
        }
    }

    /// Displayed settings.
    #[must_use]
    pub const fn config(&self) -> Option<&BackendConfig> {
        self.config.as_ref()
    }

    /// Applies a field edit locally and sends it to Cortex.
    ///
    /// On failure the settings are refetched so the display reverts to the
    /// server's value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if settings were never loaded.
    pub fn update_field(&mut self, api: &dyn CortexApi, field: ConfigField, value: &str) -> Result<()> {
        let config = self
            .config
            .as_mut()
            .ok_or_else(|| Error::InvalidInput("settings are not loaded".to_string()))?;
        let previous = config.clone();
        config.set(field, value);

        self.update = RequestState::Pending;
        match api.update_config(field, value) {
            Ok(receipt) => {
                tracing::info!(field = %field, requires_restart = receipt.requires_restart, "Setting updated");
                self.notices.success("Saved", self.saved_ttl, Instant::now());
                self.update = RequestState::Succeeded(receipt);
            },
            Err(e) => {
                tracing::warn!(field = %field, error = %e, "Setting update failed, reverting");
                self.notices
                    .error(format!("Failed to update {}: {e}", field.label()));
                self.update = RequestState::Failed(e.to_string());
                self.config = Some(previous);
                self.load(api);
            },
        }
        Ok(())
    }

    /// Parses `key` and applies [`Self::update_field`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an unknown key, before any request.
    pub fn update_key(&mut self, api: &dyn CortexApi, key: &str, value: &str) -> Result<()> {
        let field = key.parse::<ConfigField>()?;
        self.update_field(api, field, value)
    }

    /// Opens the confirmation for `action`.
    pub const fn request_action(&mut self, action: MaintenanceAction) {
        self.pending_action = Some(action);
    }

    /// Closes the confirmation.
    pub const fn cancel_action(&mut self) {
        self.pending_action = None;
    }

    /// Action awaiting confirmation.
    #[must_use]
    pub const fn pending_action(&self) -> Option<MaintenanceAction> {
        self.pending_action
    }

    /// Runs the confirmed action.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no action awaits confirmation.
    pub fn confirm_action(&mut self, api: &dyn CortexApi) -> Result<()> {
        let action = self
            .pending_action
            .take()
            .ok_or_else(|| Error::InvalidInput("no action awaiting confirmation".to_string()))?;

        self.action = RequestState::Pending;
        let result = match action {
            MaintenanceAction::Reindex => api
                .reindex()
                .map(|r| format!("Re-index complete! processed {} memories.", r.updated)),
            MaintenanceAction::Reset => api
                .reset()
                .map(|_| "Brain completely wiped. Fresh start!".to_string()),
        };

        match result {
            Ok(message) => {
                tracing::info!(action = %action, "Maintenance action completed");
                self.notices
                    .success(message.clone(), self.action_ttl, Instant::now());
                self.action = RequestState::Succeeded(message);
            },
            Err(e) => {
                tracing::warn!(action = %action, error = %e, "Maintenance action failed");
                self.notices.error(action.failure_message());
                self.action = RequestState::Failed(e.to_string());
            },
        }
        Ok(())
    }

    /// Last load state.
    #[must_use]
    pub const fn load_state(&self) -> &RequestState<()> {
        &self.load
    }

    /// Last field update state.
    #[must_use]
    pub const fn update_state(&self) -> &RequestState<ConfigUpdateReceipt> {
        &self.update
    }

    /// Last maintenance action state.
    #[must_use]
    pub const fn action_state(&self) -> &RequestState<String> {
        &self.action
    }

    /// Returns `true` while any request is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.load.is_pending() || self.update.is_pending() || self.action.is_pending()
    }

    /// Live notices.
    #[must_use]
    pub const fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Mutable notices, for dismissal.
    pub const fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    /// Expires old notices.
    pub fn tick(&mut self, now: Instant) {
        self.notices.tick(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Endpoint, InMemoryCortex};
    use crate::state::NoticeKind;
    use test_case::test_case;

    fn cortex() -> InMemoryCortex {
        InMemoryCortex::new().with_config(BackendConfig {
            vault_path: "/home/me/vault".to_string(),
            chat_model: "llama3.1:8b".to_string(),
            available_models: vec!["llama3.1:8b".to_string(), "mistral".to_string()],
        })
    }

    #[test]
    fn test_unknown_key_rejected_before_request() {
        let cortex = cortex();
        let mut settings = SettingsView::default();
        settings.load(&cortex);

        assert!(settings.update_key(&cortex, "embedding_model", "x").is_err());
        assert_eq!(cortex.count(Endpoint::SetConfig), 0);
    }

    #[test]
    fn test_saved_notice_expires() {
        let cortex = cortex();
        let mut settings = SettingsView::default();
        settings.load(&cortex);
        settings
            .update_field(&cortex, ConfigField::ChatModel, "mistral")
            .unwrap();

        assert_eq!(settings.config().unwrap().chat_model, "mistral");
        settings.tick(Instant::now());
        assert_eq!(settings.notices().latest().unwrap().message, "Saved");
        settings.tick(Instant::now() + Duration::from_millis(2_100));
        assert!(settings.notices().is_empty());
    }

    #[test_case(MaintenanceAction::Reindex, "Re-index complete! processed 0 memories.")]
    #[test_case(MaintenanceAction::Reset, "Brain completely wiped. Fresh start!")]
    fn test_action_success_message(action: MaintenanceAction, expected: &str) {
        let cortex = cortex();
        let mut settings = SettingsView::default();
        settings.request_action(action);
        settings.confirm_action(&cortex).unwrap();

        let notice = settings.notices().latest().unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.message, expected);
    }

    #[test_case(MaintenanceAction::Reindex, Endpoint::Reindex, "Re-index failed.")]
    #[test_case(MaintenanceAction::Reset, Endpoint::Reset, "Failed to wipe brain.")]
    fn test_action_failure_message(action: MaintenanceAction, endpoint: Endpoint, expected: &str) {
        let cortex = cortex();
        cortex.fail_next(endpoint, 1);
        let mut settings = SettingsView::default();
        settings.request_action(action);
        settings.confirm_action(&cortex).unwrap();

        let notice = settings.notices().latest().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert_eq!(notice.message, expected);
    }

    #[test]
    fn test_cancel_action_calls_nothing() {
        let cortex = cortex();
        let mut settings = SettingsView::default();
        settings.request_action(MaintenanceAction::Reset);
        settings.cancel_action();

        assert!(settings.confirm_action(&cortex).is_err());
        assert!(cortex.calls().is_empty());
    }
}
