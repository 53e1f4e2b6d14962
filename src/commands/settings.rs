//! `engram settings`.

use super::prompt::confirm;
use anyhow::{Result, bail};
use engram::CortexApi;
use engram::config::EngramConfig;
use engram::render::render_settings;
use engram::state::RequestState;
use engram::views::{MaintenanceAction, SettingsView};
use std::io::{BufRead, Write};

/// Settings subcommands.
#[derive(Debug, clap::Subcommand)]
pub enum SettingsAction {
    /// Show the backend settings.
    Show,

    /// Change a setting (`vault_path` or `chat_model`).
    Set {
        /// Field name.
        field: String,

        /// New value.
        value: String,
    },

    /// Re-index the whole vault.
    Reindex {
        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Delete every stored memory.
    Reset {
        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

/// Execute a settings command.
///
/// # Errors
///
/// Returns an error if settings cannot be loaded, the field is unknown, or
/// the backend rejects the change or action.
pub fn cmd_settings(
    api: &dyn CortexApi,
    config: &EngramConfig,
    action: SettingsAction,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let mut settings = SettingsView::new(&config.ui);

    match action {
        SettingsAction::Show => {
            load(api, &mut settings)?;
            write!(out, "{}", render_settings(&settings))?;
        },
        SettingsAction::Set { field, value } => {
            load(api, &mut settings)?;
            settings.update_key(api, &field, &value)?;
            match settings.update_state() {
                RequestState::Failed(e) => bail!("Failed to update {field}: {e}"),
                RequestState::Succeeded(receipt) if receipt.requires_restart => {
                    writeln!(out, "Saved. Restart Cortex to apply.")?;
                },
                _ => writeln!(out, "Saved")?,
            }
        },
        SettingsAction::Reindex { force } => {
            run_action(api, &mut settings, MaintenanceAction::Reindex, force, input, out)?;
        },
        SettingsAction::Reset { force } => {
            run_action(api, &mut settings, MaintenanceAction::Reset, force, input, out)?;
        },
    }
    Ok(())
}

fn run_action(
    api: &dyn CortexApi,
    settings: &mut SettingsView,
    action: MaintenanceAction,
    force: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    settings.request_action(action);
    if !force && !confirm(input, out, action.prompt())? {
        settings.cancel_action();
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }

    settings.confirm_action(api)?;
    match settings.action_state() {
        RequestState::Succeeded(message) => {
            writeln!(out, "{message}")?;
            Ok(())
        },
        RequestState::Failed(e) => {
            let message = settings
                .notices()
                .latest()
                .map_or_else(|| format!("{action} failed"), |n| n.message.clone());
            bail!("{message} ({e})")
        },
        RequestState::Idle | RequestState::Pending => Ok(()),
    }
}

fn load(api: &dyn CortexApi, settings: &mut SettingsView) -> Result<()> {
    settings.load(api);
    if let RequestState::Failed(e) = settings.load_state() {
        bail!("Failed to load settings: {e}");
    }
    Ok(())
}
