//! Command handlers module.
//!
//! - `capture.rs`: Home workflow (`capture`)
//! - `recall.rs`: Recall workflow (`ask`)
//! - `graph.rs`: Graph explorer subcommands and `update`
//! - `settings.rs`: Backend settings and maintenance actions
//! - `system.rs`: Vault tree, interactive shell, completions
//!
//! Handlers take their input and output streams explicitly so the
//! confirmation and clarification prompts can be driven from tests.

mod capture;
mod graph;
mod prompt;
mod recall;
mod settings;
mod system;

pub use capture::{CaptureArgs, cmd_capture};
pub use graph::{GraphAction, cmd_graph, cmd_update};
pub use recall::cmd_ask;
pub use settings::{SettingsAction, cmd_settings};
pub use system::{cmd_completions, cmd_shell, cmd_tree};
