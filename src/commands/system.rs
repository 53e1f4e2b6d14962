//! Vault tree, interactive shell and shell completions.

use anyhow::Result;
use clap_complete::Shell as CompletionShell;
use engram::config::EngramConfig;
use engram::render::render_tree;
use engram::{CortexApi, Shell};
use std::io::{BufRead, Write};

/// Prints the vault folder structure.
///
/// # Errors
///
/// Returns an error if the tree cannot be fetched.
pub fn cmd_tree(api: &dyn CortexApi, out: &mut dyn Write) -> Result<()> {
    let tree = api.vault_tree()?;
    write!(out, "{}", render_tree(&tree))?;
    Ok(())
}

/// Runs the interactive shell until `:quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading input or writing output fails.
pub fn cmd_shell<R: BufRead, W: Write>(
    api: &dyn CortexApi,
    config: EngramConfig,
    input: R,
    out: &mut W,
) -> Result<()> {
    tracing::info!(base_url = %config.api.base_url, "Starting interactive shell");
    Shell::new(api, config).run(input, out)?;
    Ok(())
}

/// Writes a completion script for `shell`.
pub fn cmd_completions(shell: CompletionShell, command: &mut clap::Command, out: &mut dyn Write) {
    let name = command.get_name().to_string();
    clap_complete::generate(shell, command, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram::client::{Endpoint, InMemoryCortex};

    #[test]
    fn test_tree_on_empty_vault() {
        let cortex = InMemoryCortex::new();
        let mut out = Vec::new();
        cmd_tree(&cortex, &mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().contains("(0 files)"));
        assert_eq!(cortex.count(Endpoint::Tree), 1);
    }

    #[test]
    fn test_shell_quits_on_command() {
        let cortex = InMemoryCortex::new();
        let mut out = Vec::new();
        cmd_shell(&cortex, EngramConfig::default(), ":recall\n:quit\n".as_bytes(), &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("recall> "));
    }

    #[test]
    fn test_completions_mention_subcommands() {
        let mut command = clap::Command::new("engram").subcommand(clap::Command::new("tree"));
        let mut out = Vec::new();
        cmd_completions(CompletionShell::Bash, &mut command, &mut out);
        assert!(String::from_utf8(out).unwrap().contains("tree"));
    }
}
