//! `engram ask`.

use anyhow::{Result, bail};
use engram::CortexApi;
use engram::config::EngramConfig;
use engram::render::render_answer;
use engram::views::{RECALL_ERROR, RecallView};
use std::io::Write;

/// Asks Cortex a question and prints the answer with its sources.
///
/// # Errors
///
/// Returns an error for a blank query, or the offline banner when the
/// request fails.
pub fn cmd_ask(api: &dyn CortexApi, config: &EngramConfig, query: &str, out: &mut dyn Write) -> Result<()> {
    let mut recall = RecallView::new();
    recall.set_query(query);
    recall.search(api)?;

    match recall.answer() {
        Some(answer) => {
            write!(out, "{}", render_answer(answer, config.ui.snippet_chars))?;
            Ok(())
        },
        None => bail!(recall.banner().unwrap_or(RECALL_ERROR)),
    }
}
