//! `engram capture`: the Home workflow from the command line.

use super::prompt::{ask_line, confirm};
use anyhow::{Result, bail};
use engram::CortexApi;
use engram::config::{CapturePolicy, EngramConfig};
use engram::render::render_capture_outcome;
use engram::views::{CaptureOutcome, HomeView};
use std::io::{BufRead, Write};

/// Arguments for `engram capture`.
#[derive(Debug, clap::Args)]
pub struct CaptureArgs {
    /// The text to capture.
    pub content: String,

    /// Optional title, sent ahead of the content.
    #[arg(short, long)]
    pub title: Option<String>,

    /// Extra context passed to analysis.
    #[arg(long)]
    pub context: Option<String>,

    /// Review the analyzed draft before saving.
    #[arg(long)]
    pub confirm: bool,

    /// Fail instead of prompting on stdin.
    #[arg(long)]
    pub no_interactive: bool,
}

/// Runs the capture workflow, answering clarifying questions on `input`.
///
/// # Errors
///
/// Returns an error if analysis or saving fails, a question goes
/// unanswered, or the draft is discarded.
pub fn cmd_capture(
    api: &dyn CortexApi,
    config: &EngramConfig,
    args: CaptureArgs,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let policy = if args.confirm {
        CapturePolicy::Confirm
    } else {
        config.ui.capture_policy
    };
    let mut home = HomeView::new(&config.ui).with_policy(policy);
    home.set_title(args.title.unwrap_or_default());
    home.set_content(args.content);
    home.set_context(args.context);

    let mut outcome = home.submit(api)?;
    loop {
        outcome = match outcome {
            saved @ CaptureOutcome::Saved { .. } => {
                writeln!(out, "{}", render_capture_outcome(&saved))?;
                return Ok(());
            },
            CaptureOutcome::Failed(reason) => bail!(reason),
            CaptureOutcome::NeedsClarification(question) => {
                if args.no_interactive {
                    bail!("Cortex needs clarification: {question}");
                }
                let Some(answer) = ask_line(input, out, &format!("Cortex asks: {question}\n>"))?
                else {
                    bail!("no answer given, nothing saved");
                };
                if answer.is_empty() {
                    CaptureOutcome::NeedsClarification(question)
                } else {
                    home.answer_clarification(api, &answer)?
                }
            },
            CaptureOutcome::AwaitingReview(draft) => {
                writeln!(out, "Ready to save \"{}\" to {}", draft.title, draft.category)?;
                if !draft.tags.is_empty() {
                    writeln!(out, "Tags: {}", draft.tags)?;
                }
                if !draft.summary.trim().is_empty() {
                    writeln!(out, "\n{}\n", draft.summary.trim_end())?;
                }
                if args.no_interactive || !confirm(input, out, "Save this memory?")? {
                    home.discard()?;
                    bail!("draft discarded, nothing saved");
                }
                home.confirm_save(api)?
            },
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram::client::{Endpoint, InMemoryCortex};
    use engram::models::{Analysis, MemoryDraft};

    fn args(content: &str) -> CaptureArgs {
        CaptureArgs {
            content: content.to_string(),
            title: None,
            context: None,
            confirm: false,
            no_interactive: false,
        }
    }

    #[test]
    fn test_clarification_answered_on_stdin() {
        let cortex = InMemoryCortex::new();
        cortex.push_analysis(Analysis::clarify("Is this for work?"));
        cortex.push_analysis(Analysis::clear(MemoryDraft::new("Groceries", "Personal")));
        let mut out = Vec::new();

        cmd_capture(&cortex, &EngramConfig::default(), args("buy milk"), &mut "yes\n".as_bytes(), &mut out)
            .unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Cortex asks: Is this for work?"));
        assert!(output.contains("Saved \"Groceries\" to Personal"));
        assert_eq!(cortex.count(Endpoint::Analyze), 2);
        assert_eq!(cortex.count(Endpoint::Save), 1);
    }

    #[test]
    fn test_no_interactive_fails_on_question() {
        let cortex = InMemoryCortex::new();
        cortex.push_analysis(Analysis::clarify("Which project?"));
        let mut capture = args("fix the thing");
        capture.no_interactive = true;

        let err = cmd_capture(&cortex, &EngramConfig::default(), capture, &mut "".as_bytes(), &mut Vec::new())
            .unwrap_err();
        assert!(err.to_string().contains("Which project?"));
        assert_eq!(cortex.count(Endpoint::Save), 0);
    }

    #[test]
    fn test_confirm_declined_saves_nothing() {
        let cortex = InMemoryCortex::new();
        let mut capture = args("call the dentist");
        capture.confirm = true;

        let result = cmd_capture(&cortex, &EngramConfig::default(), capture, &mut "n\n".as_bytes(), &mut Vec::new());
        assert!(result.is_err());
        assert_eq!(cortex.count(Endpoint::Save), 0);
    }
}
