//! Single-screen interactive client.
//!
//! The shell mounts one view at a time. Navigating drops the current view
//! and mounts a fresh one, so no state survives a view switch.

mod command;

pub use command::{Command, HELP};

use crate::client::CortexApi;
use crate::config::EngramConfig;
use crate::models::{ConfigField, MemoryId};
use crate::render;
use crate::views::{GraphView, HomeView, MaintenanceAction, RecallView, SettingsView};
use crate::{Error, Result};
use std::fmt;
use std::io::{BufRead, Write};
use std::str::FromStr;
use std::time::Instant;

/// The four top-level views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Capture.
    Home,
    /// Question answering.
    Recall,
    /// Graph explorer.
    Graph,
    /// Backend settings.
    Settings,
}

impl View {
    /// Returns all views in menu order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Home, Self::Recall, Self::Graph, Self::Settings]
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Recall => "recall",
            Self::Graph => "graph",
            Self::Settings => "settings",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "home" | "capture" => Ok(Self::Home),
            "recall" | "ask" | "search" => Ok(Self::Recall),
            "graph" => Ok(Self::Graph),
            "settings" | "config" => Ok(Self::Settings),
            other => Err(Error::InvalidInput(format!("unknown view '{other}'"))),
        }
    }
}

/// The mounted view.
#[derive(Debug)]
enum Screen {
    Home(HomeView),
    Recall(RecallView),
    Graph(GraphView),
    Settings(SettingsView),
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Exit.
    Quit,
}

/// Interactive client bound to one backend.
pub struct Shell<'a> {
    api: &'a dyn CortexApi,
    config: EngramConfig,
    screen: Screen,
    show_canvas: bool,
    message: Option<String>,
}

impl<'a> Shell<'a> {
    /// Creates a shell with Home mounted.
    #[must_use]
    pub fn new(api: &'a dyn CortexApi, config: EngramConfig) -> Self {
        let screen = Screen::Home(HomeView::new(&config.ui));
        Self {
            api,
            config,
            screen,
            show_canvas: false,
            message: None,
        }
    }

    /// The active view.
    #[must_use]
    pub const fn active(&self) -> View {
        match self.screen {
            Screen::Home(_) => View::Home,
            Screen::Recall(_) => View::Recall,
            Screen::Graph(_) => View::Graph,
            Screen::Settings(_) => View::Settings,
        }
    }

    /// Drops the mounted view and mounts a fresh `view`.
    ///
    /// Graph fetches and Settings loads on mount.
    pub fn navigate(&mut self, view: View) {
        tracing::debug!(from = %self.active(), to = %view, "Switching view");
        self.show_canvas = false;
        self.screen = match view {
            View::Home => Screen::Home(HomeView::new(&self.config.ui)),
            View::Recall => Screen::Recall(RecallView::new()),
            View::Graph => {
                let mut graph = GraphView::from_config(&self.config);
                graph.refresh(self.api);
                Screen::Graph(graph)
            },
            View::Settings => {
                let mut settings = SettingsView::new(&self.config.ui);
                settings.load(self.api);
                Screen::Settings(settings)
            },
        };
    }

    /// Executes one input line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for unknown commands and input the
    /// active view rejects.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        self.message = None;
        let Some(command) = Command::parse(line) else {
            return Ok(Flow::Continue);
        };

        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::Help => self.message = Some(HELP.to_string()),
            Command::Navigate(view) => self.navigate(view),
            Command::Dismiss => self.dismiss(),
            Command::Unknown(other) => {
                return Err(Error::InvalidInput(format!(
                    "unknown command ':{other}', try :help"
                )));
            },
            Command::Action { verb, arg } => self.dispatch(&verb, &arg)?,
        }
        Ok(Flow::Continue)
    }

    fn dismiss(&mut self) {
        match &mut self.screen {
            Screen::Home(v) => v.notices_mut().clear(),
            Screen::Graph(v) => v.notices_mut().clear(),
            Screen::Settings(v) => v.notices_mut().clear(),
            Screen::Recall(_) => {},
        }
    }

    fn dispatch(&mut self, verb: &str, arg: &str) -> Result<()> {
        let api = self.api;
        let active = self.active();
        match &mut self.screen {
            Screen::Home(home) => match verb {
                "title" => home.set_title(arg),
                "content" => home.set_content(arg),
                "context" => home.set_context(Some(arg.to_string())),
                "submit" => {
                    let outcome = home.submit(api)?;
                    self.message = Some(render::render_capture_outcome(&outcome));
                },
                "answer" => {
                    let outcome = home.answer_clarification(api, arg)?;
                    self.message = Some(render::render_capture_outcome(&outcome));
                },
                "confirm" => {
                    let outcome = home.confirm_save(api)?;
                    self.message = Some(render::render_capture_outcome(&outcome));
                },
                "discard" => home.discard()?,
                _ => return Err(unknown(active, verb)),
            },
            Screen::Recall(recall) => match verb {
                "ask" => {
                    recall.set_query(arg);
                    recall.search(api)?;
                },
                _ => return Err(unknown(active, verb)),
            },
            Screen::Graph(graph) => match verb {
                "refresh" => graph.refresh(api),
                "reindex" => graph.reindex(api),
                "filter" => graph.set_filter(arg),
                "select" => graph.select(&MemoryId::from(required(arg, "select <id>")?))?,
                "clear" => graph.clear_selection(),
                "delete" => graph.request_delete()?,
                "confirm" => graph.confirm_delete(api)?,
                "cancel" => graph.cancel_delete(),
                "canvas" => self.show_canvas = !self.show_canvas,
                _ => return Err(unknown(active, verb)),
            },
            Screen::Settings(settings) => match verb {
                "show" => settings.load(api),
                "set" => {
                    let (key, value) = arg
                        .split_once(char::is_whitespace)
                        .ok_or_else(|| Error::InvalidInput("usage: set <field> <value>".to_string()))?;
                    let field = key.parse::<ConfigField>()?;
                    settings.update_field(api, field, value.trim())?;
                },
                "reindex" => settings.request_action(MaintenanceAction::Reindex),
                "reset" => settings.request_action(MaintenanceAction::Reset),
                "confirm" => settings.confirm_action(api)?,
                "cancel" => settings.cancel_action(),
                _ => return Err(unknown(active, verb)),
            },
        }
        Ok(())
    }

    /// Renders the active view, preceded by the last command's message.
    #[must_use]
    pub fn render(&mut self) -> String {
        let now = Instant::now();
        let body = match &mut self.screen {
            Screen::Home(v) => {
                v.tick(now);
                render::render_home(v)
            },
            Screen::Recall(v) => render::render_recall(v, self.config.ui.snippet_chars),
            Screen::Graph(v) => {
                v.tick(now);
                render::render_graph(v, self.show_canvas)
            },
            Screen::Settings(v) => {
                v.tick(now);
                render::render_settings(v)
            },
        };
        match &self.message {
            Some(message) => format!("{message}\n\n{body}"),
            None => body,
        }
    }

    /// Runs the read-execute-render loop until `:quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails. Command
    /// errors are shown inline and do not end the loop.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> Result<()> {
        write_out(output, &format!("{}\n{}> ", self.render(), self.active()))?;

        for line in input.lines() {
            let line = line.map_err(|e| Error::OperationFailed {
                operation: "read_input".to_string(),
                cause: e.to_string(),
            })?;

            match self.execute(&line) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {},
                Err(e) => self.message = Some(format!("error: {e}")),
            }
            write_out(output, &format!("{}\n{}> ", self.render(), self.active()))?;
        }

        write_out(output, "\n")
    }
}

fn write_out<W: Write>(output: &mut W, text: &str) -> Result<()> {
    output
        .write_all(text.as_bytes())
        .and_then(|()| output.flush())
        .map_err(|e| Error::OperationFailed {
            operation: "write_output".to_string(),
            cause: e.to_string(),
        })
}

fn required<'s>(arg: &'s str, usage: &str) -> Result<&'s str> {
    if arg.is_empty() {
        Err(Error::InvalidInput(format!("usage: {usage}")))
    } else {
        Ok(arg)
    }
}

fn unknown(view: View, verb: &str) -> Error {
    Error::InvalidInput(format!("unknown {view} command '{verb}', try :help"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Endpoint, InMemoryCortex};
    use crate::models::{GraphData, GraphNode};

    #[test]
    fn test_navigation_mounts_fresh_views() {
        let cortex = InMemoryCortex::new();
        let mut shell = Shell::new(&cortex, EngramConfig::default());
        assert_eq!(shell.active(), View::Home);

        shell.execute("title Groceries").unwrap();
        shell.execute(":graph").unwrap();
        assert_eq!(cortex.count(Endpoint::Graph), 1);
        shell.execute(":settings").unwrap();
        assert_eq!(cortex.count(Endpoint::GetConfig), 1);

        shell.execute(":home").unwrap();
        assert!(shell.render().contains("Title:   \n"));
    }

    #[test]
    fn test_unknown_verb_is_rejected() {
        let cortex = InMemoryCortex::new();
        let mut shell = Shell::new(&cortex, EngramConfig::default());
        assert!(shell.execute("ask something").is_err());
        assert!(shell.execute(":bogus").is_err());
    }

    #[test]
    fn test_run_loop_until_quit() {
        let cortex = InMemoryCortex::new().with_graph(GraphData::new(
            vec![GraphNode::new("n1", "Standup", "Work")],
            Vec::new(),
        ));
        let mut shell = Shell::new(&cortex, EngramConfig::default());
        let input = ":graph\nselect n1\nfrobnicate\n:quit\nask ignored\n";
        let mut output = Vec::new();

        shell.run(input.as_bytes(), &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("> n1"));
        assert!(output.contains("error: invalid input: unknown graph command 'frobnicate'"));
        assert_eq!(cortex.count(Endpoint::Ask), 0);
    }
}
