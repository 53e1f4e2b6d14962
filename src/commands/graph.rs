//! Graph CLI commands.
//!
//! - `list`: filtered node list
//! - `show`: detail panel for one memory
//! - `delete`: confirmed delete
//! - `canvas`: ASCII rendering of the force layout
//! - `export`: nodes, links and layout coordinates as JSON

use super::prompt::confirm;
use anyhow::{Result, bail};
use engram::CortexApi;
use engram::config::EngramConfig;
use engram::layout::Layout;
use engram::models::{GraphLink, GraphNode, MemoryId};
use engram::render::{render_canvas, render_node_detail, render_node_list};
use engram::state::RequestState;
use engram::views::GraphView;
use serde::Serialize;
use std::io::{BufRead, Write};

/// Graph action subcommands.
#[derive(Debug, clap::Subcommand)]
pub enum GraphAction {
    /// List memories, optionally filtered by name or group.
    List {
        /// Case-insensitive substring of the name or group.
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show the detail panel for a memory.
    Show {
        /// Memory ID.
        id: String,
    },

    /// Delete a memory.
    Delete {
        /// Memory ID.
        id: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Draw the graph layout as text.
    Canvas {
        /// Canvas width in columns.
        #[arg(long)]
        width: Option<usize>,

        /// Canvas height in rows.
        #[arg(long)]
        height: Option<usize>,

        /// Memory to select and zoom to.
        #[arg(long)]
        select: Option<String>,
    },

    /// Print nodes, links and layout coordinates as JSON.
    Export,
}

#[derive(Serialize)]
struct Export<'a> {
    nodes: &'a [GraphNode],
    links: &'a [GraphLink],
    layout: &'a Layout,
}

/// Execute a graph command.
///
/// # Errors
///
/// Returns an error if the graph cannot be fetched, the memory is unknown,
/// or the delete fails.
pub fn cmd_graph(
    api: &dyn CortexApi,
    config: &EngramConfig,
    action: GraphAction,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    match action {
        GraphAction::List { filter } => {
            let mut graph = load(api, GraphView::from_config(config))?;
            graph.set_filter(filter.unwrap_or_default());
            write!(out, "{}", render_node_list(&graph.visible_nodes(), None))?;
        },
        GraphAction::Show { id } => {
            let mut graph = load(api, GraphView::from_config(config))?;
            graph.select(&MemoryId::from(id))?;
            if let Some(node) = graph.selected_node() {
                write!(out, "{}", render_node_detail(node))?;
            }
        },
        GraphAction::Delete { id, force } => cmd_delete(api, config, &id, force, input, out)?,
        GraphAction::Canvas { width, height, select } => {
            let width = width.unwrap_or(config.ui.canvas_width);
            let height = height.unwrap_or(config.ui.canvas_height);
            let mut graph = load(api, GraphView::from_config(config).with_canvas_size(width, height))?;
            if let Some(id) = select {
                graph.select(&MemoryId::from(id))?;
            }
            writeln!(
                out,
                "{}",
                render_canvas(graph.data(), graph.layout(), graph.viewport(), graph.selected(), width, height)
            )?;
        },
        GraphAction::Export => {
            let graph = load(api, GraphView::from_config(config))?;
            let export = Export {
                nodes: &graph.data().nodes,
                links: &graph.data().links,
                layout: graph.layout(),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&export)?)?;
        },
    }
    Ok(())
}

fn cmd_delete(
    api: &dyn CortexApi,
    config: &EngramConfig,
    id: &str,
    force: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let mut graph = load(api, GraphView::from_config(config))?;
    graph.select(&MemoryId::from(id))?;
    graph.request_delete()?;

    let name = graph.selected_node().map_or(id, |n| n.name.as_str()).to_string();
    if !force && !confirm(input, out, &format!("Delete \"{name}\"?"))? {
        graph.cancel_delete();
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }

    graph.confirm_delete(api)?;
    match graph.delete_state() {
        RequestState::Failed(e) => bail!("Failed to delete memory: {e}"),
        _ => {
            writeln!(out, "Memory deleted.")?;
            Ok(())
        },
    }
}

/// Sends new content for a memory.
///
/// # Errors
///
/// Returns an error if the content is blank or Cortex rejects the update.
pub fn cmd_update(api: &dyn CortexApi, id: &str, content: &str, out: &mut dyn Write) -> Result<()> {
    if content.trim().is_empty() {
        bail!("content is empty");
    }
    let receipt = api.update_memory(&MemoryId::from(id), content)?;
    writeln!(out, "Updated {id} ({})", receipt.status)?;
    Ok(())
}

fn load(api: &dyn CortexApi, mut graph: GraphView) -> Result<GraphView> {
    graph.refresh(api);
    if let RequestState::Failed(e) = graph.fetch_state() {
        bail!("Failed to load graph: {e}");
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram::client::{Endpoint, InMemoryCortex};
    use engram::models::GraphData;

    fn seeded() -> InMemoryCortex {
        InMemoryCortex::new().with_graph(GraphData::new(
            vec![
                GraphNode::new("a", "Sprint Retro", "Work/Meetings"),
                GraphNode::new("b", "Groceries", "Personal"),
            ],
            vec![GraphLink::new("a", "b")],
        ))
    }

    fn run(cortex: &InMemoryCortex, action: GraphAction, input: &str) -> Result<String> {
        let mut out = Vec::new();
        cmd_graph(cortex, &EngramConfig::default(), action, &mut input.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_list_filters_by_group() {
        let output = run(&seeded(), GraphAction::List { filter: Some("work".to_string()) }, "").unwrap();
        assert!(output.contains("Sprint Retro"));
        assert!(!output.contains("Groceries"));
    }

    #[test]
    fn test_delete_declined_sends_nothing() {
        let cortex = seeded();
        let action = GraphAction::Delete { id: "a".to_string(), force: false };
        let output = run(&cortex, action, "n\n").unwrap();

        assert!(output.contains("Delete \"Sprint Retro\"? [y/N]"));
        assert!(output.ends_with("Cancelled.\n"));
        assert_eq!(cortex.count(Endpoint::Delete), 0);
    }

    #[test]
    fn test_delete_confirmed_refetches_once() {
        let cortex = seeded();
        let action = GraphAction::Delete { id: "a".to_string(), force: false };
        run(&cortex, action, "y\n").unwrap();

        assert_eq!(cortex.count(Endpoint::Delete), 1);
        assert_eq!(cortex.count(Endpoint::Graph), 2);
        assert_eq!(cortex.graph_snapshot().nodes.len(), 1);
    }

    #[test]
    fn test_export_includes_layout() {
        let output = run(&seeded(), GraphAction::Export, "").unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["nodes"].as_array().unwrap().len(), 2);
        assert_eq!(value["links"][0]["source"], "a");
        assert!(value["layout"]["b"]["x"].is_number());
    }

    #[test]
    fn test_update_rejects_blank_content() {
        let cortex = seeded();
        assert!(cmd_update(&cortex, "a", "  ", &mut Vec::new()).is_err());
        assert_eq!(cortex.count(Endpoint::Update), 0);
    }
}
