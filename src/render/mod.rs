//! Plain-text rendering of views and payloads.
//!
//! Every function returns a `String`; callers decide where it goes.
//! Markdown (answers, summaries) is passed through as-is.

mod canvas;

pub use canvas::{LINK_GLYPH, NODE_GLYPH, SELECTED_GLYPH, render_canvas};

use crate::models::{Answer, EntryKind, GraphNode, MemoryId, VaultEntry, VaultTree};
use crate::state::{NoticeKind, Notices, RequestState};
use crate::views::{
    CaptureOutcome, CapturePhase, GraphView, HomeView, RecallView, RecentMemory, SettingsView,
};
use std::fmt::Write;

/// Renders live notices, one per line.
#[must_use]
pub fn render_notices(notices: &Notices) -> String {
    let mut out = String::new();
    for notice in notices.iter() {
        let marker = match notice.kind {
            NoticeKind::Success => "[ok]",
            NoticeKind::Error => "[error]",
        };
        let _ = writeln!(out, "{marker} {}", notice.message);
    }
    out
}

/// Renders an answer followed by its numbered sources.
#[must_use]
pub fn render_answer(answer: &Answer, snippet_chars: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", answer.answer.trim_end());
    if answer.sources.is_empty() {
        return out;
    }

    let _ = writeln!(out, "\nSources:");
    for (i, source) in answer.sources.iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{}] {} ({})",
            i + 1,
            source.display_title(),
            source.display_category()
        );
        let snippet = source.snippet_preview(snippet_chars);
        if !snippet.is_empty() {
            let _ = writeln!(out, "      {snippet}");
        }
    }
    out
}

/// Renders the Recall view.
#[must_use]
pub fn render_recall(view: &RecallView, snippet_chars: usize) -> String {
    let mut out = String::from("== Recall ==\n");
    if !view.query().is_empty() {
        let _ = writeln!(out, "Query: {}", view.query());
    }
    match view.state() {
        RequestState::Idle => out.push_str("Ask a question with `ask <question>`.\n"),
        RequestState::Pending => out.push_str("Searching...\n"),
        RequestState::Succeeded(answer) => {
            out.push('\n');
            out.push_str(&render_answer(answer, snippet_chars));
        },
        RequestState::Failed(_) => {
            let _ = writeln!(out, "{}", view.banner().unwrap_or_default());
        },
    }
    out
}

fn render_recent(memory: &RecentMemory) -> String {
    let mut line = format!(
        "  {} {} [{}]",
        memory.saved_at.format("%H:%M"),
        memory.title,
        memory.category
    );
    if !memory.tags.is_empty() {
        let _ = write!(line, " #{}", memory.tags.as_slice().join(" #"));
    }
    line
}

/// Renders the Home view.
#[must_use]
pub fn render_home(view: &HomeView) -> String {
    let mut out = String::from("== Home ==\n");
    let _ = writeln!(out, "Title:   {}", view.title());
    let _ = writeln!(out, "Content: {}", view.content());

    match view.phase() {
        CapturePhase::Editing => {},
        CapturePhase::Clarifying { question } => {
            let _ = writeln!(out, "\nCortex asks: {question}");
            out.push_str("Reply with `answer <text>`, or `discard` to keep editing.\n");
        },
        CapturePhase::Review(draft) => {
            let _ = writeln!(out, "\nReady to save \"{}\" to {}", draft.title, draft.category);
            if !draft.tags.is_empty() {
                let _ = writeln!(out, "Tags: {}", draft.tags);
            }
            if !draft.summary.is_empty() {
                let _ = writeln!(out, "{}", draft.summary.trim_end());
            }
            out.push_str("`confirm` to save, `discard` to keep editing.\n");
        },
    }
    if view.is_busy() {
        out.push_str("Working...\n");
    }

    if !view.recent().is_empty() {
        out.push_str("\nRecent:\n");
        for memory in view.recent().iter() {
            let _ = writeln!(out, "{}", render_recent(memory));
        }
    }
    out.push_str(&render_notices(view.notices()));
    out
}

/// Renders the result of a capture step.
#[must_use]
pub fn render_capture_outcome(outcome: &CaptureOutcome) -> String {
    match outcome {
        CaptureOutcome::Saved { memory, filepath } => {
            let mut out = format!("Saved \"{}\" to {}", memory.title, memory.category);
            if let Some(path) = filepath {
                let _ = write!(out, " ({path})");
            }
            if !memory.tags.is_empty() {
                let _ = write!(out, "\nTags: {}", memory.tags);
            }
            out
        },
        CaptureOutcome::NeedsClarification(question) => format!("Cortex asks: {question}"),
        CaptureOutcome::AwaitingReview(draft) => {
            format!("Ready to save \"{}\" to {}", draft.title, draft.category)
        },
        CaptureOutcome::Failed(reason) => reason.clone(),
    }
}

/// Renders the filtered node list, marking the selection.
#[must_use]
pub fn render_node_list(nodes: &[&GraphNode], selected: Option<&MemoryId>) -> String {
    if nodes.is_empty() {
        return "No memories match.\n".to_string();
    }
    let mut out = String::new();
    for node in nodes {
        let marker = if Some(&node.id) == selected { ">" } else { " " };
        let _ = writeln!(out, "{marker} {:<12} {} [{}]", node.id.as_str(), node.name, node.group);
    }
    out
}

/// Renders the detail panel for one node.
#[must_use]
pub fn render_node_detail(node: &GraphNode) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}", node.name);
    let _ = writeln!(out, "Group:   {}", node.group);
    let _ = writeln!(out, "Color:   {}", node.color);
    let _ = writeln!(out, "Created: {}", node.created_display());
    if !node.tags.is_empty() {
        let _ = writeln!(out, "Tags:    {}", node.tags);
    }
    if !node.summary.trim().is_empty() {
        let _ = writeln!(out, "\n{}", node.summary.trim_end());
    }
    out
}

/// Renders the Graph view, optionally with the canvas.
#[must_use]
pub fn render_graph(view: &GraphView, show_canvas: bool) -> String {
    let mut out = String::from("== Graph ==\n");
    let data = view.data();
    let _ = writeln!(out, "{} memories, {} links", data.nodes.len(), data.links.len());
    if view.is_busy() {
        out.push_str("Loading...\n");
    }
    if !view.filter().is_empty() {
        let _ = writeln!(out, "Filter: {}", view.filter());
    }

    out.push('\n');
    out.push_str(&render_node_list(&view.visible_nodes(), view.selected()));

    if let Some(node) = view.selected_node() {
        out.push('\n');
        out.push_str(&render_node_detail(node));
    }
    if let Some(id) = view.pending_delete() {
        let name = data.node(id).map_or(id.as_str(), |n| n.name.as_str());
        let _ = writeln!(out, "\nDelete \"{name}\"? `confirm` or `cancel`.");
    }
    if show_canvas {
        let (width, height) = view.canvas_size();
        out.push('\n');
        out.push_str(&render_canvas(
            data,
            view.layout(),
            view.viewport(),
            view.selected(),
            width,
            height,
        ));
        out.push('\n');
    }
    out.push_str(&render_notices(view.notices()));
    out
}

/// Renders the Settings view.
#[must_use]
pub fn render_settings(view: &SettingsView) -> String {
    let mut out = String::from("== Settings ==\n");
    match view.config() {
        Some(config) => {
            let _ = writeln!(out, "Vault Location: {}", config.vault_path);
            let _ = writeln!(out, "Cortex Model:   {}", config.chat_model);
            if !config.available_models.is_empty() {
                let _ = writeln!(out, "Available:      {}", config.available_models.join(", "));
            }
        },
        None if view.load_state().is_pending() => out.push_str("Loading...\n"),
        None => out.push_str("Settings not loaded.\n"),
    }
    if let Some(action) = view.pending_action() {
        let _ = writeln!(out, "\n{} `confirm` or `cancel`.", action.prompt());
    }
    if view.is_busy() {
        out.push_str("Working...\n");
    }
    out.push_str(&render_notices(view.notices()));
    out
}

/// Renders the vault tree with indentation.
#[must_use]
pub fn render_tree(tree: &VaultTree) -> String {
    fn walk(out: &mut String, entries: &[VaultEntry], depth: usize) {
        for entry in entries {
            let suffix = match entry.kind {
                EntryKind::Folder => "/",
                EntryKind::File => "",
            };
            let _ = writeln!(out, "{}{}{suffix}", "  ".repeat(depth), entry.name);
            walk(out, &entry.children, depth + 1);
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{} ({} files)", tree.root, tree.file_count());
    walk(&mut out, &tree.structure, 1);
    out
}
