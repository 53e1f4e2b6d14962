//! Knowledge graph nodes and links from `/graph`.

use super::{MemoryId, Tags};
use serde::{Deserialize, Serialize};

/// Group assigned to nodes Cortex did not categorize.
pub const DEFAULT_GROUP: &str = "Inbox";

/// Fill color for nodes without one (slate).
pub const DEFAULT_NODE_COLOR: &str = "#334155";

/// A memory as seen by the graph explorer.
///
/// Layout coordinates are not part of the node; they live in
/// [`crate::layout::Layout`], keyed by node id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NodeWire")]
pub struct GraphNode {
    /// Memory identifier.
    pub id: MemoryId,
    /// Display name (memory title).
    pub name: String,
    /// Markdown summary.
    pub summary: String,
    /// Category the node is grouped under.
    pub group: String,
    /// Parsed tags.
    pub tags: Tags,
    /// Fill color (CSS hex).
    pub color: String,
    /// Creation timestamp as reported by Cortex.
    pub created: String,
    /// Relative node weight.
    pub val: f64,
}

impl GraphNode {
    /// Creates a node with default presentation fields.
    #[must_use]
    pub fn new(id: impl Into<MemoryId>, name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            summary: String::new(),
            group: group.into(),
            tags: Tags::default(),
            color: DEFAULT_NODE_COLOR.to_string(),
            created: "Unknown".to_string(),
            val: 1.0,
        }
    }

    /// Sets the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Returns `true` if `needle` appears in the name or group, ignoring case.
    ///
    /// An empty needle matches every node. Whitespace is matched literally.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&needle) || self.group.to_lowercase().contains(&needle)
    }

    /// Formats the creation timestamp for display.
    ///
    /// RFC 3339 and `YYYY-MM-DD HH:MM:SS` timestamps are normalized; anything
    /// else is returned as-is.
    #[must_use]
    pub fn created_display(&self) -> String {
        if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(&self.created) {
            return ts.format("%Y-%m-%d %H:%M").to_string();
        }
        if let Ok(ts) = chrono::NaiveDateTime::parse_from_str(&self.created, "%Y-%m-%d %H:%M:%S") {
            return ts.format("%Y-%m-%d %H:%M").to_string();
        }
        self.created.clone()
    }
}

#[derive(Deserialize)]
struct NodeWire {
    id: MemoryId,
    name: Option<String>,
    #[serde(default)]
    summary: String,
    group: Option<String>,
    #[serde(default)]
    tags: Tags,
    color: Option<String>,
    created: Option<String>,
    val: Option<f64>,
}

impl From<NodeWire> for GraphNode {
    fn from(wire: NodeWire) -> Self {
        Self {
            name: wire
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| wire.id.to_string()),
            id: wire.id,
            summary: wire.summary,
            group: wire.group.unwrap_or_else(|| DEFAULT_GROUP.to_string()),
            tags: wire.tags,
            color: wire.color.unwrap_or_else(|| DEFAULT_NODE_COLOR.to_string()),
            created: wire.created.unwrap_or_else(|| "Unknown".to_string()),
            val: wire.val.unwrap_or(1.0),
        }
    }
}

/// A derived relationship between two memories.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphLink {
    /// Source node id.
    pub source: MemoryId,
    /// Target node id.
    pub target: MemoryId,
}

impl GraphLink {
    /// Creates a link.
    #[must_use]
    pub fn new(source: impl Into<MemoryId>, target: impl Into<MemoryId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// The full node/link set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphData {
    /// Memories.
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    /// Relationships.
    #[serde(default)]
    pub links: Vec<GraphLink>,
}

impl GraphData {
    /// Creates graph data from nodes and links.
    #[must_use]
    pub const fn new(nodes: Vec<GraphNode>, links: Vec<GraphLink>) -> Self {
        Self { nodes, links }
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: &MemoryId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Returns nodes whose name or group contains `needle`, ignoring case.
    #[must_use]
    pub fn filter(&self, needle: &str) -> Vec<&GraphNode> {
        self.nodes.iter().filter(|n| n.matches(needle)).collect()
    }

    /// Returns `true` if there are no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
