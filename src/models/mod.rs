//! Data models for engram.
//!
//! Every type here mirrors a Cortex JSON payload. They are transient view
//! models: created by a fetch, replaced by the next one, never cached across
//! views.

mod analysis;
mod graph;
mod memory;
mod search;
mod settings;
mod system;
mod tags;

pub use analysis::{Analysis, DEFAULT_CLARIFYING_QUESTION};
pub use graph::{DEFAULT_GROUP, DEFAULT_NODE_COLOR, GraphData, GraphLink, GraphNode};
pub use memory::{MemoryDraft, MemoryId};
pub use search::{Answer, Source};
pub use settings::{BackendConfig, ConfigField, ConfigUpdateReceipt};
pub use system::{
    DeleteReceipt, EntryKind, ReindexReport, ResetReport, SaveReceipt, UpdateReceipt, VaultEntry,
    VaultTree,
};
pub use tags::{Tags, parse_tag_string};
