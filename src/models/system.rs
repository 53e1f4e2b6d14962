//! Receipts and maintenance reports.

use super::MemoryId;
use serde::{Deserialize, Serialize};

/// Response to `POST /save`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaveReceipt {
    /// Backend status string.
    #[serde(default)]
    pub status: String,
    /// Vault file the memory was written to.
    #[serde(default)]
    pub filepath: Option<String>,
}

/// Response to `DELETE /delete/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeleteReceipt {
    /// Backend status string.
    #[serde(default)]
    pub status: String,
    /// The deleted memory.
    #[serde(default)]
    pub id: Option<MemoryId>,
}

/// Response to `PUT /update/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpdateReceipt {
    /// Backend status string.
    #[serde(default)]
    pub status: String,
}

/// Response to `POST /reindex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReindexReport {
    /// Memories re-embedded.
    #[serde(default)]
    pub updated: u64,
    /// Stale index entries removed.
    #[serde(default)]
    pub pruned: u64,
}

/// Response to `POST /reset`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResetReport {
    /// Backend status string.
    #[serde(default)]
    pub status: String,
    /// Vault files removed.
    #[serde(default)]
    pub deleted_files: u64,
}

/// Vault directory listing from `GET /tree`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VaultTree {
    /// Absolute vault root on the backend host.
    #[serde(default)]
    pub root: String,
    /// Top-level entries, folders first.
    #[serde(default)]
    pub structure: Vec<VaultEntry>,
}

impl VaultTree {
    /// Counts files in the whole tree.
    #[must_use]
    pub fn file_count(&self) -> usize {
        fn count(entries: &[VaultEntry]) -> usize {
            entries
                .iter()
                .map(|e| match e.kind {
                    EntryKind::File => 1,
                    EntryKind::Folder => count(&e.children),
                })
                .sum()
        }
        count(&self.structure)
    }
}

/// A file or folder in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultEntry {
    /// Entry name.
    pub name: String,
    /// Path relative to the vault root.
    #[serde(default)]
    pub path: String,
    /// Folder or file.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Child entries (folders only).
    #[serde(default)]
    pub children: Vec<VaultEntry>,
}

/// Kind of vault entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Directory.
    Folder,
    /// Regular file.
    File,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_decodes_and_counts_files() {
        let json = r#"{
            "root": "/vault",
            "structure": [
                {"name": "Work", "path": "Work", "type": "folder", "children": [
                    {"name": "a.md", "path": "Work/a.md", "type": "file"},
                    {"name": "b.md", "path": "Work/b.md", "type": "file"}
                ]},
                {"name": "inbox.md", "path": "inbox.md", "type": "file"}
            ]
        }"#;
        let tree: VaultTree = serde_json::from_str(json).unwrap();
        assert_eq!(tree.file_count(), 3);
        assert_eq!(tree.structure[0].kind, EntryKind::Folder);
    }

    #[test]
    fn test_reindex_report_tolerates_extra_fields() {
        let report: ReindexReport =
            serde_json::from_str(r#"{"status": "success", "updated": 12, "pruned": 1}"#).unwrap();
        assert_eq!(report.updated, 12);
        assert_eq!(report.pruned, 1);
    }
}
