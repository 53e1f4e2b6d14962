//! Memory identifiers and save payloads.

use super::Tags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a memory, as assigned by Cortex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryId(String);

impl MemoryId {
    /// Creates a new memory ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MemoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MemoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An analyzed memory ready to be persisted via `/save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDraft {
    /// Short title.
    pub title: String,
    /// Category path, e.g. `Work/Meetings`.
    pub category: String,
    /// Tags inferred by Cortex.
    #[serde(default)]
    pub tags: Tags,
    /// Markdown summary.
    #[serde(default)]
    pub summary: String,
    /// The text that was analyzed, echoed back by Cortex.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

impl MemoryDraft {
    /// Creates a draft with the given title and category.
    #[must_use]
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            tags: Tags::default(),
            summary: String::new(),
            original_text: None,
        }
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// Sets the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_serialization_skips_missing_original_text() {
        let draft = MemoryDraft::new("Standup", "Work/Meetings")
            .with_tags(Tags::new(["standup"]))
            .with_summary("# Standup");
        let value = serde_json::to_value(&draft).unwrap();

        assert_eq!(value["title"], "Standup");
        assert_eq!(value["tags"][0], "standup");
        assert!(value.get("original_text").is_none());
    }

    #[test]
    fn test_memory_id_display() {
        let id = MemoryId::from("note-1");
        assert_eq!(id.to_string(), "note-1");
        assert_eq!(id.as_str(), "note-1");
    }
}
