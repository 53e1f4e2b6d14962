//! Question answering results from `/ask`.

use serde::{Deserialize, Serialize};

/// An answer with the memories it was grounded on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Answer {
    /// Free-text (Markdown) answer.
    #[serde(default)]
    pub answer: String,
    /// Cited memories, most relevant first.
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// A cited memory.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Source {
    /// Memory title.
    #[serde(default)]
    pub title: Option<String>,
    /// Vault filename, used when the title is missing.
    #[serde(default)]
    pub filename: Option<String>,
    /// Category.
    #[serde(default)]
    pub category: Option<String>,
    /// Excerpt of the memory body.
    #[serde(default)]
    pub snippet: Option<String>,
}

impl Source {
    /// Title, falling back to the filename.
    #[must_use]
    pub fn display_title(&self) -> &str {
        non_empty(self.title.as_deref())
            .or_else(|| non_empty(self.filename.as_deref()))
            .unwrap_or("Untitled")
    }

    /// Category, falling back to `Note`.
    #[must_use]
    pub fn display_category(&self) -> &str {
        non_empty(self.category.as_deref()).unwrap_or("Note")
    }

    /// Snippet cut to `max_chars` characters, with `...` appended when cut.
    #[must_use]
    pub fn snippet_preview(&self, max_chars: usize) -> String {
        let snippet = self.snippet.as_deref().unwrap_or_default().trim();
        if snippet.chars().count() <= max_chars {
            return snippet.to_string();
        }
        let cut: String = snippet.chars().take(max_chars).collect();
        format!("{}...", cut.trim_end())
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_fallbacks() {
        let source = Source {
            filename: Some("2024-05-01-retro.md".to_string()),
            ..Source::default()
        };
        assert_eq!(source.display_title(), "2024-05-01-retro.md");
        assert_eq!(source.display_category(), "Note");

        assert_eq!(Source::default().display_title(), "Untitled");
    }

    #[test]
    fn test_snippet_preview_truncates_on_char_boundary() {
        let source = Source {
            snippet: Some("é".repeat(10)),
            ..Source::default()
        };
        assert_eq!(source.snippet_preview(4), "éééé...");
        assert_eq!(source.snippet_preview(10), "é".repeat(10));
    }
}
