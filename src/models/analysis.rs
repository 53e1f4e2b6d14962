//! Analysis results from `/analyze`.

use super::{MemoryDraft, Tags};
use serde::Deserialize;

/// Question shown when Cortex reports ambiguity without asking anything.
pub const DEFAULT_CLARIFYING_QUESTION: &str = "Could you add more context?";

/// Outcome of analyzing captured text.
///
/// Cortex answers with a flat object carrying an `is_clear` flag; only the
/// fields relevant to that flag are meaningful, so the wire shape is folded
/// into a sum type on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "AnalysisWire")]
pub enum Analysis {
    /// The text is unambiguous and describes a memory ready to persist.
    Clear(MemoryDraft),
    /// The text is ambiguous; Cortex needs an answer before it can persist.
    NeedsClarification {
        /// The follow-up question.
        question: String,
    },
}

impl Analysis {
    /// Creates a clear analysis.
    #[must_use]
    pub const fn clear(draft: MemoryDraft) -> Self {
        Self::Clear(draft)
    }

    /// Creates a clarification request.
    #[must_use]
    pub fn clarify(question: impl Into<String>) -> Self {
        Self::NeedsClarification {
            question: question.into(),
        }
    }

    /// Returns `true` if the analysis produced a memory.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        matches!(self, Self::Clear(_))
    }
}

#[derive(Deserialize)]
struct AnalysisWire {
    #[serde(default)]
    is_clear: bool,
    title: Option<String>,
    category: Option<String>,
    #[serde(default)]
    tags: Tags,
    summary: Option<String>,
    clarifying_question: Option<String>,
    original_text: Option<String>,
}

impl From<AnalysisWire> for Analysis {
    fn from(wire: AnalysisWire) -> Self {
        if !wire.is_clear {
            let question = wire
                .clarifying_question
                .filter(|q| !q.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CLARIFYING_QUESTION.to_string());
            return Self::NeedsClarification { question };
        }

        Self::Clear(MemoryDraft {
            title: wire.title.unwrap_or_else(|| "Untitled".to_string()),
            category: wire.category.unwrap_or_else(|| "Inbox".to_string()),
            tags: wire.tags,
            summary: wire.summary.unwrap_or_default(),
            original_text: wire.original_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_analysis_decodes_draft() {
        let json = r##"{
            "is_clear": true,
            "title": "Release train",
            "category": "Work/Planning",
            "tags": ["release", "planning"],
            "summary": "# Release\nWeekly cadence",
            "original_text": "release every week"
        }"##;
        let analysis: Analysis = serde_json::from_str(json).unwrap();

        let Analysis::Clear(draft) = analysis else {
            panic!("expected clear analysis");
        };
        assert_eq!(draft.title, "Release train");
        assert_eq!(draft.tags.as_slice(), ["release", "planning"]);
        assert_eq!(draft.original_text.as_deref(), Some("release every week"));
    }

    #[test]
    fn test_unclear_analysis_keeps_only_question() {
        let json = r#"{
            "is_clear": false,
            "clarifying_question": "Which project is this for?",
            "title": "ignored"
        }"#;
        let analysis: Analysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis, Analysis::clarify("Which project is this for?"));
    }

    #[test]
    fn test_missing_question_falls_back() {
        let analysis: Analysis = serde_json::from_str(r#"{"is_clear": false}"#).unwrap();
        assert_eq!(analysis, Analysis::clarify(DEFAULT_CLARIFYING_QUESTION));
        assert!(!analysis.is_clear());
    }
}
