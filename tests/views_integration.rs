//! View workflow integration tests.
//!
//! Drives each view against `InMemoryCortex` and checks the request log:
//! - Home: clarification loop, auto-save, recent list
//! - Recall: blank queries, offline banner, stale responses
//! - Graph: filter, delete confirmation, refetch after delete
//! - Settings: optimistic edit and revert on failure
//! - Shell: fresh view on every navigation

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use engram::client::{Call, Endpoint, InMemoryCortex};
use engram::config::{CapturePolicy, EngramConfig, UiSettings};
use engram::models::{
    Analysis, Answer, BackendConfig, ConfigField, GraphData, GraphLink, GraphNode, MemoryDraft,
    MemoryId, Tags,
};
use engram::state::{NoticeKind, RequestState};
use engram::views::{
    CaptureOutcome, CapturePhase, GraphView, HomeView, RECALL_ERROR, RecallView, SettingsView,
};
use engram::{Shell, View};
use std::time::{Duration, Instant};

fn draft(title: &str) -> MemoryDraft {
    MemoryDraft::new(title, "Inbox").with_tags(Tags::new(["misc"]))
}

fn seeded_graph() -> InMemoryCortex {
    InMemoryCortex::new().with_graph(GraphData::new(
        vec![
            GraphNode::new("retro", "Sprint Retro", "Work/Meetings"),
            GraphNode::new("bug", "Login bug", "Work/Tickets"),
            GraphNode::new("milk", "Groceries", "Personal"),
        ],
        vec![GraphLink::new("retro", "bug")],
    ))
}

// ============================================================================
// Home
// ============================================================================

mod home {
    use super::*;

    #[test]
    fn test_blank_capture_sends_nothing() {
        let cortex = InMemoryCortex::new();
        let mut home = HomeView::default();
        home.set_title("   ");
        home.set_content("\n\t");

        assert!(home.submit(&cortex).is_err());
        assert!(cortex.calls().is_empty());
    }

    #[test]
    fn test_title_and_content_are_combined() {
        let cortex = InMemoryCortex::new();
        let mut home = HomeView::default();
        home.set_title("Groceries");
        home.set_content("milk, eggs");
        home.submit(&cortex).unwrap();

        assert_eq!(
            cortex.calls()[0],
            Call::Analyze {
                text: "Title: Groceries\n\nContent: milk, eggs".to_string(),
                context: None,
            }
        );
    }

    #[test]
    fn test_clarification_appends_answer_and_saves() {
        let cortex = InMemoryCortex::new();
        cortex.push_analysis(Analysis::clarify("Is this for work?"));
        cortex.push_analysis(Analysis::clear(draft("Expense report")));

        let mut home = HomeView::default();
        home.set_content("file the receipts");
        let first = home.submit(&cortex).unwrap();
        assert_eq!(first, CaptureOutcome::NeedsClarification("Is this for work?".to_string()));
        assert!(matches!(home.phase(), CapturePhase::Clarifying { .. }));

        let second = home.answer_clarification(&cortex, "yes").unwrap();
        assert!(matches!(second, CaptureOutcome::Saved { .. }));

        let analyzed: Vec<String> = cortex
            .calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Analyze { text, .. } => Some(text),
                _ => None,
            })
            .collect();
        assert_eq!(analyzed, ["file the receipts", "file the receipts (yes)"]);
        assert_eq!(cortex.count(Endpoint::Save), 1);
        assert!(home.content().is_empty());
    }

    #[test]
    fn test_discard_dismisses_clarifying_question() {
        let cortex = InMemoryCortex::new();
        cortex.push_analysis(Analysis::clarify("Which project?"));
        let mut home = HomeView::default();
        home.set_content("move the standup");
        home.submit(&cortex).unwrap();
        cortex.clear_calls();

        home.discard().unwrap();

        assert_eq!(home.phase(), &CapturePhase::Editing);
        assert_eq!(home.content(), "move the standup");
        assert!(home.answer_clarification(&cortex, "apollo").is_err());
        assert!(home.discard().is_err());
        assert!(cortex.calls().is_empty());
    }

    #[test]
    fn test_recent_list_keeps_newest_three() {
        let cortex = InMemoryCortex::new();
        let mut home = HomeView::default();
        for title in ["one", "two", "three", "four"] {
            cortex.push_analysis(Analysis::clear(draft(title)));
            home.set_content(title);
            home.submit(&cortex).unwrap();
        }

        let titles: Vec<&str> = home.recent().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["four", "three", "two"]);
    }

    #[test]
    fn test_failed_analysis_keeps_form() {
        let cortex = InMemoryCortex::new();
        cortex.set_offline(true);
        let mut home = HomeView::default();
        home.set_content("remember this");

        let outcome = home.submit(&cortex).unwrap();
        assert!(matches!(outcome, CaptureOutcome::Failed(_)));
        assert_eq!(home.content(), "remember this");
        assert_eq!(home.notices().latest().unwrap().kind, NoticeKind::Error);
        assert_eq!(cortex.count(Endpoint::Save), 0);
    }

    #[test]
    fn test_confirm_policy_waits_for_review() {
        let cortex = InMemoryCortex::new();
        cortex.push_analysis(Analysis::clear(draft("Dentist")));
        let mut home = HomeView::new(&UiSettings::default()).with_policy(CapturePolicy::Confirm);
        home.set_content("call the dentist");

        let outcome = home.submit(&cortex).unwrap();
        assert!(matches!(outcome, CaptureOutcome::AwaitingReview(_)));
        assert_eq!(cortex.count(Endpoint::Save), 0);

        home.confirm_save(&cortex).unwrap();
        assert_eq!(cortex.count(Endpoint::Save), 1);
        assert_eq!(home.recent().len(), 1);
    }

    #[test]
    fn test_saved_notice_expires_after_ttl() {
        let cortex = InMemoryCortex::new();
        let mut home = HomeView::default();
        home.set_content("note");
        home.submit(&cortex).unwrap();

        home.tick(Instant::now());
        assert_eq!(home.notices().len(), 1);
        home.tick(Instant::now() + Duration::from_secs(3));
        assert!(home.notices().is_empty());
    }
}

// ============================================================================
// Recall
// ============================================================================

mod recall {
    use super::*;

    #[test]
    fn test_blank_query_sends_nothing() {
        let cortex = InMemoryCortex::new();
        let mut recall = RecallView::new();
        recall.set_query("  ");

        assert!(recall.search(&cortex).is_err());
        assert_eq!(cortex.count(Endpoint::Ask), 0);
    }

    #[test]
    fn test_offline_shows_banner() {
        let cortex = InMemoryCortex::new();
        cortex.set_offline(true);
        let mut recall = RecallView::new();
        recall.set_query("what did we decide?");
        recall.search(&cortex).unwrap();

        assert_eq!(recall.banner(), Some(RECALL_ERROR));
        assert!(recall.answer().is_none());
    }

    #[test]
    fn test_only_latest_response_is_shown() {
        let mut recall = RecallView::new();
        recall.set_query("first");
        let (old, _) = recall.begin_search().unwrap();
        recall.set_query("second");
        let (new, query) = recall.begin_search().unwrap();
        assert_eq!(query, "second");

        let fresh = Answer {
            answer: "fresh".to_string(),
            sources: Vec::new(),
        };
        let stale = Answer {
            answer: "stale".to_string(),
            sources: Vec::new(),
        };
        assert!(recall.complete_search(new, Ok(fresh)));
        assert!(!recall.complete_search(old, Ok(stale)));
        assert_eq!(recall.answer().unwrap().answer, "fresh");
    }
}

// ============================================================================
// Graph
// ============================================================================

mod graph {
    use super::*;

    #[test]
    fn test_filter_matches_name_or_group() {
        let cortex = seeded_graph();
        let mut graph = GraphView::default();
        graph.refresh(&cortex);

        graph.set_filter("WORK");
        let ids: Vec<&str> = graph.visible_nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["retro", "bug"]);

        graph.set_filter("grocer");
        assert_eq!(graph.visible_nodes().len(), 1);

        graph.set_filter("");
        assert_eq!(graph.visible_nodes().len(), 3);

        graph.set_filter("  ");
        assert!(graph.visible_nodes().is_empty());
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let cortex = seeded_graph();
        let mut graph = GraphView::default();
        graph.refresh(&cortex);
        graph.select(&MemoryId::from("bug")).unwrap();
        graph.request_delete().unwrap();
        graph.cancel_delete();

        assert_eq!(cortex.count(Endpoint::Delete), 0);
        assert_eq!(graph.selected(), Some(&MemoryId::from("bug")));
    }

    #[test]
    fn test_confirmed_delete_refetches_once() {
        let cortex = seeded_graph();
        let mut graph = GraphView::default();
        graph.refresh(&cortex);
        cortex.clear_calls();

        graph.select(&MemoryId::from("bug")).unwrap();
        graph.request_delete().unwrap();
        graph.confirm_delete(&cortex).unwrap();

        assert_eq!(cortex.calls(), [Call::Delete(MemoryId::from("bug")), Call::Graph]);
        assert!(graph.selected().is_none());
        assert_eq!(graph.data().nodes.len(), 2);
        assert!(graph.data().links.is_empty());
        assert_eq!(graph.notices().latest().unwrap().message, "Memory deleted.");
    }

    #[test]
    fn test_failed_refresh_keeps_previous_data() {
        let cortex = seeded_graph();
        let mut graph = GraphView::default();
        graph.refresh(&cortex);
        cortex.fail_next(Endpoint::Graph, 1);
        graph.refresh(&cortex);

        assert_eq!(graph.data().nodes.len(), 3);
        assert!(matches!(graph.fetch_state(), RequestState::Failed(_)));
        assert_eq!(graph.layout().len(), 3);
    }
}

// ============================================================================
// Settings
// ============================================================================

mod settings {
    use super::*;

    fn cortex() -> InMemoryCortex {
        InMemoryCortex::new().with_config(BackendConfig {
            vault_path: "/home/me/vault".to_string(),
            chat_model: "llama3.1:8b".to_string(),
            available_models: vec!["llama3.1:8b".to_string(), "mistral".to_string()],
        })
    }

    #[test]
    fn test_update_before_load_is_rejected() {
        let cortex = cortex();
        let mut settings = SettingsView::default();
        assert!(settings.update_field(&cortex, ConfigField::ChatModel, "mistral").is_err());
        assert!(cortex.calls().is_empty());
    }

    #[test]
    fn test_failed_update_reverts_to_server_value() {
        let cortex = cortex();
        let mut settings = SettingsView::default();
        settings.load(&cortex);
        cortex.fail_next(Endpoint::SetConfig, 1);

        settings
            .update_field(&cortex, ConfigField::VaultPath, "/tmp/elsewhere")
            .unwrap();

        assert_eq!(settings.config().unwrap().vault_path, "/home/me/vault");
        assert_eq!(cortex.count(Endpoint::GetConfig), 2);
        assert_eq!(settings.notices().latest().unwrap().kind, NoticeKind::Error);
    }

    #[test]
    fn test_revert_survives_failed_refetch() {
        let cortex = cortex();
        let mut settings = SettingsView::default();
        settings.load(&cortex);
        cortex.fail_next(Endpoint::SetConfig, 1);
        cortex.fail_next(Endpoint::GetConfig, 1);

        settings
            .update_field(&cortex, ConfigField::VaultPath, "/tmp/elsewhere")
            .unwrap();

        assert_eq!(settings.config().unwrap().vault_path, "/home/me/vault");
        assert_eq!(cortex.config_snapshot().vault_path, "/home/me/vault");
        assert_eq!(cortex.count(Endpoint::GetConfig), 2);
        assert!(matches!(settings.update_state(), RequestState::Failed(_)));
    }

    #[test]
    fn test_successful_update_keeps_new_value() {
        let cortex = cortex();
        let mut settings = SettingsView::default();
        settings.load(&cortex);
        settings
            .update_field(&cortex, ConfigField::VaultPath, "/tmp/elsewhere")
            .unwrap();

        assert_eq!(settings.config().unwrap().vault_path, "/tmp/elsewhere");
        assert_eq!(cortex.config_snapshot().vault_path, "/tmp/elsewhere");
        assert_eq!(cortex.count(Endpoint::GetConfig), 1);
    }
}

// ============================================================================
// Shell
// ============================================================================

mod shell {
    use super::*;

    #[test]
    fn test_view_state_does_not_survive_navigation() {
        let cortex = seeded_graph();
        let mut shell = Shell::new(&cortex, EngramConfig::default());

        shell.execute(":graph").unwrap();
        shell.execute("select retro").unwrap();
        shell.execute(":recall").unwrap();
        shell.execute(":graph").unwrap();

        assert_eq!(shell.active(), View::Graph);
        assert!(!shell.render().contains("# Sprint Retro"));
        assert_eq!(cortex.count(Endpoint::Graph), 2);
    }
}
