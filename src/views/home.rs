//! Capture workflow: analyze free text, clarify if needed, save.

use crate::client::CortexApi;
use crate::config::{CapturePolicy, UiSettings};
use crate::models::{Analysis, MemoryDraft, SaveReceipt, Tags};
use crate::state::{Notices, RequestState};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Where the capture form is in its workflow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CapturePhase {
    /// Waiting for input.
    #[default]
    Editing,
    /// Cortex asked a follow-up question.
    Clarifying {
        /// The question to answer.
        question: String,
    },
    /// A clear draft is waiting for confirmation.
    Review(MemoryDraft),
}

/// A saved memory shown in the recent-activity list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentMemory {
    /// Title.
    pub title: String,
    /// Category.
    pub category: String,
    /// Tags.
    pub tags: Tags,
    /// When it was saved.
    pub saved_at: DateTime<Utc>,
}

/// Capped recent-activity list, newest first.
#[derive(Debug, Clone)]
pub struct RecentMemories {
    items: VecDeque<RecentMemory>,
    limit: usize,
}

impl RecentMemories {
    /// Creates an empty list holding at most `limit` entries.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Adds an entry at the front, evicting the oldest past the cap.
    pub fn push(&mut self, memory: RecentMemory) {
        self.items.push_front(memory);
        self.items.truncate(self.limit);
    }

    /// Iterates newest first.
    pub fn iter(&self) -> impl Iterator<Item = &RecentMemory> {
        self.items.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The cap.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }
}

/// Result of a submit, answer or confirm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// The memory was saved and added to the recent list.
    Saved {
        /// The saved entry.
        memory: RecentMemory,
        /// Vault file reported by Cortex.
        filepath: Option<String>,
    },
    /// Cortex needs an answer first.
    NeedsClarification(String),
    /// A draft is waiting for `confirm_save` or `discard`.
    AwaitingReview(MemoryDraft),
    /// Analysis or save failed; the reason is also raised as a notice.
    Failed(String),
}

/// Home view state.
#[derive(Debug, Clone)]
pub struct HomeView {
    title: String,
    content: String,
    context: Option<String>,
    phase: CapturePhase,
    policy: CapturePolicy,
    analysis: RequestState<Analysis>,
    save: RequestState<SaveReceipt>,
    recent: RecentMemories,
    notices: Notices,
    notice_ttl: Duration,
}

impl Default for HomeView {
    fn default() -> Self {
        Self::new(&UiSettings::default())
    }
}

impl HomeView {
    /// Creates an idle view.
    #[must_use]
    pub fn new(ui: &UiSettings) -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            context: None,
            phase: CapturePhase::Editing,
            policy: ui.capture_policy,
            analysis: RequestState::Idle,
            save: RequestState::Idle,
            recent: RecentMemories::new(ui.recent_limit),
            notices: Notices::new(),
            notice_ttl: Duration::from_millis(ui.saved_notice_ms),
        }
    }

    /// Overrides the capture policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: CapturePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the title input.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Sets the content input.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Sets optional context sent alongside the text.
    pub fn set_context(&mut self, context: Option<String>) {
        self.context = context.filter(|c| !c.trim().is_empty());
    }

    /// Title input.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Content input.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &CapturePhase {
        &self.phase
    }

    /// Last analysis request.
    #[must_use]
    pub const fn analysis_state(&self) -> &RequestState<Analysis> {
        &self.analysis
    }

    /// Last save request.
    #[must_use]
    pub const fn save_state(&self) -> &RequestState<SaveReceipt> {
        &self.save
    }

    /// Recently saved memories.
    #[must_use]
    pub const fn recent(&self) -> &RecentMemories {
        &self.recent
    }

    /// Live notices.
    #[must_use]
    pub const fn notices(&self) -> &Notices {
        &self.notices
    }

    /// Mutable notices, for dismissal.
    pub const fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    /// Expires old notices.
    pub fn tick(&mut self, now: Instant) {
        self.notices.tick(now);
    }

    /// Returns `true` while analysis or save is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.analysis.is_pending() || self.save.is_pending()
    }

    /// Builds the text sent to `/analyze`, or `None` if both inputs are blank.
    #[must_use]
    pub fn compose_input(&self) -> Option<String> {
        let title = self.title.trim();
        let content = self.content.trim();
        if title.is_empty() && content.is_empty() {
            return None;
        }
        if title.is_empty() {
            Some(content.to_string())
        } else {
            Some(format!("Title: {title}\n\nContent: {content}"))
        }
    }

    /// Sends the form for analysis and acts on the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if both inputs are blank. Backend
    /// failures are reported through [`CaptureOutcome::Failed`].
    pub fn submit(&mut self, api: &dyn CortexApi) -> Result<CaptureOutcome> {
        let text = self
            .compose_input()
            .ok_or_else(|| Error::InvalidInput("nothing to capture".to_string()))?;

        self.analysis = RequestState::Pending;
        tracing::debug!(chars = text.len(), "Analyzing capture");
        let analysis = match api.analyze(&text, self.context.as_deref()) {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(error = %e, "Capture analysis failed");
                let reason = format!("Analysis failed: {e}");
                self.analysis = RequestState::Failed(e.to_string());
                self.notices.error(reason.clone());
                return Ok(CaptureOutcome::Failed(reason));
            },
        };
        self.analysis = RequestState::Succeeded(analysis.clone());

        match analysis {
            Analysis::NeedsClarification { question } => {
                self.phase = CapturePhase::Clarifying {
                    question: question.clone(),
                };
                Ok(CaptureOutcome::NeedsClarification(question))
            },
            Analysis::Clear(draft) => match self.policy {
                CapturePolicy::Auto => Ok(self.save_draft(api, draft)),
                CapturePolicy::Confirm => {
                    self.phase = CapturePhase::Review(draft.clone());
                    Ok(CaptureOutcome::AwaitingReview(draft))
                },
            },
        }
    }

    /// Appends ` ({answer})` to the content and re-runs analysis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no question is pending or the
    /// answer is blank.
    pub fn answer_clarification(
        &mut self,
        api: &dyn CortexApi,
        answer: &str,
    ) -> Result<CaptureOutcome> {
        if !matches!(self.phase, CapturePhase::Clarifying { .. }) {
            return Err(Error::InvalidInput(
                "no clarifying question to answer".to_string(),
            ));
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(Error::InvalidInput("answer is empty".to_string()));
        }

        self.content = format!("{} ({answer})", self.content);
        self.submit(api)
    }

    /// Saves the draft held for review.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no draft is awaiting review.
    pub fn confirm_save(&mut self, api: &dyn CortexApi) -> Result<CaptureOutcome> {
        let CapturePhase::Review(draft) = &self.phase else {
            return Err(Error::InvalidInput("no draft awaiting review".to_string()));
        };
        let draft = draft.clone();
        Ok(self.save_draft(api, draft))
    }

    /// Drops the pending clarifying question or the draft held for review,
    /// keeping the form for editing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the form is already being edited.
    pub fn discard(&mut self) -> Result<()> {
        if matches!(self.phase, CapturePhase::Editing) {
            return Err(Error::InvalidInput("nothing to discard".to_string()));
        }
        self.phase = CapturePhase::Editing;
        Ok(())
    }

    fn save_draft(&mut self, api: &dyn CortexApi, draft: MemoryDraft) -> CaptureOutcome {
        self.save = RequestState::Pending;
        match api.save_memory(&draft) {
            Ok(receipt) => {
                tracing::info!(title = %draft.title, category = %draft.category, "Memory saved");
                let memory = RecentMemory {
                    title: draft.title,
                    category: draft.category,
                    tags: draft.tags,
                    saved_at: Utc::now(),
                };
                self.notices.success(
                    format!("Saved \"{}\" to {}", memory.title, memory.category),
                    self.notice_ttl,
                    Instant::now(),
                );
                self.recent.push(memory.clone());
                self.title.clear();
                self.content.clear();
                self.context = None;
                self.phase = CapturePhase::Editing;
                let filepath = receipt.filepath.clone();
                self.save = RequestState::Succeeded(receipt);
                CaptureOutcome::Saved { memory, filepath }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Saving memory failed");
                let reason = format!("Save failed: {e}");
                self.save = RequestState::Failed(e.to_string());
                self.notices.error(reason.clone());
                // Keep the draft reviewable so nothing typed is lost.
                if self.policy == CapturePolicy::Confirm {
                    self.phase = CapturePhase::Review(draft);
                } else {
                    self.phase = CapturePhase::Editing;
                }
                CaptureOutcome::Failed(reason)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Call, Endpoint, InMemoryCortex};
    use test_case::test_case;

    #[test_case("", "", None; "both blank")]
    #[test_case("  ", "note", Some("note"); "content only")]
    #[test_case("Retro", "went well", Some("Title: Retro\n\nContent: went well"); "title and content")]
    fn test_compose_input(title: &str, content: &str, expected: Option<&str>) {
        let mut home = HomeView::default();
        home.set_title(title);
        home.set_content(content);
        assert_eq!(home.compose_input().as_deref(), expected);
    }

    #[test]
    fn test_blank_submit_makes_no_request() {
        let cortex = InMemoryCortex::new();
        let mut home = HomeView::default();

        assert!(matches!(home.submit(&cortex), Err(Error::InvalidInput(_))));
        assert!(cortex.calls().is_empty());
    }

    #[test]
    fn test_confirm_policy_holds_draft() {
        let cortex = InMemoryCortex::new();
        let mut home = HomeView::default().with_policy(CapturePolicy::Confirm);
        home.set_content("buy milk");

        let outcome = home.submit(&cortex).unwrap();
        assert!(matches!(outcome, CaptureOutcome::AwaitingReview(_)));
        assert_eq!(cortex.count(Endpoint::Save), 0);

        home.discard().unwrap();
        assert_eq!(home.phase(), &CapturePhase::Editing);
        assert_eq!(home.content(), "buy milk");

        home.submit(&cortex).unwrap();
        let outcome = home.confirm_save(&cortex).unwrap();
        assert!(matches!(outcome, CaptureOutcome::Saved { .. }));
        assert_eq!(cortex.count(Endpoint::Save), 1);
        assert!(home.content().is_empty());
    }

    #[test]
    fn test_analysis_failure_raises_persistent_notice() {
        let cortex = InMemoryCortex::new();
        cortex.fail_next(Endpoint::Analyze, 1);
        let mut home = HomeView::default();
        home.set_content("something");

        let outcome = home.submit(&cortex).unwrap();
        assert!(matches!(outcome, CaptureOutcome::Failed(_)));
        assert!(home.analysis_state().error().is_some());

        home.tick(Instant::now() + Duration::from_secs(600));
        assert_eq!(home.notices().len(), 1);
        assert_eq!(home.content(), "something");
    }

    #[test]
    fn test_blank_answer_rejected() {
        let cortex = InMemoryCortex::new();
        cortex.push_analysis(Analysis::clarify("Which project?"));
        let mut home = HomeView::default();
        home.set_content("the deadline moved");
        home.submit(&cortex).unwrap();

        assert!(home.answer_clarification(&cortex, "   ").is_err());
        assert_eq!(cortex.count(Endpoint::Analyze), 1);
        assert_eq!(
            cortex.calls()[0],
            Call::Analyze {
                text: "the deadline moved".to_string(),
                context: None
            }
        );
    }
}
