//! Semantic question answering over stored memories.

use crate::client::CortexApi;
use crate::models::Answer;
use crate::state::{RequestSequencer, RequestState, Ticket};
use crate::{Error, Result};

/// Banner shown for any failed search.
pub const RECALL_ERROR: &str = "Unable to retrieve information. Cortex may be offline.";

/// Recall view state.
#[derive(Debug, Clone, Default)]
pub struct RecallView {
    query: String,
    state: RequestState<Answer>,
    sequencer: RequestSequencer,
}

impl RecallView {
    /// Creates an idle view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the query input.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Query input.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Current search state.
    #[must_use]
    pub const fn state(&self) -> &RequestState<Answer> {
        &self.state
    }

    /// The last answer, if the last search succeeded.
    #[must_use]
    pub const fn answer(&self) -> Option<&Answer> {
        self.state.value()
    }

    /// Error banner text when the last search failed.
    #[must_use]
    pub const fn banner(&self) -> Option<&'static str> {
        match self.state {
            RequestState::Failed(_) => Some(RECALL_ERROR),
            _ => None,
        }
    }

    /// Marks a search as in flight and returns its ticket and query.
    ///
    /// Any search begun earlier becomes stale.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the query is blank.
    pub fn begin_search(&mut self) -> Result<(Ticket, String)> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("query is empty".to_string()));
        }
        let query = query.to_string();
        self.state = RequestState::Pending;
        Ok((self.sequencer.begin(), query))
    }

    /// Applies a search response if `ticket` is still current.
    ///
    /// Returns `false` when the response was stale and discarded.
    pub fn complete_search(&mut self, ticket: Ticket, result: Result<Answer>) -> bool {
        let Some(result) = self.sequencer.complete(ticket, result) else {
            return false;
        };
        self.state = match result {
            Ok(answer) => {
                tracing::debug!(sources = answer.sources.len(), "Recall answered");
                RequestState::Succeeded(answer)
            },
            Err(e) => {
                tracing::warn!(error = %e, "Recall failed");
                RequestState::Failed(RECALL_ERROR.to_string())
            },
        };
        true
    }

    /// Runs a search to completion.
    ///
    /// Backend failures end in the failed state with [`RECALL_ERROR`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the query is blank; no request is
    /// made in that case.
    pub fn search(&mut self, api: &dyn CortexApi) -> Result<()> {
        let (ticket, query) = self.begin_search()?;
        let result = api.ask(&query);
        self.complete_search(ticket, result);
        Ok(())
    }
}
