//! Scripted in-process Cortex backend.
//!
//! Keeps a graph, a config and queues of canned analysis/answer responses,
//! records every call in order, and can be told to fail specific endpoints.
//! Used by the test suites and for exercising the views without a backend.

use super::{CortexApi, Endpoint};
use crate::models::{
    Analysis, Answer, BackendConfig, ConfigField, ConfigUpdateReceipt, DeleteReceipt, GraphData,
    GraphNode, MemoryDraft, MemoryId, ReindexReport, ResetReport, SaveReceipt, UpdateReceipt,
    VaultTree,
};
use crate::{Error, Result};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `POST /save`
    Save(MemoryDraft),
    /// `DELETE /delete/{id}`
    Delete(MemoryId),
    /// `PUT /update/{id}`
    Update {
        /// Target memory.
        id: MemoryId,
        /// New content.
        content: String,
    },
    /// `POST /reindex`
    Reindex,
    /// `GET /graph`
    Graph,
    /// `POST /analyze`
    Analyze {
        /// Text sent for analysis.
        text: String,
        /// Optional context.
        context: Option<String>,
    },
    /// `POST /ask`
    Ask(String),
    /// `GET /config`
    GetConfig,
    /// `POST /config`
    SetConfig {
        /// Updated key.
        field: ConfigField,
        /// New value.
        value: String,
    },
    /// `POST /reset`
    Reset,
    /// `GET /tree`
    Tree,
}

impl Call {
    /// The endpoint this call hit.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        match self {
            Self::Save(_) => Endpoint::Save,
            Self::Delete(_) => Endpoint::Delete,
            Self::Update { .. } => Endpoint::Update,
            Self::Reindex => Endpoint::Reindex,
            Self::Graph => Endpoint::Graph,
            Self::Analyze { .. } => Endpoint::Analyze,
            Self::Ask(_) => Endpoint::Ask,
            Self::GetConfig => Endpoint::GetConfig,
            Self::SetConfig { .. } => Endpoint::SetConfig,
            Self::Reset => Endpoint::Reset,
            Self::Tree => Endpoint::Tree,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    graph: GraphData,
    config: BackendConfig,
    tree: VaultTree,
    analyses: VecDeque<Analysis>,
    answers: VecDeque<Answer>,
    failures: HashMap<Endpoint, usize>,
    offline: bool,
    calls: Vec<Call>,
    next_id: u64,
}

/// In-process [`CortexApi`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryCortex {
    state: Mutex<State>,
}

impl InMemoryCortex {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the graph.
    #[must_use]
    pub fn with_graph(self, graph: GraphData) -> Self {
        self.lock().graph = graph;
        self
    }

    /// Seeds the backend config.
    #[must_use]
    pub fn with_config(self, config: BackendConfig) -> Self {
        self.lock().config = config;
        self
    }

    /// Seeds the vault tree.
    #[must_use]
    pub fn with_tree(self, tree: VaultTree) -> Self {
        self.lock().tree = tree;
        self
    }

    /// Queues the response for the next `/analyze` call.
    ///
    /// With nothing queued, analysis treats the text as clear and derives a
    /// draft from its first line.
    pub fn push_analysis(&self, analysis: Analysis) {
        self.lock().analyses.push_back(analysis);
    }

    /// Queues the response for the next `/ask` call.
    pub fn push_answer(&self, answer: Answer) {
        self.lock().answers.push_back(answer);
    }

    /// Makes the next `times` calls to `endpoint` fail with a 500.
    pub fn fail_next(&self, endpoint: Endpoint, times: usize) {
        *self.lock().failures.entry(endpoint).or_insert(0) += times;
    }

    /// Simulates the backend going offline (or coming back).
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    /// Returns every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Counts recorded calls to `endpoint`.
    #[must_use]
    pub fn count(&self, endpoint: Endpoint) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.endpoint() == endpoint)
            .count()
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Returns the current server-side graph.
    #[must_use]
    pub fn graph_snapshot(&self) -> GraphData {
        self.lock().graph.clone()
    }

    /// Returns the current server-side config.
    #[must_use]
    pub fn config_snapshot(&self) -> BackendConfig {
        self.lock().config.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the call and applies failure injection.
    fn record(&self, call: Call) -> Result<MutexGuard<'_, State>> {
        let endpoint = call.endpoint();
        let mut state = self.lock();
        state.calls.push(call);

        if state.offline {
            return Err(Error::Unreachable {
                operation: endpoint.name().to_string(),
                cause: "connect error: connection refused".to_string(),
            });
        }
        if let Some(remaining) = state.failures.get_mut(&endpoint) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Error::Status {
                    operation: endpoint.name().to_string(),
                    status: 500,
                    body: "injected failure".to_string(),
                });
            }
        }
        Ok(state)
    }
}

impl CortexApi for InMemoryCortex {
    fn save_memory(&self, draft: &MemoryDraft) -> Result<SaveReceipt> {
        let mut state = self.record(Call::Save(draft.clone()))?;
        state.next_id += 1;
        let id = format!("mem-{}", state.next_id);
        let node = GraphNode::new(id.as_str(), draft.title.as_str(), draft.category.as_str())
            .with_tags(draft.tags.clone())
            .with_summary(draft.summary.clone());
        state.graph.nodes.push(node);

        Ok(SaveReceipt {
            status: "success".to_string(),
            filepath: Some(format!("{}/{id}.md", draft.category)),
        })
    }

    fn delete_memory(&self, id: &MemoryId) -> Result<DeleteReceipt> {
        let mut state = self.record(Call::Delete(id.clone()))?;
        let before = state.graph.nodes.len();
        state.graph.nodes.retain(|n| &n.id != id);
        if state.graph.nodes.len() == before {
            return Err(Error::Status {
                operation: Endpoint::Delete.name().to_string(),
                status: 500,
                body: format!("memory '{id}' not found"),
            });
        }
        state
            .graph
            .links
            .retain(|l| &l.source != id && &l.target != id);

        Ok(DeleteReceipt {
            status: "success".to_string(),
            id: Some(id.clone()),
        })
    }

    fn update_memory(&self, id: &MemoryId, content: &str) -> Result<UpdateReceipt> {
        let mut state = self.record(Call::Update {
            id: id.clone(),
            content: content.to_string(),
        })?;
        let Some(node) = state.graph.nodes.iter_mut().find(|n| &n.id == id) else {
            return Err(Error::Status {
                operation: Endpoint::Update.name().to_string(),
                status: 500,
                body: format!("memory '{id}' not found"),
            });
        };
        node.summary = content.to_string();

        Ok(UpdateReceipt {
            status: "success".to_string(),
        })
    }

    fn reindex(&self) -> Result<ReindexReport> {
        let state = self.record(Call::Reindex)?;
        Ok(ReindexReport {
            updated: state.graph.nodes.len() as u64,
            pruned: 0,
        })
    }

    fn graph(&self) -> Result<GraphData> {
        let state = self.record(Call::Graph)?;
        Ok(state.graph.clone())
    }

    fn analyze(&self, text: &str, context: Option<&str>) -> Result<Analysis> {
        let mut state = self.record(Call::Analyze {
            text: text.to_string(),
            context: context.map(str::to_string),
        })?;
        if let Some(analysis) = state.analyses.pop_front() {
            return Ok(analysis);
        }

        let title: String = text.lines().next().unwrap_or_default().chars().take(60).collect();
        Ok(Analysis::clear(
            MemoryDraft::new(title, "Inbox").with_summary(text.to_string()),
        ))
    }

    fn ask(&self, query: &str) -> Result<Answer> {
        let mut state = self.record(Call::Ask(query.to_string()))?;
        Ok(state.answers.pop_front().unwrap_or_default())
    }

    fn config(&self) -> Result<BackendConfig> {
        let state = self.record(Call::GetConfig)?;
        Ok(state.config.clone())
    }

    fn update_config(&self, field: ConfigField, value: &str) -> Result<ConfigUpdateReceipt> {
        let mut state = self.record(Call::SetConfig {
            field,
            value: value.to_string(),
        })?;
        state.config.set(field, value);

        Ok(ConfigUpdateReceipt {
            status: "updated".to_string(),
            requires_restart: true,
        })
    }

    fn reset(&self) -> Result<ResetReport> {
        let mut state = self.record(Call::Reset)?;
        let deleted = state.graph.nodes.len() as u64;
        state.graph = GraphData::default();
        state.tree.structure.clear();

        Ok(ResetReport {
            status: "reset_complete".to_string(),
            deleted_files: deleted,
        })
    }

    fn vault_tree(&self) -> Result<VaultTree> {
        let state = self.record(Call::Tree)?;
        Ok(state.tree.clone())
    }
}
