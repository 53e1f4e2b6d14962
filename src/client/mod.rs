//! Cortex API client abstraction.
//!
//! [`CortexApi`] is the single seam between the views and the backend. The
//! HTTP implementation talks to a running Cortex; [`InMemoryCortex`] is a
//! scripted in-process backend that records every call.

mod http;
mod memory;

pub use http::HttpCortexClient;
pub use memory::{Call, InMemoryCortex};

use crate::Result;
use crate::models::{
    Analysis, Answer, BackendConfig, ConfigField, ConfigUpdateReceipt, DeleteReceipt, GraphData,
    MemoryDraft, MemoryId, ReindexReport, ResetReport, SaveReceipt, UpdateReceipt, VaultTree,
};
use std::fmt;
use std::time::Duration;

/// Trait for Cortex backends.
///
/// One method per REST endpoint. Implementations do not retry, cache or
/// batch; every call maps to exactly one request.
pub trait CortexApi: Send + Sync {
    /// Persists an analyzed memory.
    fn save_memory(&self, draft: &MemoryDraft) -> Result<SaveReceipt>;

    /// Removes a memory.
    fn delete_memory(&self, id: &MemoryId) -> Result<DeleteReceipt>;

    /// Replaces a memory's content.
    fn update_memory(&self, id: &MemoryId, content: &str) -> Result<UpdateReceipt>;

    /// Rebuilds embeddings and the graph.
    fn reindex(&self) -> Result<ReindexReport>;

    /// Fetches the full node/link set.
    fn graph(&self) -> Result<GraphData>;

    /// Analyzes free text into a memory or a clarification request.
    fn analyze(&self, text: &str, context: Option<&str>) -> Result<Analysis>;

    /// Answers a question from stored memories.
    fn ask(&self, query: &str) -> Result<Answer>;

    /// Fetches backend settings.
    fn config(&self) -> Result<BackendConfig>;

    /// Updates a single backend setting.
    fn update_config(&self, field: ConfigField, value: &str) -> Result<ConfigUpdateReceipt>;

    /// Wipes every stored memory.
    fn reset(&self) -> Result<ResetReport>;

    /// Lists the vault directory structure.
    fn vault_tree(&self) -> Result<VaultTree>;
}

/// REST endpoints exposed by Cortex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `POST /save`
    Save,
    /// `DELETE /delete/{id}`
    Delete,
    /// `PUT /update/{id}`
    Update,
    /// `POST /reindex`
    Reindex,
    /// `GET /graph`
    Graph,
    /// `POST /analyze`
    Analyze,
    /// `POST /ask`
    Ask,
    /// `GET /config`
    GetConfig,
    /// `POST /config`
    SetConfig,
    /// `POST /reset`
    Reset,
    /// `GET /tree`
    Tree,
}

impl Endpoint {
    /// Returns all endpoints.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Save,
            Self::Delete,
            Self::Update,
            Self::Reindex,
            Self::Graph,
            Self::Analyze,
            Self::Ask,
            Self::GetConfig,
            Self::SetConfig,
            Self::Reset,
            Self::Tree,
        ]
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Graph | Self::GetConfig | Self::Tree => "GET",
            Self::Delete => "DELETE",
            Self::Update => "PUT",
            Self::Save
            | Self::Reindex
            | Self::Analyze
            | Self::Ask
            | Self::SetConfig
            | Self::Reset => "POST",
        }
    }

    /// Path relative to the base URL, with `{id}` substituted when given.
    #[must_use]
    pub fn path(&self, id: Option<&MemoryId>) -> String {
        let id = id.map(MemoryId::as_str).unwrap_or_default();
        match self {
            Self::Save => "/save".to_string(),
            Self::Delete => format!("/delete/{id}"),
            Self::Update => format!("/update/{id}"),
            Self::Reindex => "/reindex".to_string(),
            Self::Graph => "/graph".to_string(),
            Self::Analyze => "/analyze".to_string(),
            Self::Ask => "/ask".to_string(),
            Self::GetConfig | Self::SetConfig => "/config".to_string(),
            Self::Reset => "/reset".to_string(),
            Self::Tree => "/tree".to_string(),
        }
    }

    /// Stable operation name for logs, metrics and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Delete => "delete",
            Self::Update => "update",
            Self::Reindex => "reindex",
            Self::Graph => "graph",
            Self::Analyze => "analyze",
            Self::Ask => "ask",
            Self::GetConfig => "get_config",
            Self::SetConfig => "set_config",
            Self::Reset => "reset",
            Self::Tree => "tree",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method(), self.path(None))
    }
}

/// HTTP client configuration for the Cortex backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        // Analysis and reindex run an LLM on the backend; keep the request
        // timeout generous.
        Self {
            timeout_ms: 120_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl HttpConfig {
    /// Loads HTTP configuration from config file settings.
    #[must_use]
    pub const fn from_settings(settings: &crate::config::ApiSettings) -> Self {
        Self {
            timeout_ms: settings.timeout_ms,
            connect_timeout_ms: settings.connect_timeout_ms,
        }
    }
}

/// Builds a blocking HTTP client with configured timeouts.
#[must_use]
pub fn build_http_client(config: HttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build Cortex HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}
