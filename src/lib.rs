//! # Engram
//!
//! Terminal client for the Engram personal knowledge service.
//!
//! Engram captures free-form notes, sends them to the Cortex backend for
//! analysis, and lets you recall and explore what was stored. Every
//! interesting operation (analysis, embedding, vector search, graph edge
//! derivation, persistence) lives behind the Cortex REST API; this crate owns
//! the typed client, the per-view state machines, and the terminal rendering.
//!
//! ## Views
//!
//! - **Home**: capture workflow with clarification loop and auto-save
//! - **Recall**: semantic question answering with cited sources
//! - **Graph**: force-directed knowledge graph explorer with delete
//! - **Settings**: backend configuration and destructive maintenance actions
//!
//! ## Example
//!
//! ```rust,ignore
//! use engram::client::HttpCortexClient;
//! use engram::views::RecallView;
//!
//! let client = HttpCortexClient::new("http://localhost:8000")?;
//! let mut recall = RecallView::new();
//! recall.set_query("what did we decide about the release train?");
//! recall.search(&client);
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod client;
pub mod config;
pub mod layout;
pub mod models;
pub mod observability;
pub mod render;
pub mod shell;
pub mod state;
pub mod views;

pub use client::{CortexApi, Endpoint, HttpCortexClient, InMemoryCortex};
pub use config::EngramConfig;
pub use models::{
    Analysis, Answer, BackendConfig, ConfigField, GraphData, GraphLink, GraphNode, MemoryDraft,
    MemoryId, Source, Tags,
};
pub use shell::{Shell, View};
pub use state::{Notice, NoticeKind, Notices, RequestSequencer, RequestState, Ticket};

/// Error type for engram operations.
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Blank query/content, unknown config field, malformed base URL |
/// | `Unreachable` | Connection refused, timeouts, transport failures |
/// | `Status` | The backend answered with a non-success HTTP status |
/// | `Decode` | The backend answered with JSON that does not match the model |
/// | `OperationFailed` | Config file I/O, log file I/O, subscriber init |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The backend could not be reached.
    ///
    /// Raised when:
    /// - The connection is refused (Cortex offline)
    /// - The request or connect timeout elapses
    /// - The request could not be built or sent
    #[error("cortex unreachable during '{operation}': {cause}")]
    Unreachable {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The backend returned a non-success status.
    #[error("'{operation}' returned status {status}: {body}")]
    Status {
        /// The operation that failed.
        operation: String,
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The backend response could not be decoded.
    #[error("could not decode '{operation}' response: {cause}")]
    Decode {
        /// The operation whose response was malformed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// A local operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Returns `true` when the failure means the backend is offline or unreachable.
    #[must_use]
    pub const fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }
}

/// Result type alias for engram operations.
pub type Result<T> = std::result::Result<T, Error>;
