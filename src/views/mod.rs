//! The four views.
//!
//! Each view owns its inputs, request states and notices, calls the backend
//! through [`crate::client::CortexApi`], and shares nothing with the others.
//! Input problems are returned as [`crate::Error::InvalidInput`]; backend
//! failures are folded into the view's state.

mod graph;
mod home;
mod recall;
mod settings;

pub use graph::{GraphView, SELECTED_ZOOM};
pub use home::{CaptureOutcome, CapturePhase, HomeView, RecentMemories, RecentMemory};
pub use recall::{RECALL_ERROR, RecallView};
pub use settings::{MaintenanceAction, SettingsView};
