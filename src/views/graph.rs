//! Knowledge graph explorer with filter, detail and delete.

use crate::client::CortexApi;
use crate::config::{EngramConfig, UiSettings};
use crate::layout::{ForceLayout, Layout, Viewport};
use crate::models::{DeleteReceipt, GraphData, GraphNode, MemoryId, ReindexReport};
use crate::state::{Notices, RequestSequencer, RequestState};
use crate::{Error, Result};
use std::time::{Duration, Instant};

/// Zoom applied when a node is selected.
pub const SELECTED_ZOOM: f64 = 4.0;

/// Graph view state.
#[derive(Debug, Clone)]
pub struct GraphView {
    data: GraphData,
    layout: Layout,
    layout_params: ForceLayout,
    viewport: Viewport,
    canvas: (usize, usize),
    fetch: RequestState<usize>,
    reindex: RequestState<ReindexReport>,
    delete: RequestState<DeleteReceipt>,
    sequencer: RequestSequencer,
    selected: Option<MemoryId>,
    pending_delete: Option<MemoryId>,
    filter: String,
    notices: Notices,
    action_ttl: Duration,
    delete_ttl: Duration,
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new(ForceLayout::default(), &UiSettings::default())
    }
}

impl GraphView {
    /// Creates an empty, unloaded view.
    #[must_use]
    pub fn new(layout_params: ForceLayout, ui: &UiSettings) -> Self {
        Self {
            data: GraphData::default(),
            layout: Layout::default(),
            layout_params,
            viewport: Viewport::default(),
            canvas: (ui.canvas_width, ui.canvas_height),
            fetch: RequestState::Idle,
            reindex: RequestState::Idle,
            delete: RequestState::Idle,
            sequencer: RequestSequencer::new(),
            selected: None,
            pending_delete: None,
            filter: String::new(),
            notices: Notices::new(),
            action_ttl: Duration::from_millis(ui.action_notice_ms),
            delete_ttl: Duration::from_millis(ui.delete_notice_ms),
        }
    }

    /// Creates a view from the full config.
    #[must_use]
    pub fn from_config(config: &EngramConfig) -> Self {
        Self::new(ForceLayout::from_settings(&config.layout), &config.ui)
    }

    /// Sets the canvas size the viewport is fitted to.
    #[must_use]
    pub const fn with_canvas_size(mut self, width: usize, height: usize) -> Self {
        self.canvas = (width, height);
        self
    }

    /// Fetches the graph and recomputes the layout.
    ///
    /// On failure the previous data is kept and an error notice is raised.
    pub fn refresh(&mut self, api: &dyn CortexApi) {
        let ticket = self.sequencer.begin();
        self.fetch = RequestState::Pending;
        let result = api.graph();
        let Some(result) = self.sequencer.complete(ticket, result) else {
            return;
        };

        match result {
            Ok(data) => {
                tracing::debug!(nodes = data.nodes.len(), links = data.links.len(), "Graph loaded");
                self.fetch = RequestState::Succeeded(data.nodes.len());
                self.replace(data);
            },
            Err(e) => {
                tracing::warn!(error = %e, "Graph fetch failed");
                self.notices.error(format!("Failed to load graph: {e}"));
                self.fetch = RequestState::Failed(e.to_string());
            },
        }
    }

    fn replace(&mut self, data: GraphData) {
        self.layout = self.layout_params.compute(&data);
        self.data = data;

        if let Some(id) = &self.selected {
            if self.data.node(id).is_none() {
                self.selected = None;
            }
        }
        if let Some(id) = &self.pending_delete {
            if self.data.node(id).is_none() {
                self.pending_delete = None;
            }
        }

        match self.selected.as_ref().and_then(|id| self.layout.get(id)) {
            Some(point) => self.viewport.center_at(point),
            None => {
                if let Some(bounds) = self.layout.bounds() {
                    self.viewport.fit(bounds, self.canvas.0, self.canvas.1);
                }
            },
        }
    }

    /// Re-indexes the vault, then refetches the graph.
    pub fn reindex(&mut self, api: &dyn CortexApi) {
        self.reindex = RequestState::Pending;
        match api.reindex() {
            Ok(report) => {
                self.notices.success(
                    format!("Re-index complete! processed {} memories.", report.updated),
                    self.action_ttl,
                    Instant::now(),
                );
                self.reindex = RequestState::Succeeded(report);
                self.refresh(api);
            },
            Err(e) => {
                tracing::warn!(error = %e, "Re-index failed");
                self.notices.error("Re-index failed.");
                self.reindex = RequestState::Failed(e.to_string());
            },
        }
    }

    /// Selects a node, centering the viewport on it and zooming in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the node is not in the graph.
    pub fn select(&mut self, id: &MemoryId) -> Result<()> {
        if self.data.node(id).is_none() {
            return Err(Error::InvalidInput(format!("no memory with id '{id}'")));
        }
        if let Some(point) = self.layout.get(id) {
            self.viewport.center_at(point);
        }
        self.viewport.set_zoom(SELECTED_ZOOM);
        self.selected = Some(id.clone());
        Ok(())
    }

    /// Clears the selection; the viewport stays where it is.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.pending_delete = None;
    }

    /// Sets the list filter.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    /// Current list filter.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Nodes matching the filter, in graph order.
    #[must_use]
    pub fn visible_nodes(&self) -> Vec<&GraphNode> {
        self.data.filter(&self.filter)
    }

    /// The selected node.
    #[must_use]
    pub fn selected_node(&self) -> Option<&GraphNode> {
        self.selected.as_ref().and_then(|id| self.data.node(id))
    }

    /// The selected id.
    #[must_use]
    pub const fn selected(&self) -> Option<&MemoryId> {
        self.selected.as_ref()
    }

    /// Opens the delete confirmation for the selected node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if nothing is selected.
    pub fn request_delete(&mut self) -> Result<()> {
        let id = self
            .selected
            .clone()
            .ok_or_else(|| Error::InvalidInput("select a memory first".to_string()))?;
        self.pending_delete = Some(id);
        Ok(())
    }

    /// Closes the delete confirmation.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Node awaiting delete confirmation.
    #[must_use]
    pub const fn pending_delete(&self) -> Option<&MemoryId> {
        self.pending_delete.as_ref()
    }

    /// Deletes the node awaiting confirmation, then refetches the graph.
    ///
    /// A failed delete raises an error notice and does not refetch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if no delete was requested.
    pub fn confirm_delete(&mut self, api: &dyn CortexApi) -> Result<()> {
        let id = self
            .pending_delete
            .take()
            .ok_or_else(|| Error::InvalidInput("no delete awaiting confirmation".to_string()))?;

        self.delete = RequestState::Pending;
        match api.delete_memory(&id) {
            Ok(receipt) => {
                tracing::info!(id = %id, "Memory deleted");
                self.selected = None;
                self.notices
                    .success("Memory deleted.", self.delete_ttl, Instant::now());
                self.delete = RequestState::Succeeded(receipt);
                self.refresh(api);
            },
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Delete failed");
                self.notices.error(format!("Failed to delete memory: {e}"));
                self.delete = RequestState::Failed(e.to_string());
            },
        }
        Ok(())
    }

    /// Loaded graph data.
    #[must_use]
    pub const fn data(&self) -> &GraphData {
        &self.data
    }

    /// Current layout.
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Current viewport.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Canvas size used when fitting the viewport, as `(width, height)`.
    #[must_use]
    pub const fn canvas_size(&self) -> (usize, usize) {
        self.canvas
    }

    /// Last fetch state; success carries the node count.
    #[must_use]
    pub const fn fetch_state(&self) -> &RequestState<usize> {
        &self.fetch
    }

    /// Last delete state.
    #[must_use]
    pub const fn delete_state(&self) -> &RequestState<DeleteReceipt> {
        &self.delete
    }

    /// Returns `true` while any request is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.fetch.is_pending() || self.reindex.is_pending() || self.delete.is_pending()
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Endpoint, InMemoryCortex};
    use crate::models::GraphLink;

    fn seeded() -> InMemoryCortex {
        InMemoryCortex::new().with_graph(GraphData::new(
            vec![
                GraphNode::new("a", "Sprint Retro", "Work/Meetings"),
                GraphNode::new("b", "Login bug", "Work/Tickets"),
            ],
            vec![GraphLink::new("a", "b")],
        ))
    }

    #[test]
    fn test_select_centers_and_zooms() {
        let cortex = seeded();
        let mut graph = GraphView::default();
        graph.refresh(&cortex);

        let id = MemoryId::from("b");
        graph.select(&id).unwrap();
        assert_eq!(graph.viewport().center, graph.layout().get(&id).unwrap());
        assert!((graph.viewport().zoom - SELECTED_ZOOM).abs() < f64::EPSILON);

        let before = *graph.viewport();
        graph.clear_selection();
        assert_eq!(*graph.viewport(), before);
        assert!(graph.selected_node().is_none());
    }

    #[test]
    fn test_select_unknown_node_fails() {
        let mut graph = GraphView::default();
        assert!(graph.select(&MemoryId::from("nope")).is_err());
    }

    #[test]
    fn test_delete_requires_selection() {
        let mut graph = GraphView::default();
        assert!(graph.request_delete().is_err());
        assert!(graph.confirm_delete(&InMemoryCortex::new()).is_err());
    }

    #[test]
    fn test_failed_delete_keeps_graph_and_does_not_refetch() {
        let cortex = seeded();
        let mut graph = GraphView::default();
        graph.refresh(&cortex);
        graph.select(&MemoryId::from("a")).unwrap();
        graph.request_delete().unwrap();
        cortex.fail_next(Endpoint::Delete, 1);

        graph.confirm_delete(&cortex).unwrap();
        assert_eq!(cortex.count(Endpoint::Delete), 1);
        assert_eq!(cortex.count(Endpoint::Graph), 1);
        assert_eq!(graph.data().nodes.len(), 2);
        assert!(graph.delete_state().error().is_some());
    }

    #[test]
    fn test_reindex_refetches() {
        let cortex = seeded();
        let mut graph = GraphView::default();
        graph.reindex(&cortex);

        assert_eq!(cortex.count(Endpoint::Reindex), 1);
        assert_eq!(cortex.count(Endpoint::Graph), 1);
        assert_eq!(
            graph.notices().latest().unwrap().message,
            "Re-index complete! processed 2 memories."
        );
    }
}
