//! User-action level operations over the graph.
//!
//! Every action that changes parameters or topology takes exactly one history
//! snapshot first, so a single undo reverts exactly one action. Dragging only
//! moves a node and is not recorded.

use log::{debug, warn};

use crate::error::Result;

use super::graph::GraphStore;
use super::history::History;
use super::inspector::{ChannelField, NodeField};
use super::projection::{NetworkPayload, project};
use super::selection::{Selected, Selection, SelectionController};
use super::types::{EdgeHandle, NodeHandle, Position, Protocol};

/// Graph, undo history, selection and the protocol in effect for one session.
#[derive(Clone, Debug)]
pub struct NetworkEditor {
	store: GraphStore,
	history: History,
	selection: SelectionController,
	protocol: Protocol,
}

impl Default for NetworkEditor {
	fn default() -> Self {
		Self::new(Protocol::default())
	}
}

impl NetworkEditor {
	/// Editor over the two seed nodes.
	pub fn new(protocol: Protocol) -> Self {
		Self {
			store: GraphStore::seeded(),
			history: History::new(),
			selection: SelectionController::new(),
			protocol,
		}
	}

	/// Live nodes and channels.
	pub fn store(&self) -> &GraphStore {
		&self.store
	}

	/// Protocol currently chosen in the form.
	pub fn protocol(&self) -> Protocol {
		self.protocol
	}

	/// Follows the form's protocol. Existing channels are left as they are.
	pub fn set_protocol(&mut self, protocol: Protocol) {
		self.protocol = protocol;
	}

	/// Current selection, which may refer to something already removed.
	pub fn selection(&self) -> Selection {
		self.selection.current()
	}

	/// Selection resolved against the live graph.
	pub fn selected(&self) -> Option<Selected<'_>> {
		self.selection.resolve(&self.store)
	}

	/// Whether there is anything to undo.
	pub fn can_undo(&self) -> bool {
		!self.history.is_empty()
	}

	/// Number of recorded undo steps.
	pub fn history_len(&self) -> usize {
		self.history.len()
	}

	/// Network part of the simulation request, renumbered on every call.
	pub fn payload(&self) -> NetworkPayload {
		project(self.store.nodes(), self.store.edges(), self.protocol)
	}

	/// Adds a node with default parameters to the right of the others.
	pub fn add_node(&mut self) -> NodeHandle {
		self.history.snapshot(&self.store);
		self.selection.clear();
		self.store.add_node()
	}

	/// Removes a node together with its channels. Stale handles are ignored.
	pub fn remove_node(&mut self, handle: NodeHandle) {
		if !self.store.contains_node(handle) {
			return;
		}
		self.history.snapshot(&self.store);
		self.store.remove_node(handle);
		self.selection.clear();
	}

	/// Removes a channel. Stale handles are ignored.
	pub fn remove_edge(&mut self, handle: EdgeHandle) {
		if self.store.edge(handle).is_none() {
			return;
		}
		self.history.snapshot(&self.store);
		self.store.remove_edge(handle);
		self.selection.clear();
	}

	/// Connects two live nodes with the current protocol's channel defaults.
	pub fn connect(&mut self, source: NodeHandle, target: NodeHandle) -> Option<EdgeHandle> {
		if !self.store.contains_node(source) || !self.store.contains_node(target) {
			return None;
		}
		self.history.snapshot(&self.store);
		self.store.connect(source, target, self.protocol)
	}

	/// Drag-end. Position is display-only, so this is not undoable on its own.
	pub fn move_node(&mut self, handle: NodeHandle, position: Position) {
		self.store.move_node(handle, position);
	}

	/// Selects a live node; stale handles are ignored.
	pub fn select_node(&mut self, handle: NodeHandle) {
		if self.store.contains_node(handle) {
			self.selection.select_node(handle);
		}
	}

	/// Selects a live channel; stale handles are ignored.
	pub fn select_edge(&mut self, handle: EdgeHandle) {
		if self.store.edge(handle).is_some() {
			self.selection.select_edge(handle);
		}
	}

	/// Deselects.
	pub fn clear_selection(&mut self) {
		self.selection.clear();
	}

	/// Reverts the last recorded action. Always clears the selection.
	pub fn undo(&mut self) -> bool {
		let undone = self.history.undo(&mut self.store);
		self.selection.clear();
		undone
	}

	/// Applies an inspector edit to the selected node.
	///
	/// A missing or stale selection is a silent no-op. Invalid input is
	/// returned as an error and leaves graph and history untouched.
	pub fn edit_node(&mut self, field: NodeField, raw: &str) -> Result<()> {
		let Some(Selected::Node(node)) = self.selected() else {
			return Ok(());
		};
		let handle = node.handle;
		let params = field.apply(&node.params, raw).inspect_err(|e| warn!("edit rejected: {e}"))?;
		if params == node.params {
			return Ok(());
		}
		self.history.snapshot(&self.store);
		self.store.update_node(handle, params);
		debug!("node {handle}: {} = {raw}", field.key());
		Ok(())
	}

	/// Applies an inspector edit to the selected channel.
	pub fn edit_edge(&mut self, field: ChannelField, raw: &str) -> Result<()> {
		let Some(Selected::Edge(edge)) = self.selected() else {
			return Ok(());
		};
		let handle = edge.handle;
		let params = field
			.apply(&edge.params, raw, self.protocol)
			.inspect_err(|e| warn!("edit rejected: {e}"))?;
		if params == edge.params {
			return Ok(());
		}
		self.history.snapshot(&self.store);
		self.store.update_edge(handle, params);
		debug!("channel {handle}: {} = {raw}", field.key());
		Ok(())
	}

	/// Removes whatever is selected.
	pub fn remove_selected(&mut self) {
		match self.selection.current() {
			Selection::Node(handle) => self.remove_node(handle),
			Selection::Edge(handle) => self.remove_edge(handle),
			Selection::None => {}
		}
	}
}
