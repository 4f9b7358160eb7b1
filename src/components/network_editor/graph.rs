//! Canonical node and channel collections of one editing session.

use log::debug;

use super::types::{ChannelParams, Edge, EdgeHandle, Node, NodeHandle, NodeParams, Position, Protocol};

/// Horizontal spacing used when placing new nodes.
pub const NODE_SPACING: f64 = 200.0;
/// Row on which new nodes are placed.
pub const NODE_ROW_Y: f64 = 100.0;

/// Full copy of the live collections, as captured for undo.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSnapshot {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

/// Live nodes and edges. Iteration order is insertion order and is what the
/// projection numbers by.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphStore {
	nodes: Vec<Node>,
	edges: Vec<Edge>,
}

impl GraphStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Store holding the two initial parties.
	pub fn seeded() -> Self {
		let mut store = Self::new();
		store.add_node();
		store.add_node();
		store
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn edges(&self) -> &[Edge] {
		&self.edges
	}

	pub fn node(&self, handle: NodeHandle) -> Option<&Node> {
		self.nodes.iter().find(|n| n.handle == handle)
	}

	pub fn edge(&self, handle: EdgeHandle) -> Option<&Edge> {
		self.edges.iter().find(|e| e.handle == handle)
	}

	pub fn contains_node(&self, handle: NodeHandle) -> bool {
		self.node(handle).is_some()
	}

	/// 1-based position of a live node, which is also its display label.
	pub fn ordinal(&self, handle: NodeHandle) -> Option<usize> {
		self.nodes.iter().position(|n| n.handle == handle).map(|i| i + 1)
	}

	/// Appends a node with default parameters, placed after the existing ones.
	pub fn add_node(&mut self) -> NodeHandle {
		let handle = NodeHandle::new();
		let position = Position::new(self.nodes.len() as f64 * NODE_SPACING, NODE_ROW_Y);
		self.nodes.push(Node {
			handle,
			position,
			params: NodeParams::default(),
		});
		debug!("node {handle} added at ({}, {})", position.x, position.y);
		handle
	}

	/// Replaces the parameters of `handle`. Returns false if the node is gone.
	pub fn update_node(&mut self, handle: NodeHandle, params: NodeParams) -> bool {
		match self.nodes.iter_mut().find(|n| n.handle == handle) {
			Some(node) => {
				node.params = params;
				true
			}
			None => false,
		}
	}

	pub fn update_edge(&mut self, handle: EdgeHandle, params: ChannelParams) -> bool {
		match self.edges.iter_mut().find(|e| e.handle == handle) {
			Some(edge) => {
				edge.params = params;
				true
			}
			None => false,
		}
	}

	pub fn move_node(&mut self, handle: NodeHandle, position: Position) -> bool {
		match self.nodes.iter_mut().find(|n| n.handle == handle) {
			Some(node) => {
				node.position = position;
				true
			}
			None => false,
		}
	}

	/// Removes the node and every edge touching it in one step.
	pub fn remove_node(&mut self, handle: NodeHandle) -> bool {
		let before = self.nodes.len();
		self.nodes.retain(|n| n.handle != handle);
		if self.nodes.len() == before {
			return false;
		}
		let edges_before = self.edges.len();
		self.edges.retain(|e| !e.touches(handle));
		debug!(
			"node {handle} removed with {} channel(s)",
			edges_before - self.edges.len()
		);
		true
	}

	/// Creates a channel with the field set `protocol` calls for. Self-loops
	/// and parallel channels are accepted; dead endpoints are not.
	pub fn connect(
		&mut self,
		source: NodeHandle,
		target: NodeHandle,
		protocol: Protocol,
	) -> Option<EdgeHandle> {
		if !self.contains_node(source) || !self.contains_node(target) {
			return None;
		}
		let handle = EdgeHandle::new();
		self.edges.push(Edge {
			handle,
			source,
			target,
			params: ChannelParams::defaults_for(protocol),
		});
		debug!("channel {handle} connected {source} -> {target} ({protocol})");
		Some(handle)
	}

	pub fn remove_edge(&mut self, handle: EdgeHandle) -> bool {
		let before = self.edges.len();
		self.edges.retain(|e| e.handle != handle);
		self.edges.len() != before
	}

	pub fn snapshot(&self) -> GraphSnapshot {
		GraphSnapshot {
			nodes: self.nodes.clone(),
			edges: self.edges.clone(),
		}
	}

	pub fn restore(&mut self, snapshot: GraphSnapshot) {
		self.nodes = snapshot.nodes;
		self.edges = snapshot.edges;
	}
}
