use super::graph::GraphStore;
use super::types::{Edge, EdgeHandle, Node, NodeHandle};

/// What the inspector is looking at. Holds handles, never the entities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	/// Nothing selected.
	#[default]
	None,
	/// A party, by handle.
	Node(NodeHandle),
	/// A channel, by handle.
	Edge(EdgeHandle),
}

/// A selection resolved against the live store.
#[derive(Clone, Copy, Debug)]
pub enum Selected<'a> {
	Node(&'a Node),
	Edge(&'a Edge),
}

#[derive(Clone, Debug, Default)]
pub struct SelectionController {
	current: Selection,
}

impl SelectionController {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn current(&self) -> Selection {
		self.current
	}

	pub fn select_node(&mut self, handle: NodeHandle) {
		self.current = Selection::Node(handle);
	}

	pub fn select_edge(&mut self, handle: EdgeHandle) {
		self.current = Selection::Edge(handle);
	}

	pub fn clear(&mut self) {
		self.current = Selection::None;
	}

	/// Looks the selection up in `store`. A handle that no longer resolves
	/// reads as no selection.
	pub fn resolve<'a>(&self, store: &'a GraphStore) -> Option<Selected<'a>> {
		match self.current {
			Selection::None => None,
			Selection::Node(handle) => store.node(handle).map(Selected::Node),
			Selection::Edge(handle) => store.edge(handle).map(Selected::Edge),
		}
	}
}
