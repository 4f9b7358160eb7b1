use log::debug;

use super::graph::{GraphSnapshot, GraphStore};

/// Linear undo over full graph snapshots. Unbounded, no redo.
#[derive(Clone, Debug, Default)]
pub struct History {
	stack: Vec<GraphSnapshot>,
}

impl History {
	pub fn new() -> Self {
		Self::default()
	}

	/// Pushes a copy of the store as it is now. Call before mutating.
	pub fn snapshot(&mut self, store: &GraphStore) {
		self.stack.push(store.snapshot());
	}

	/// Restores the most recent snapshot. Returns false when there is nothing to undo.
	pub fn undo(&mut self, store: &mut GraphStore) -> bool {
		match self.stack.pop() {
			Some(snapshot) => {
				store.restore(snapshot);
				debug!("undo applied, {} step(s) left", self.stack.len());
				true
			}
			None => false,
		}
	}

	pub fn len(&self) -> usize {
		self.stack.len()
	}

	pub fn is_empty(&self) -> bool {
		self.stack.is_empty()
	}
}
