use super::editor::NetworkEditor;
use super::graph::{GraphStore, NODE_ROW_Y};
use super::types::{Edge, EdgeHandle, Node, NodeHandle, Position};

pub const NODE_WIDTH: f64 = 90.0;
pub const NODE_HEIGHT: f64 = 50.0;
pub const LOOP_RADIUS: f64 = 18.0;
/// Distance from a channel, in world space, that still counts as a hit.
pub const EDGE_HIT_TOLERANCE: f64 = 6.0;
/// Screen-space movement below which a press is treated as a click.
pub const CLICK_SLOP: f64 = 3.0;
/// Screen margin kept around the graph when fitting it into view.
pub const FIT_PADDING: f64 = 40.0;
const MIN_ZOOM: f64 = 0.1;
const MAX_ZOOM: f64 = 10.0;
const FIT_MAX_ZOOM: f64 = 1.5;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<NodeHandle>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Position,
	pub current: Position,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
}

/// Shift-drag from a node towards the node to connect to.
#[derive(Clone, Debug)]
pub struct LinkState {
	pub source: NodeHandle,
	pub cursor: Position,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<NodeHandle>,
	pub highlight_t: f64,
}

/// What a completed gesture asks the editor to do.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasAction {
	MoveNode(NodeHandle, Position),
	SelectNode(NodeHandle),
	SelectEdge(EdgeHandle),
	Connect(NodeHandle, NodeHandle),
}

impl CanvasAction {
	pub fn apply(self, editor: &mut NetworkEditor) {
		match self {
			CanvasAction::MoveNode(handle, position) => editor.move_node(handle, position),
			CanvasAction::SelectNode(handle) => editor.select_node(handle),
			CanvasAction::SelectEdge(handle) => editor.select_edge(handle),
			CanvasAction::Connect(source, target) => {
				editor.connect(source, target);
			}
		}
	}
}

pub struct CanvasState {
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub link: Option<LinkState>,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
}

pub fn node_center(position: Position) -> Position {
	Position::new(position.x + NODE_WIDTH / 2.0, position.y + NODE_HEIGHT / 2.0)
}

/// Distance from a node's center to its border along `(ux, uy)`.
pub fn border_offset(ux: f64, uy: f64) -> f64 {
	let (hw, hh) = (NODE_WIDTH / 2.0, NODE_HEIGHT / 2.0);
	let tx = if ux.abs() > f64::EPSILON { hw / ux.abs() } else { f64::INFINITY };
	let ty = if uy.abs() > f64::EPSILON { hh / uy.abs() } else { f64::INFINITY };
	tx.min(ty)
}

/// Center of the loop drawn for a self-loop channel on a node at `position`.
pub fn loop_center(position: Position) -> Position {
	let c = node_center(position);
	Position::new(c.x, position.y - LOOP_RADIUS * 0.6)
}

fn distance_to_segment(p: Position, a: Position, b: Position) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len2 = dx * dx + dy * dy;
	let t = if len2 < f64::EPSILON {
		0.0
	} else {
		(((p.x - a.x) * dx + (p.y - a.y) * dy) / len2).clamp(0.0, 1.0)
	};
	let (cx, cy) = (a.x + t * dx - p.x, a.y + t * dy - p.y);
	(cx * cx + cy * cy).sqrt()
}

impl CanvasState {
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform {
				x: 60.0,
				y: height / 2.0 - NODE_ROW_Y - NODE_HEIGHT / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			link: None,
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Position {
		Position::new(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Where `node` is drawn, taking an in-progress drag into account.
	pub fn position_of(&self, node: &Node) -> Position {
		match self.drag.node {
			Some(handle) if handle == node.handle => self.drag.current,
			_ => node.position,
		}
	}

	pub fn node_at_position(&self, store: &GraphStore, sx: f64, sy: f64) -> Option<NodeHandle> {
		let p = self.screen_to_graph(sx, sy);
		// Later nodes are drawn on top.
		store.nodes().iter().rev().find_map(|node| {
			let pos = self.position_of(node);
			let inside = p.x >= pos.x
				&& p.x <= pos.x + NODE_WIDTH
				&& p.y >= pos.y
				&& p.y <= pos.y + NODE_HEIGHT;
			inside.then_some(node.handle)
		})
	}

	/// Endpoints of a straight channel, clipped to the node borders.
	pub fn edge_segment(&self, store: &GraphStore, edge: &Edge) -> Option<(Position, Position)> {
		let from = node_center(self.position_of(store.node(edge.source)?));
		let to = node_center(self.position_of(store.node(edge.target)?));
		let (dx, dy) = (to.x - from.x, to.y - from.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return None;
		}
		let (ux, uy) = (dx / dist, dy / dist);
		let r = border_offset(ux, uy);
		Some((
			Position::new(from.x + ux * r, from.y + uy * r),
			Position::new(to.x - ux * r, to.y - uy * r),
		))
	}

	pub fn edge_at_position(&self, store: &GraphStore, sx: f64, sy: f64) -> Option<EdgeHandle> {
		let p = self.screen_to_graph(sx, sy);
		store.edges().iter().rev().find_map(|edge| {
			let hit = if edge.source == edge.target {
				let center = loop_center(self.position_of(store.node(edge.source)?));
				let (dx, dy) = (p.x - center.x, p.y - center.y);
				((dx * dx + dy * dy).sqrt() - LOOP_RADIUS).abs() < EDGE_HIT_TOLERANCE
			} else {
				let (a, b) = self.edge_segment(store, edge)?;
				distance_to_segment(p, a, b) < EDGE_HIT_TOLERANCE
			};
			hit.then_some(edge.handle)
		})
	}

	pub fn press(&mut self, store: &GraphStore, sx: f64, sy: f64, shift: bool) {
		match self.node_at_position(store, sx, sy) {
			Some(handle) if shift => {
				self.link = Some(LinkState {
					source: handle,
					cursor: self.screen_to_graph(sx, sy),
				});
			}
			Some(handle) => {
				let Some(node) = store.node(handle) else {
					return;
				};
				self.drag = DragState {
					node: Some(handle),
					start_x: sx,
					start_y: sy,
					node_start: node.position,
					current: node.position,
					moved: false,
				};
			}
			None => {
				self.pan = PanState {
					active: true,
					start_x: sx,
					start_y: sy,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
					moved: false,
				};
			}
		}
	}

	pub fn pointer_move(&mut self, store: &GraphStore, sx: f64, sy: f64) {
		if self.drag.node.is_none() {
			let hovered = self.node_at_position(store, sx, sy);
			self.set_hover(hovered);
		}

		if self.drag.node.is_some() {
			let (dx, dy) = (sx - self.drag.start_x, sy - self.drag.start_y);
			if dx.abs() > CLICK_SLOP || dy.abs() > CLICK_SLOP {
				self.drag.moved = true;
			}
			self.drag.current = Position::new(
				self.drag.node_start.x + dx / self.transform.k,
				self.drag.node_start.y + dy / self.transform.k,
			);
		} else if let Some(link) = self.link.as_mut() {
			link.cursor = Position::new(
				(sx - self.transform.x) / self.transform.k,
				(sy - self.transform.y) / self.transform.k,
			);
		} else if self.pan.active {
			let (dx, dy) = (sx - self.pan.start_x, sy - self.pan.start_y);
			if dx.abs() > CLICK_SLOP || dy.abs() > CLICK_SLOP {
				self.pan.moved = true;
			}
			self.transform.x = self.pan.transform_start_x + dx;
			self.transform.y = self.pan.transform_start_y + dy;
		}
	}

	/// Ends the current gesture and reports what it amounted to.
	pub fn release(&mut self, store: &GraphStore, sx: f64, sy: f64) -> Option<CanvasAction> {
		let action = if let Some(handle) = self.drag.node {
			Some(if self.drag.moved {
				CanvasAction::MoveNode(handle, self.drag.current)
			} else {
				CanvasAction::SelectNode(handle)
			})
		} else if let Some(link) = self.link.as_ref() {
			self.node_at_position(store, sx, sy)
				.map(|target| CanvasAction::Connect(link.source, target))
		} else if self.pan.active && !self.pan.moved {
			self.edge_at_position(store, sx, sy).map(CanvasAction::SelectEdge)
		} else {
			None
		};
		self.cancel();
		action
	}

	/// Drops any gesture in progress without applying it.
	pub fn cancel(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
		self.link = None;
	}

	pub fn zoom(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Zooms around the middle of the canvas, as the toolbar buttons do.
	pub fn zoom_centered(&mut self, zoom_in: bool) {
		let delta_y = if zoom_in { -1.0 } else { 1.0 };
		self.zoom(self.width / 2.0, self.height / 2.0, delta_y);
	}

	/// Centers the graph and scales it to fill the canvas. An empty graph
	/// keeps the current view.
	pub fn fit(&mut self, store: &GraphStore) {
		let mut positions = store.nodes().iter().map(|node| self.position_of(node));
		let Some(first) = positions.next() else {
			return;
		};
		let (mut min, mut max) = (first, first);
		for p in positions {
			min = Position::new(min.x.min(p.x), min.y.min(p.y));
			max = Position::new(max.x.max(p.x), max.y.max(p.y));
		}
		// Self-loops sit above their node.
		let (left, top) = (min.x, min.y - LOOP_RADIUS * 2.0);
		let (right, bottom) = (max.x + NODE_WIDTH, max.y + NODE_HEIGHT);

		let avail_w = (self.width - 2.0 * FIT_PADDING).max(1.0);
		let avail_h = (self.height - 2.0 * FIT_PADDING).max(1.0);
		let k = (avail_w / (right - left))
			.min(avail_h / (bottom - top))
			.clamp(MIN_ZOOM, FIT_MAX_ZOOM);
		self.transform = ViewTransform {
			x: self.width / 2.0 - (left + right) / 2.0 * k,
			y: self.height / 2.0 - (top + bottom) / 2.0 * k,
			k,
		};
	}

	pub fn set_hover(&mut self, node: Option<NodeHandle>) {
		if self.hover.node != node {
			self.hover.node = node;
		}
	}

	pub fn is_highlighted(&self, edge: &Edge) -> bool {
		self.hover.node.is_some_and(|h| edge.touches(h))
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
		let target = if self.hover.node.is_some() { 1.0 } else { 0.0 };
		self.hover.highlight_t += (target - self.hover.highlight_t) * 1.8 * dt;
		if self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_editor::types::Protocol;

	/// Canvas with an identity transform so screen and world coordinates agree.
	fn canvas() -> CanvasState {
		let mut state = CanvasState::new(800.0, 400.0);
		state.transform = ViewTransform { x: 0.0, y: 0.0, k: 1.0 };
		state
	}

	fn seeds(editor: &NetworkEditor) -> (NodeHandle, NodeHandle) {
		let nodes = editor.store().nodes();
		(nodes[0].handle, nodes[1].handle)
	}

	#[test]
	fn hit_tests_nodes_and_channels() {
		let mut editor = NetworkEditor::new(Protocol::Dps);
		let (a, b) = seeds(&editor);
		let e = editor.connect(a, b).unwrap();
		let state = canvas();

		assert_eq!(state.node_at_position(editor.store(), 10.0, 110.0), Some(a));
		assert_eq!(state.node_at_position(editor.store(), 210.0, 140.0), Some(b));
		assert_eq!(state.node_at_position(editor.store(), 150.0, 125.0), None);
		assert_eq!(state.edge_at_position(editor.store(), 150.0, 126.0), Some(e));
		assert_eq!(state.edge_at_position(editor.store(), 150.0, 160.0), None);
	}

	#[test]
	fn self_loop_is_hit_on_its_ring() {
		let mut editor = NetworkEditor::new(Protocol::Dps);
		let (a, _) = seeds(&editor);
		let e = editor.connect(a, a).unwrap();
		let state = canvas();
		let c = loop_center(Position::new(0.0, 100.0));
		assert_eq!(state.edge_at_position(editor.store(), c.x, c.y - LOOP_RADIUS), Some(e));
		assert_eq!(state.edge_at_position(editor.store(), c.x, c.y), None);
	}

	#[test]
	fn click_selects_and_drag_moves() {
		let editor = NetworkEditor::new(Protocol::Dps);
		let (a, _) = seeds(&editor);
		let mut state = canvas();

		state.press(editor.store(), 10.0, 110.0, false);
		assert_eq!(state.release(editor.store(), 11.0, 111.0), Some(CanvasAction::SelectNode(a)));

		state.press(editor.store(), 10.0, 110.0, false);
		state.pointer_move(editor.store(), 50.0, 130.0);
		assert_eq!(state.position_of(&editor.store().nodes()[0]), Position::new(40.0, 120.0));
		assert_eq!(
			state.release(editor.store(), 50.0, 130.0),
			Some(CanvasAction::MoveNode(a, Position::new(40.0, 120.0)))
		);
		assert!(state.drag.node.is_none());
	}

	#[test]
	fn shift_drag_connects_nodes() {
		let mut editor = NetworkEditor::new(Protocol::Cow);
		let (a, b) = seeds(&editor);
		let mut state = canvas();

		state.press(editor.store(), 10.0, 110.0, true);
		state.pointer_move(editor.store(), 220.0, 120.0);
		let action = state.release(editor.store(), 220.0, 120.0).unwrap();
		assert_eq!(action, CanvasAction::Connect(a, b));

		action.apply(&mut editor);
		assert_eq!(editor.store().edges().len(), 1);
		assert!(editor.can_undo());

		state.press(editor.store(), 10.0, 110.0, true);
		assert_eq!(state.release(editor.store(), 150.0, 300.0), None);
	}

	#[test]
	fn background_click_selects_channel_but_pan_does_not() {
		let mut editor = NetworkEditor::new(Protocol::Dps);
		let (a, b) = seeds(&editor);
		let e = editor.connect(a, b).unwrap();
		let mut state = canvas();

		state.press(editor.store(), 150.0, 125.0, false);
		assert_eq!(state.release(editor.store(), 150.0, 125.0), Some(CanvasAction::SelectEdge(e)));

		state.press(editor.store(), 150.0, 125.0, false);
		state.pointer_move(editor.store(), 180.0, 140.0);
		assert_eq!(state.release(editor.store(), 180.0, 140.0), None);
		assert_eq!((state.transform.x, state.transform.y), (30.0, 15.0));
	}

	#[test]
	fn zoom_keeps_cursor_fixed() {
		let mut state = canvas();
		let before = state.screen_to_graph(100.0, 100.0);
		state.zoom(100.0, 100.0, -1.0);
		let after = state.screen_to_graph(100.0, 100.0);
		assert!((before.x - after.x).abs() < 1e-9 && (before.y - after.y).abs() < 1e-9);
		assert!(state.transform.k > 1.0);
	}

	#[test]
	fn fit_frames_every_node() {
		let mut editor = NetworkEditor::new(Protocol::Dps);
		editor.add_node();
		let mut state = CanvasState::new(800.0, 400.0);
		state.fit(editor.store());

		let k = state.transform.k;
		for node in editor.store().nodes() {
			let (sx, sy) = (
				node.position.x * k + state.transform.x,
				node.position.y * k + state.transform.y,
			);
			assert!(sx >= FIT_PADDING - 1e-6 && sx + NODE_WIDTH * k <= 800.0 - FIT_PADDING + 1e-6);
			assert!(sy >= FIT_PADDING - 1e-6 && sy + NODE_HEIGHT * k <= 400.0 - FIT_PADDING + 1e-6);
		}
	}

	#[test]
	fn fit_recenters_after_pan_and_zoom() {
		let editor = NetworkEditor::new(Protocol::Dps);
		let mut state = CanvasState::new(800.0, 400.0);
		state.fit(editor.store());
		let fitted = state.transform.clone();

		state.transform.x += 500.0;
		state.zoom_centered(false);
		state.zoom_centered(false);
		assert_ne!(state.transform, fitted);
		state.fit(editor.store());
		assert_eq!(state.transform, fitted);
	}

	#[test]
	fn fit_keeps_the_view_of_an_empty_graph() {
		let mut state = canvas();
		state.fit(&GraphStore::new());
		assert_eq!(state.transform, ViewTransform { x: 0.0, y: 0.0, k: 1.0 });
	}
}
