use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::editor::NetworkEditor;
use super::selection::Selection;
use super::state::{
	CanvasState, LOOP_RADIUS, NODE_HEIGHT, NODE_WIDTH, loop_center, node_center,
};

const BACKGROUND: &str = "#f7fafd";
const GRID_DOT: &str = "#e3f2fd";
const GRID_GAP: f64 = 16.0;
const NODE_FILL: &str = "#e3f2fd";
const ACCENT: &str = "#1976d2";
const SELECTED: &str = "#ef6c00";
const EDGE_RGB: &str = "51, 51, 51";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &CanvasState, editor: &NetworkEditor, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_grid(state, ctx);
	draw_edges(state, editor, ctx);
	draw_link_preview(state, editor, ctx);
	draw_nodes(state, editor, ctx);
	ctx.restore();
}

fn draw_grid(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	if GRID_GAP * k < 6.0 {
		return;
	}
	let top_left = state.screen_to_graph(0.0, 0.0);
	let bottom_right = state.screen_to_graph(state.width, state.height);
	ctx.set_fill_style_str(GRID_DOT);
	let mut x = (top_left.x / GRID_GAP).floor() * GRID_GAP;
	while x <= bottom_right.x {
		let mut y = (top_left.y / GRID_GAP).floor() * GRID_GAP;
		while y <= bottom_right.y {
			ctx.fill_rect(x, y, 1.5 / k, 1.5 / k);
			y += GRID_GAP;
		}
		x += GRID_GAP;
	}
}

fn draw_edges(state: &CanvasState, editor: &NetworkEditor, ctx: &CanvasRenderingContext2d) {
	let store = editor.store();
	let k = state.transform.k;
	let (line_width, dash, gap, arrow_size) = (2.0 / k.max(0.5), 5.0, 5.0, 9.0);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	for (i, edge) in store.edges().iter().enumerate() {
		let selected = editor.selection() == Selection::Edge(edge.handle);
		let alpha = if state.is_highlighted(edge) {
			0.8 + 0.2 * t
		} else {
			0.8 - 0.45 * t
		};
		let stroke = if selected {
			SELECTED.to_string()
		} else {
			format!("rgba({EDGE_RGB}, {alpha})")
		};
		let width = if selected { line_width * 1.6 } else { line_width };

		ctx.set_stroke_style_str(&stroke);
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);

		let label = format!("Ch {}", i + 1);
		if edge.source == edge.target {
			let Some(node) = store.node(edge.source) else {
				continue;
			};
			let c = loop_center(state.position_of(node));
			ctx.begin_path();
			let _ = ctx.arc(c.x, c.y, LOOP_RADIUS, 0.0, 2.0 * PI);
			ctx.stroke();
			draw_label(ctx, &label, c.x, c.y - LOOP_RADIUS - 4.0, k);
			continue;
		}

		let Some((from, to)) = state.edge_segment(store, edge) else {
			continue;
		};
		let (dx, dy) = (to.x - from.x, to.y - from.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let (ux, uy) = (dx / dist, dy / dist);

		ctx.begin_path();
		ctx.move_to(from.x, from.y);
		ctx.line_to(to.x - ux * arrow_size, to.y - uy * arrow_size);
		ctx.stroke();

		let _ = ctx.set_line_dash(&js_sys::Array::new());
		ctx.set_fill_style_str(&stroke);
		let (back_x, back_y) = (to.x - ux * arrow_size, to.y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(to.x, to.y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		draw_label(ctx, &label, (from.x + to.x) / 2.0, (from.y + to.y) / 2.0 - 6.0, k);
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_label(ctx: &CanvasRenderingContext2d, text: &str, x: f64, y: f64, k: f64) {
	ctx.set_fill_style_str("#333");
	ctx.set_font(&format!("600 {}px sans-serif", 11.0 / k.max(0.5)));
	ctx.set_text_align("center");
	let _ = ctx.fill_text(text, x, y);
}

fn draw_link_preview(state: &CanvasState, editor: &NetworkEditor, ctx: &CanvasRenderingContext2d) {
	let Some(link) = &state.link else {
		return;
	};
	let Some(node) = editor.store().node(link.source) else {
		return;
	};
	let from = node_center(state.position_of(node));
	ctx.set_stroke_style_str(ACCENT);
	ctx.set_line_width(1.5 / state.transform.k);
	let _ = ctx.set_line_dash(&js_sys::Array::of2(
		&JsValue::from_f64(4.0),
		&JsValue::from_f64(4.0),
	));
	ctx.begin_path();
	ctx.move_to(from.x, from.y);
	ctx.line_to(link.cursor.x, link.cursor.y);
	ctx.stroke();
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_nodes(state: &CanvasState, editor: &NetworkEditor, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let t = ease_out_cubic(state.hover.highlight_t);

	for (i, node) in editor.store().nodes().iter().enumerate() {
		let pos = state.position_of(node);
		let selected = editor.selection() == Selection::Node(node.handle);
		let hovered = state.hover.node == Some(node.handle);

		if hovered && t > 0.01 {
			let c = node_center(pos);
			ctx.set_global_alpha(0.25 * t);
			ctx.begin_path();
			let _ = ctx.ellipse(c.x, c.y, NODE_WIDTH * 0.7, NODE_HEIGHT * 0.8, 0.0, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(ACCENT);
			ctx.fill();
			ctx.set_global_alpha(1.0);
		}

		rounded_rect(ctx, pos.x, pos.y, NODE_WIDTH, NODE_HEIGHT, 10.0);
		ctx.set_fill_style_str(NODE_FILL);
		ctx.fill();
		ctx.set_stroke_style_str(if selected { SELECTED } else { ACCENT });
		ctx.set_line_width(if selected { 3.0 } else { 2.0 });
		ctx.stroke();

		let c = node_center(pos);
		ctx.set_fill_style_str(ACCENT);
		ctx.set_font(&format!("600 {}px sans-serif", 16.0 / k.max(1.0)));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&(i + 1).to_string(), c.x, c.y);
		ctx.set_text_baseline("alphabetic");
	}
}
