use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use crate::error::Result;

use super::editor::NetworkEditor;
use super::inspector::{ChannelField, NodeField};
use super::projection::NetworkPayload;
use super::render;
use super::selection::Selected;
use super::state::CanvasState;
use super::types::{Edge, FiberType, Node, Protocol};

const PANEL_HEIGHT: f64 = 420.0;

/// Topology editor: canvas, toolbar and parameter sidebar. Reports the
/// projected network through `on_change` after every change.
#[component]
pub fn NetworkEditorPanel(
	#[prop(into)] protocol: Signal<Protocol>,
	#[prop(into)] on_change: Callback<NetworkPayload>,
) -> impl IntoView {
	let editor = RwSignal::new(NetworkEditor::new(protocol.get_untracked()));

	Effect::new(move |_| {
		let protocol = protocol.get();
		editor.update(|e| e.set_protocol(protocol));
	});

	let payload = Memo::new(move |_| editor.with(NetworkEditor::payload));
	Effect::new(move |_| on_change.run(payload.get()));

	view! {
		<div style="display: flex; height: 420px; margin-bottom: 32px; border: 1px solid #ccc; border-radius: 8px; background: #f7fafd;">
			<div style="flex: 1; position: relative; overflow: hidden;">
				<Toolbar editor=editor />
				<NetworkCanvas editor=editor />
			</div>
			<div style="width: 320px; border-left: 1px solid #bbb; background: #fff; border-radius: 0 8px 8px 0; box-shadow: -2px 0 8px #0001; overflow-y: auto;">
				<Inspector editor=editor />
			</div>
		</div>
	}
}

#[component]
fn Toolbar(editor: RwSignal<NetworkEditor>) -> impl IntoView {
	view! {
		<div style="position: absolute; top: 10px; left: 10px; z-index: 10; display: flex; gap: 8px; align-items: center;">
			<button on:click=move |_| editor.update(|e| {
				e.add_node();
			})>"Add Node"</button>
			<button
				disabled=move || !editor.with(NetworkEditor::can_undo)
				on:click=move |_| editor.update(|e| {
					e.undo();
				})
			>
				"Undo"
			</button>
			<span style="font-size: 12px; color: #666;">"Shift-drag between nodes to add a channel."</span>
		</div>
	}
}

fn canvas_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, PANEL_HEIGHT))
}

fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
fn NetworkCanvas(editor: RwSignal<NetworkEditor>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<CanvasState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(state.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window): Option<Window> = web_sys::window() else {
			return;
		};

		let (w, h) = canvas_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => {
					warn!("canvas context is not 2d");
					return;
				}
			},
			_ => {
				warn!("2d canvas context unavailable");
				return;
			}
		};
		let mut initial = CanvasState::new(w, h);
		editor.with_untracked(|e| initial.fit(e.store()));
		*state_init.borrow_mut() = Some(initial);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = canvas_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick(0.016);
				// The editor is gone once the panel unmounts; stop drawing.
				if editor.try_with_untracked(|e| render::render(s, e, &ctx)).is_none() {
					return;
				}
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			editor.with_untracked(|e| s.press(e.store(), x, y, ev.shift_key()));
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			editor.with_untracked(|e| s.pointer_move(e.store(), x, y));
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let action = state_mu
			.borrow_mut()
			.as_mut()
			.and_then(|s| editor.with_untracked(|e| s.release(e.store(), x, y)));
		if let Some(action) = action {
			editor.update(|e| action.apply(e));
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.cancel();
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom(x, y, ev.delta_y());
		}
	};

	let view_control = move |state: Rc<RefCell<Option<CanvasState>>>, control: ViewControl| {
		move |_: MouseEvent| {
			if let Some(ref mut s) = *state.borrow_mut() {
				match control {
					ViewControl::ZoomIn => s.zoom_centered(true),
					ViewControl::ZoomOut => s.zoom_centered(false),
					ViewControl::Fit => editor.with_untracked(|e| s.fit(e.store())),
				}
			}
		}
	};
	let on_zoom_in = view_control(state.clone(), ViewControl::ZoomIn);
	let on_zoom_out = view_control(state.clone(), ViewControl::ZoomOut);
	let on_fit = view_control(state, ViewControl::Fit);

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
		<div style="position: absolute; bottom: 10px; left: 10px; z-index: 10; display: flex; flex-direction: column; gap: 4px;">
			<button title="Zoom in" on:click=on_zoom_in>"+"</button>
			<button title="Zoom out" on:click=on_zoom_out>"-"</button>
			<button title="Fit view" on:click=on_fit>"Fit"</button>
		</div>
	}
}

#[derive(Clone, Copy)]
enum ViewControl {
	ZoomIn,
	ZoomOut,
	Fit,
}

fn report(last_error: RwSignal<Option<String>>, result: Option<Result<()>>) {
	last_error.set(result.and_then(|r| r.err()).map(|e| e.to_string()));
}

#[component]
fn Inspector(editor: RwSignal<NetworkEditor>) -> impl IntoView {
	let last_error = RwSignal::new(None::<String>);

	let body = move || {
		editor.with(|e| match e.selected() {
			None => channel_list(e, editor),
			Some(Selected::Node(node)) => node_form(e, node, editor, last_error),
			Some(Selected::Edge(edge)) => edge_form(e, edge, editor, last_error),
		})
	};

	view! {
		<div style="padding: 16px;">
			{body}
			{move || {
				last_error
					.get()
					.map(|msg| view! { <div style="margin-top: 12px; color: #d32f2f;">{msg}</div> })
			}}
		</div>
	}
}

fn channel_list(e: &NetworkEditor, editor: RwSignal<NetworkEditor>) -> AnyView {
	let store = e.store();
	let rows: Vec<_> = store
		.edges()
		.iter()
		.enumerate()
		.filter_map(|(i, edge)| {
			Some((edge.handle, i + 1, store.ordinal(edge.source)?, store.ordinal(edge.target)?))
		})
		.collect();

	view! {
		<div style="color: #888;">
			<div>"Select a node or channel to edit parameters."</div>
			{(!rows.is_empty())
				.then(|| {
					view! {
						<div style="margin-top: 16px;">
							<b>"Channels:"</b>
							<ul style="padding-left: 16px;">
								{rows
									.into_iter()
									.map(|(handle, id, from, to)| {
										view! {
											<li style="margin-bottom: 4px;">
												{format!("Channel {id} (Node {from} → Node {to})")}
												<button
													style="margin-left: 8px;"
													on:click=move |_| editor.update(|e| e.select_edge(handle))
												>
													"Edit"
												</button>
											</li>
										}
									})
									.collect_view()}
							</ul>
						</div>
					}
				})}
		</div>
	}
	.into_any()
}

fn node_form(
	e: &NetworkEditor,
	node: &Node,
	editor: RwSignal<NetworkEditor>,
	last_error: RwSignal<Option<String>>,
) -> AnyView {
	let ordinal = e.store().ordinal(node.handle).unwrap_or_default();
	let fields = NodeField::ALL
		.into_iter()
		.map(|field| {
			let value = field.value(&node.params);
			view! {
				<label>
					{field.label()}":"
					<br />
					<input
						type="number"
						step=field.step()
						prop:value=value
						on:change=move |ev| {
							let raw = event_target_value(&ev);
							report(last_error, editor.try_update(|e| e.edit_node(field, &raw)));
						}
					/>
				</label>
				<br />
			}
		})
		.collect_view();

	view! {
		<h3 style="color: #1976d2; margin-top: 0;">{format!("Node {ordinal}")}</h3>
		{fields}
		<button
			style="margin-top: 8px; background: #d32f2f; color: #fff;"
			on:click=move |_| editor.update(NetworkEditor::remove_selected)
		>
			"Remove Node"
		</button>
	}
	.into_any()
}

fn edge_form(
	e: &NetworkEditor,
	edge: &Edge,
	editor: RwSignal<NetworkEditor>,
	last_error: RwSignal<Option<String>>,
) -> AnyView {
	let store = e.store();
	let protocol = e.protocol();
	let id = store
		.edges()
		.iter()
		.position(|candidate| candidate.handle == edge.handle)
		.map_or(0, |i| i + 1);
	let (from, to) = (
		store.ordinal(edge.source).unwrap_or_default(),
		store.ordinal(edge.target).unwrap_or_default(),
	);
	let current_type = edge.params.fiber().fiber_type;

	let on_field_change = move |field: ChannelField| {
		move |ev: web_sys::Event| {
			let raw = event_target_value(&ev);
			report(last_error, editor.try_update(|e| e.edit_edge(field, &raw)));
		}
	};

	let fields = ChannelField::visible(protocol)
		.into_iter()
		.map(|field| {
			let input = if field.is_numeric() {
				view! {
					<input
						type="number"
						step=field.step()
						prop:value=field.value(&edge.params, protocol)
						on:change=on_field_change(field)
					/>
				}
				.into_any()
			} else {
				view! {
					<select on:change=on_field_change(field)>
						{FiberType::ALL
							.into_iter()
							.map(|t| {
								view! {
									<option value=t.as_str() selected={t == current_type}>
										{t.label()}
									</option>
								}
							})
							.collect_view()}
					</select>
				}
				.into_any()
			};
			view! {
				<label>{field.label()}":"<br />{input}</label>
				<br />
			}
		})
		.collect_view();

	view! {
		<h3 style="color: #1976d2; margin-top: 0;">
			{format!("Channel {id} (Node {from} → Node {to})")}
		</h3>
		{fields}
		<button
			style="margin-top: 8px; background: #d32f2f; color: #fff;"
			on:click=move |_| editor.update(NetworkEditor::remove_selected)
		>
			"Remove Channel"
		</button>
	}
	.into_any()
}
