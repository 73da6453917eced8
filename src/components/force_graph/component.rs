use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::ForceGraphState;
use super::types::CanvasData;

/// Pointer travel, in pixels, beyond which a press counts as a drag.
const CLICK_SLOP: f64 = 3.0;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn viewport(window: &Window) -> Option<(f64, f64)> {
	let w = window.inner_width().ok()?.as_f64()?;
	let h = window.inner_height().ok()?.as_f64()?;
	Some((w, h))
}

fn pointer(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Interactive force-directed graph.
///
/// The simulation is rebuilt whenever `data` changes. The animation loop
/// starts on mount, follows window resizes when `fullscreen` is set, and
/// stops when the component is unmounted. `on_select` receives the id of a
/// clicked node, or `None` when the background is clicked.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<CanvasData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] on_select: Option<Callback<Option<String>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let stopped = Arc::new(AtomicBool::new(false));

	let stopped_cleanup = stopped.clone();
	on_cleanup(move || stopped_cleanup.store(true, Ordering::Relaxed));

	let (state_init, animate_init, resize_init) = (state.clone(), animate.clone(), resize_cb.clone());
	Effect::new(move |_| {
		let data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if let Some(s) = state_init.borrow_mut().as_mut() {
			debug!("graph data changed, rebuilding simulation");
			s.replace_data(&data);
			return;
		}

		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let parent_size = |fallback_w, fallback_h| {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_width() as f64)
						.unwrap_or(fallback_w)
				}),
				height.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_height() as f64)
						.unwrap_or(fallback_h)
				}),
			)
		};
		let (w, h) = if fullscreen {
			viewport(&window).unwrap_or((800.0, 600.0))
		} else {
			parent_size(800.0, 600.0)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
		{
			Some(ctx) => ctx,
			None => {
				error!("canvas 2d context unavailable");
				return;
			}
		};
		*state_init.borrow_mut() = Some(ForceGraphState::new(&data, w, h));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(s) = state_resize.borrow_mut().as_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(cb) = resize_init.borrow().as_ref() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, resize_inner, stopped) = (
			state_init.clone(),
			animate_init.clone(),
			resize_init.clone(),
			stopped.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let Some(window) = web_sys::window() else {
				return;
			};
			if stopped.load(Ordering::Relaxed) {
				if let Some(cb) = resize_inner.borrow_mut().take() {
					let _ = window
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				debug!("graph canvas unmounted, animation stopped");
				return;
			}
			if let Some(s) = state_anim.borrow_mut().as_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			if let Some(cb) = animate_inner.borrow().as_ref() {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(cb) = animate_init.borrow().as_ref() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let mut guard = state_md.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		if let Some(idx) = s.node_at_position(x, y) {
			s.drag.active = true;
			s.drag.moved = false;
			s.drag.node_idx = Some(idx);
			s.drag.start_x = x;
			s.drag.start_y = y;
			let mut start = None;
			s.graph.visit_nodes(|node| {
				if node.index() == idx {
					start = Some((node.x(), node.y()));
				}
			});
			if let Some((nx, ny)) = start {
				s.drag.node_start_x = nx;
				s.drag.node_start_y = ny;
			}
		} else {
			s.pan.active = true;
			s.pan.moved = false;
			s.pan.start_x = x;
			s.pan.start_y = y;
			s.pan.transform_start_x = s.transform.x;
			s.pan.transform_start_y = s.transform.y;
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		let mut guard = state_mm.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		if !s.drag.active {
			let hovered = s.node_at_position(x, y);
			s.set_hover(hovered);
		}

		if s.drag.active {
			let Some(idx) = s.drag.node_idx else {
				return;
			};
			let (dx, dy) = (x - s.drag.start_x, y - s.drag.start_y);
			s.drag.moved |= dx.hypot(dy) > CLICK_SLOP;
			let (nx, ny) = (
				s.drag.node_start_x + (dx / s.transform.k) as f32,
				s.drag.node_start_y + (dy / s.transform.k) as f32,
			);
			s.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx;
					node.data.y = ny;
					node.data.is_anchor = true;
				}
			});
		} else if s.pan.active {
			let (dx, dy) = (x - s.pan.start_x, y - s.pan.start_y);
			s.pan.moved |= dx.hypot(dy) > CLICK_SLOP;
			s.transform.x = s.pan.transform_start_x + dx;
			s.transform.y = s.pan.transform_start_y + dy;
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let selection = {
			let mut guard = state_mu.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let clicked = if s.drag.active && !s.drag.moved {
				Some(s.drag.node_idx)
			} else if s.pan.active && !s.pan.moved {
				Some(None)
			} else {
				None
			};
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;

			clicked.map(|idx| {
				s.selected = idx;
				idx.and_then(|i| s.node_id(i))
			})
		};
		if let (Some(selection), Some(cb)) = (selection, on_select) {
			cb.run(selection);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(s) = state_ml.borrow_mut().as_mut() {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
			s.set_hover(None);
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = pointer(canvas_ref, &ev) else {
			return;
		};
		if let Some(s) = state_wh.borrow_mut().as_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
