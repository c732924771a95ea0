//! Leptos component wrapping the diagram canvas.
//!
//! The component creates an HTML canvas element and wires up mouse/wheel event
//! handlers for clicking, dragging, connecting, panning and zooming. An
//! animation loop runs via `requestAnimationFrame`, redrawing the diagram
//! each frame from the shared [`DiagramState`] signal.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::DiagramState;
use super::theme::Theme;
use super::viewport::{CanvasView, Interaction};

const FRAME_DT: f64 = 0.016;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Pointer position relative to the canvas' top-left corner.
fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn apply(diagram: RwSignal<DiagramState>, interactions: Vec<Interaction>) {
	if interactions.is_empty() {
		return;
	}
	diagram.update(|d| {
		for interaction in interactions {
			interaction.apply(d);
		}
	});
}

/// Renders the diagram on a canvas element.
///
/// All diagram mutations go through the `diagram` signal; the canvas only
/// keeps its own view transform and gesture state. The component sizes
/// itself to its parent container by default; set `fullscreen = true` to fill
/// the viewport and resize automatically with the window. Explicit
/// `width`/`height` override automatic sizing.
#[component]
pub fn ZoomFlowCanvas(
	diagram: RwSignal<DiagramState>,
	#[prop(optional)] theme: Option<Theme>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let theme = theme.unwrap_or_default();
	let view_state: Rc<RefCell<Option<CanvasView>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (view_init, animate_init, resize_cb_init) =
		(view_state.clone(), animate.clone(), resize_cb.clone());
	let locked = RwSignal::new(false);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("zoom-flow: no window, canvas not started");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = context_2d(&canvas) else {
			warn!("zoom-flow: 2d canvas context unavailable");
			return;
		};
		*view_init.borrow_mut() = Some(CanvasView::new(w, h));

		if fullscreen {
			let (view_resize, canvas_resize) = (view_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut v) = *view_resize.borrow_mut() {
					v.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (view_anim, animate_inner, theme) = (view_init.clone(), animate_init.clone(), theme.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut v) = *view_anim.borrow_mut() {
				v.flow_time += FRAME_DT;
				// The signal is gone once the component unmounts; stop drawing then.
				if let Some(boxes) = diagram.try_with_untracked(|d| render::render(d, v, &ctx, &theme)) {
					v.boxes = boxes;
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let view_md = view_state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let out = match *view_md.borrow_mut() {
			Some(ref mut v) => diagram.with_untracked(|d| v.pointer_down(d, x, y)),
			None => return,
		};
		apply(diagram, out);
	};

	let view_mm = view_state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let out = match *view_mm.borrow_mut() {
			Some(ref mut v) => v.pointer_move(x, y),
			None => return,
		};
		apply(diagram, out);
	};

	let view_mu = view_state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		let out = match *view_mu.borrow_mut() {
			Some(ref mut v) => v.pointer_up(x, y),
			None => return,
		};
		apply(diagram, out);
	};

	let view_ml = view_state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut v) = *view_ml.borrow_mut() {
			v.pointer_leave();
		}
	};

	let view_wh = view_state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut v) = *view_wh.borrow_mut() {
			v.wheel(x, y, ev.delta_y());
		}
	};

	let with_view = {
		let view_state = view_state.clone();
		move |f: fn(&mut CanvasView)| {
			if let Some(ref mut v) = *view_state.borrow_mut() {
				f(v);
			}
		}
	};
	let (zoom_in, zoom_out, fit_view) = (with_view.clone(), with_view.clone(), with_view);
	let view_lock = view_state.clone();
	let toggle_lock = move |_| {
		if let Some(ref mut v) = *view_lock.borrow_mut() {
			locked.set(v.toggle_lock());
		}
	};

	view! {
		<div class="zoom-flow">
			<canvas
				node_ref=canvas_ref
				class="zoom-flow-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="flow-controls">
				<button title="zoom in" on:click=move |_| zoom_in(CanvasView::zoom_in)>"+"</button>
				<button title="zoom out" on:click=move |_| zoom_out(CanvasView::zoom_out)>"−"</button>
				<button title="fit view" on:click=move |_| fit_view(CanvasView::fit_view)>"⤢"</button>
				<button title="toggle interactivity" on:click=toggle_lock>
					{move || if locked.get() { "🔒" } else { "🔓" }}
				</button>
			</div>
		</div>
	}
}
