use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

use crate::sims::{DEFAULT_SIZE, MicroSim};

type SharedSim = Rc<RefCell<Box<dyn MicroSim>>>;
type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Fixed step per animation frame.
const FRAME_DT: f64 = 0.016;

/// Keys the page would otherwise scroll on.
const CAPTURED_KEYS: [&str; 5] = [" ", "ArrowLeft", "ArrowRight", "ArrowUp", "ArrowDown"];

fn canvas_size(canvas: &HtmlCanvasElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let parent = canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0);
	(
		width.or(parent).unwrap_or(DEFAULT_SIZE.0),
		height.unwrap_or(DEFAULT_SIZE.1),
	)
}

fn request_frame(cb: &Closure<dyn FnMut()>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}

/// Browser-side handles of one mounted canvas. Dropping a closure the
/// browser still holds makes its next call throw, so [`stop`](Self::stop)
/// unregisters each one before letting it go.
#[derive(Clone, Default)]
struct FrameLoop {
	alive: Rc<Cell<bool>>,
	pending: Rc<Cell<Option<i32>>>,
	animate: Callback,
	resize: Callback,
}

impl FrameLoop {
	fn new() -> Self {
		let frames = Self::default();
		frames.alive.set(true);
		frames
	}

	fn stop(&self) {
		self.alive.set(false);
		// the animate closure holds a handle to itself; taking it breaks the cycle
		let animate = self.animate.borrow_mut().take();
		let (pending, resize) = (self.pending.take(), self.resize.borrow_mut().take());
		if pending.is_none() && resize.is_none() {
			return;
		}
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(id) = pending {
			let _ = window.cancel_animation_frame(id);
		}
		if let Some(cb) = resize {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		drop(animate);
	}

	fn is_running(&self) -> bool {
		self.alive.get() && self.animate.borrow().is_some()
	}
}

/// Pointer position in canvas pixels.
fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn set_cursor(canvas: &HtmlCanvasElement, cursor: &str) {
	let _ = HtmlElement::style(canvas).set_property("cursor", cursor);
}

/// Hosts one [`MicroSim`]: sizes the canvas, drives the frame loop and
/// forwards pointer and keyboard input.
#[component]
pub fn SimCanvas(
	sim: Box<dyn MicroSim>,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let sim: SharedSim = Rc::new(RefCell::new(sim));
	let frames = FrameLoop::new();

	let cleanup = SendWrapper::new(frames.clone());
	on_cleanup(move || {
		cleanup.stop();
		debug!("sim canvas unmounted");
	});

	let sim_init = sim.clone();
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = canvas_size(&canvas, width, height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		sim_init.borrow_mut().resize(w, h);

		let ctx = match canvas.get_context("2d") {
			Ok(Some(obj)) => obj.dyn_into::<CanvasRenderingContext2d>().ok(),
			_ => None,
		};
		let Some(ctx) = ctx else {
			warn!("canvas has no 2d context");
			return;
		};

		if width.is_none() {
			let (sim_resize, canvas_resize, alive_resize) =
				(sim_init.clone(), canvas.clone(), frames.alive.clone());
			*frames.resize.borrow_mut() = Some(Closure::new(move || {
				if !alive_resize.get() {
					return;
				}
				let (nw, nh) = canvas_size(&canvas_resize, None, height);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				sim_resize.borrow_mut().resize(nw, nh);
			}));
			if let Some(ref cb) = *frames.resize.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (sim_anim, inner) = (sim_init.clone(), frames.clone());
		*frames.animate.borrow_mut() = Some(Closure::new(move || {
			inner.pending.set(None);
			if !inner.is_running() {
				return;
			}
			{
				let mut sim = sim_anim.borrow_mut();
				sim.tick(FRAME_DT);
				sim.render(&ctx);
			}
			if let Some(ref cb) = *inner.animate.borrow() {
				inner.pending.set(request_frame(cb));
			}
		}));
		if let Some(ref cb) = *frames.animate.borrow() {
			frames.pending.set(request_frame(cb));
		}
	});

	let sim_md = sim.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let _ = canvas.focus();
		let (x, y) = local_point(&canvas, &ev);
		let mut sim = sim_md.borrow_mut();
		sim.pointer_down(x, y);
		set_cursor(&canvas, sim.cursor());
	};

	let sim_mm = sim.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		let mut sim = sim_mm.borrow_mut();
		sim.pointer_move(x, y);
		set_cursor(&canvas, sim.cursor());
	};

	let sim_mu = sim.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let (x, y) = local_point(&canvas, &ev);
		let mut sim = sim_mu.borrow_mut();
		sim.pointer_up(x, y);
		set_cursor(&canvas, sim.cursor());
	};

	let sim_ml = sim.clone();
	let on_mouseleave = move |_: MouseEvent| {
		sim_ml.borrow_mut().pointer_leave();
		if let Some(canvas) = canvas_ref.get_untracked() {
			set_cursor(&canvas, "default");
		}
	};

	let sim_kd = sim;
	let on_keydown = move |ev: KeyboardEvent| {
		let key = ev.key();
		if CAPTURED_KEYS.contains(&key.as_str()) {
			ev.prevent_default();
		}
		sim_kd.borrow_mut().key_down(&key);
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="sim-canvas"
			tabindex="0"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:keydown=on_keydown
			style="display: block; outline: none;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stop_releases_every_handle() {
		let frames = FrameLoop::new();
		let held = frames.clone();
		assert!(frames.alive.get());
		assert_eq!(Rc::strong_count(&frames.animate), 2);

		SendWrapper::new(held).stop();
		assert!(!frames.alive.get());
		assert!(!frames.is_running());
		assert_eq!(frames.pending.get(), None);
		assert!(frames.resize.borrow().is_none());
	}
}
