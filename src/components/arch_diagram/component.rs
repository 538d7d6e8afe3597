use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::catalog::{ArchitectureCatalog, ServiceCatalog};
use super::config::DiagramConfig;
use super::render::{self, HitMap};
use super::state::{DiagramState, Overview};
use super::types::{Point, Rect, Size};

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
type PointerCallback = Rc<RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>>;

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((1400.0, 700.0))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas
		.get_context("2d")
		.ok()
		.flatten()
		.and_then(|ctx| ctx.dyn_into().ok())
}

fn client_bounds(canvas: &HtmlCanvasElement) -> Rect {
	let rect = canvas.get_bounding_client_rect();
	Rect::new(
		Point::new(rect.left(), rect.top()),
		Size::new(rect.width(), rect.height()),
	)
}

/// Tilted architecture diagram drawn on a canvas sized to its parent.
///
/// The scene follows the pointer anywhere in the window; hovering a
/// connection highlights it. `selected` names the architecture to show.
/// After mount and after every selection or failed selection, the graph
/// actually on screen is published to `overview`.
#[component]
pub fn ArchitectureDiagram(
	catalog: ArchitectureCatalog,
	#[prop(into)] selected: Signal<String>,
	#[prop(optional, into)] config: Signal<DiagramConfig>,
	#[prop(optional)] overview: Option<WriteSignal<Option<Overview>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<DiagramState>>> = Rc::new(RefCell::new(None));
	let hits: Rc<RefCell<HitMap>> = Rc::new(RefCell::new(HitMap::default()));
	let animate: Callback = Rc::new(RefCell::new(None));
	let resize_cb: Callback = Rc::new(RefCell::new(None));
	let tick_cb: Callback = Rc::new(RefCell::new(None));
	let pointer_cb: PointerCallback = Rc::new(RefCell::new(None));
	let frame: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let interval: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

	let (state_init, animate_init, resize_cb_init, tick_cb_init, pointer_cb_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		tick_cb.clone(),
		pointer_cb.clone(),
	);
	let (frame_init, interval_init, hits_init) = (frame.clone(), interval.clone(), hits.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if state_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window): Option<Window> = web_sys::window() else {
			return;
		};
		let Some(ctx) = context_2d(&canvas) else {
			error!("canvas has no 2d context");
			return;
		};

		let name = selected.get_untracked();
		let config = config.get_untracked();
		let mut diagram =
			match DiagramState::new(catalog.clone(), ServiceCatalog::builtin(), config, &name) {
				Ok(diagram) => diagram,
				Err(err) => {
					error!("cannot mount diagram: {err}");
					return;
				}
			};
		let (w, h) = parent_size(&canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		diagram.resize(w, h);
		if let Some(overview) = overview {
			overview.set(Some(diagram.overview()));
		}
		*state_init.borrow_mut() = Some(diagram);

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let (nw, nh) = parent_size(&canvas_resize);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Some(ref mut s) = *state_resize.borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (state_pointer, canvas_pointer) = (state_init.clone(), canvas.clone());
		*pointer_cb_init.borrow_mut() = Some(Closure::new(move |ev: MouseEvent| {
			let bounds = client_bounds(&canvas_pointer);
			let pointer = Point::new(ev.client_x() as f64, ev.client_y() as f64);
			if let Some(ref mut s) = *state_pointer.borrow_mut() {
				s.on_pointer_move(pointer, &bounds);
			}
		}));
		if let Some(ref cb) = *pointer_cb_init.borrow() {
			let _ =
				window.add_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
		}

		let state_tick = state_init.clone();
		*tick_cb_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_tick.borrow_mut() {
				s.on_tick();
			}
		}));
		if let Some(ref cb) = *tick_cb_init.borrow() {
			match window.set_interval_with_callback_and_timeout_and_arguments_0(
				cb.as_ref().unchecked_ref(),
				config.clock.interval_ms,
			) {
				Ok(handle) => interval_init.set(Some(handle)),
				Err(_) => warn!("animation clock could not be scheduled"),
			}
		}

		let (state_anim, hits_anim, animate_inner, frame_inner) = (
			state_init.clone(),
			hits_init.clone(),
			animate_init.clone(),
			frame_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref s) = *state_anim.borrow() {
				*hits_anim.borrow_mut() = render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			frame_init.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	let state_select = state.clone();
	Effect::new(move |_| {
		let name = selected.get();
		if let Some(ref mut s) = *state_select.borrow_mut() {
			if let Err(err) = s.select_architecture(&name) {
				warn!("keeping {}: {err}", s.graph().name);
			}
			if let Some(overview) = overview {
				overview.set(Some(s.overview()));
			}
		}
	});

	let state_config = state.clone();
	Effect::new(move |_| {
		let config = config.get();
		if let Some(ref mut s) = *state_config.borrow_mut() {
			s.reconfigure(config);
		}
	});

	let (state_hover, hits_hover) = (state.clone(), hits.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		if let Some(ref mut s) = *state_hover.borrow_mut() {
			s.on_hover_at(hits_hover.borrow().connection_at(x, y));
		}
	};

	let state_leave = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_leave.borrow_mut() {
			s.on_hover_at(None);
		}
	};

	let release = SendWrapper::new(move || {
		if let Some(window) = web_sys::window() {
			if let Some(cb) = pointer_cb.borrow_mut().take() {
				let _ = window
					.remove_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
			}
			if let Some(cb) = resize_cb.borrow_mut().take() {
				let _ =
					window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
			if let Some(handle) = interval.take() {
				window.clear_interval_with_handle(handle);
			}
			if let Some(handle) = frame.take() {
				let _ = window.cancel_animation_frame(handle);
			}
		}
		tick_cb.borrow_mut().take();
		animate.borrow_mut().take();
		if let Some(ref mut s) = *state.borrow_mut() {
			s.teardown();
		}
	});
	on_cleanup(move || (release.take())());

	view! {
		<canvas
			node_ref=canvas_ref
			class="arch-diagram-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block;"
		/>
	}
}
