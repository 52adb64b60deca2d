//! Timed show/hide transitions.
//!
//! While a transition runs, the element carries [`SHOWING_CLASS`] or [`HIDING_CLASS`],
//! which stylesheets can animate. A hidden element ends with `display: none`.

use crate::{dom, element_key::ElementKey, registry::Registry};
use core::cell::RefCell;
use hashbrown::HashMap;
use std::rc::{Rc, Weak};
use tracing::{error, instrument, trace};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::Element;

pub const SHOWING_CLASS: &str = "uf-showing";
pub const HIDING_CLASS: &str = "uf-hiding";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
	Show,
	Hide,
}

struct Pending {
	handle: i32,
	transition: Transition,
	_callback: Closure<dyn FnMut()>,
}

type Timers = RefCell<HashMap<ElementKey, Pending>>;

/// Runs show and hide transitions. For each element, only the latest call takes effect:
/// starting a transition cancels the element's pending one.
pub struct Showable {
	registry: Rc<Registry>,
	duration_ms: i32,
	timers: Rc<Timers>,
}
impl core::fmt::Debug for Showable {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Showable")
			.field("duration_ms", &self.duration_ms)
			.field("pending", &self.timers.borrow().len())
			.finish_non_exhaustive()
	}
}
impl Showable {
	pub const DEFAULT_DURATION_MS: i32 = 300;

	#[must_use]
	pub fn new(registry: Rc<Registry>) -> Self {
		Self {
			registry,
			duration_ms: Self::DEFAULT_DURATION_MS,
			timers: Rc::default(),
		}
	}

	#[must_use]
	pub fn with_duration(mut self, duration_ms: i32) -> Self {
		self.duration_ms = duration_ms.max(0);
		self
	}

	#[instrument(skip(self, element))]
	pub fn show(&self, element: &Element) {
		self.start(element, Transition::Show);
	}

	#[instrument(skip(self, element))]
	pub fn hide(&self, element: &Element) {
		self.start(element, Transition::Hide);
	}

	/// Whether `element` has a transition in progress.
	#[must_use]
	pub fn is_pending(&self, element: &Element) -> bool {
		self.timers.borrow().contains_key(&self.registry.key_of(element))
	}

	/// Cancels every pending transition, leaving the elements as they are.
	pub fn cancel_all(&self) {
		let window = web_sys::window();
		for (_, pending) in self.timers.borrow_mut().drain() {
			if let Some(window) = &window {
				window.clear_timeout_with_handle(pending.handle);
			}
		}
	}

	fn start(&self, element: &Element, transition: Transition) {
		let key = self.registry.key_of(element);
		self.cancel(key, element);

		let class = match transition {
			Transition::Show => {
				dom::set_visible(element, true);
				SHOWING_CLASS
			}
			Transition::Hide => HIDING_CLASS,
		};
		dom::set_classes(element, &[class.to_owned()], true);

		let window = match web_sys::window() {
			Some(window) => window,
			None => {
				error!("No window to schedule the transition on. Finishing immediately.");
				return finish(element, transition);
			}
		};
		let timers = Rc::downgrade(&self.timers);
		let element_ = element.clone();
		let callback = Closure::wrap(Box::new(move || complete(&timers, key, &element_, transition)) as Box<dyn FnMut()>);
		match window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.as_ref().unchecked_ref(), self.duration_ms) {
			Ok(handle) => {
				self.timers.borrow_mut().insert(
					key,
					Pending {
						handle,
						transition,
						_callback: callback,
					},
				);
			}
			Err(error) => {
				error!("Could not schedule transition: {:?}", error);
				finish(element, transition);
			}
		}
	}

	/// Clears the pending transition of `element`, if any, and its transition class.
	fn cancel(&self, key: ElementKey, element: &Element) {
		let pending = self.timers.borrow_mut().remove(&key);
		if let Some(pending) = pending {
			trace!(transition = ?pending.transition, "Cancelling pending transition.");
			if let Some(window) = web_sys::window() {
				window.clear_timeout_with_handle(pending.handle);
			}
		}
		dom::set_classes(element, &[SHOWING_CLASS.to_owned(), HIDING_CLASS.to_owned()], false);
	}
}
impl Drop for Showable {
	fn drop(&mut self) {
		self.cancel_all();
	}
}

fn complete(timers: &Weak<Timers>, key: ElementKey, element: &Element, transition: Transition) {
	if let Some(timers) = timers.upgrade() {
		// Dropping the callback here is deferred by wasm-bindgen until it returns.
		let finished = timers.borrow_mut().remove(&key);
		drop(finished);
	}
	finish(element, transition);
}

fn finish(element: &Element, transition: Transition) {
	match transition {
		Transition::Show => dom::set_classes(element, &[SHOWING_CLASS.to_owned()], false),
		Transition::Hide => {
			dom::set_classes(element, &[HIDING_CLASS.to_owned()], false);
			dom::set_visible(element, false);
		}
	}
	trace!(?transition, "Transition finished.");
}
