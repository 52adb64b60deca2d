//! Named buckets of event listeners that can be detached as a unit.

use hashbrown::HashMap;
use js_sys::Function;
use tracing::{error, instrument, trace};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::EventTarget;

struct Listener {
	target: EventTarget,
	event: String,
	closure: Closure<dyn FnMut(web_sys::Event)>,
}
impl core::fmt::Debug for Listener {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Listener").field("target", &self.target).field("event", &self.event).finish_non_exhaustive()
	}
}

/// Every listener added under a group name stays registered until that group is removed.
///
/// Removing a listener drops its [`Closure`].
/// `wasm-bindgen` defers that drop if the closure is still on the stack, so a handler may remove its own group.
#[derive(Debug, Default)]
pub struct EventGroups {
	groups: HashMap<String, Vec<Listener>>,
}
impl EventGroups {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[instrument(skip(self, target, handler))]
	pub fn add(&mut self, group: &str, target: &EventTarget, event: &str, handler: impl 'static + FnMut(web_sys::Event)) {
		let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web_sys::Event)>);
		if let Err(error) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref::<Function>()) {
			return error!("Failed to add event listener {:?}: {:?}", event, error);
		}
		self.groups.entry(group.to_owned()).or_insert_with(Vec::new).push(Listener {
			target: target.clone(),
			event: event.to_owned(),
			closure,
		});
	}

	/// Detaches every listener registered under `group` and returns how many there were.
	#[instrument(skip(self))]
	pub fn remove_group(&mut self, group: &str) -> usize {
		let listeners = match self.groups.remove(group) {
			Some(listeners) => listeners,
			None => return 0,
		};
		let count = listeners.len();
		for Listener { target, event, closure } in listeners {
			if let Err(error) = target.remove_event_listener_with_callback(&event, closure.as_ref().unchecked_ref::<Function>()) {
				error!("Failed to remove event listener {:?}: {:?}", event, error);
			}
		}
		trace!("Removed {} listener(s).", count);
		count
	}

	#[must_use]
	pub fn listener_count(&self, group: &str) -> usize {
		self.groups.get(group).map_or(0, Vec::len)
	}

	/// Detaches all listeners of all groups.
	pub fn clear(&mut self) {
		let names: Vec<String> = self.groups.keys().cloned().collect();
		for name in names {
			self.remove_group(&name);
		}
	}
}
