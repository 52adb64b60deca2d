//! The state shared between helpers.

use crate::{
	dom,
	element_key::{ElementKey, ElementKeys},
	event_group::EventGroups,
	rc_hash_map::{CountSaturatedError, Decrement, RcHashMap},
};
use core::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::{error, instrument, trace};
use web_sys::{Element, EventTarget};

/// Owns everything that would otherwise be ambient global state:
/// the [`EventGroups`] of all helpers, the [`ElementKeys`] side-table keys,
/// and the visibility counts of error elements shared between [`FormController`](`crate::FormController`)s.
///
/// Construct one per page (or per independent region of a page) and hand it to every helper.
#[derive(Debug, Default)]
pub struct Registry {
	keys: ElementKeys,
	groups: RefCell<EventGroups>,
	error_elements: RefCell<RcHashMap<ElementKey, u16, Element>>,
	next_controller_id: Cell<u32>,
}
impl Registry {
	#[must_use]
	pub fn new() -> Rc<Self> {
		Rc::new(Self::default())
	}

	pub fn key_of(&self, element: &Element) -> ElementKey {
		self.keys.key_of(element)
	}

	pub fn add_listener(&self, group: &str, target: &EventTarget, event: &str, handler: impl 'static + FnMut(web_sys::Event)) {
		self.groups.borrow_mut().add(group, target, event, handler);
	}

	pub fn remove_group(&self, group: &str) -> usize {
		self.groups.borrow_mut().remove_group(group)
	}

	#[must_use]
	pub fn listener_count(&self, group: &str) -> usize {
		self.groups.borrow().listener_count(group)
	}

	/// Issues a distinct id per [`FormController`](`crate::FormController`), used in its event group names.
	pub(crate) fn next_controller_id(&self) -> u32 {
		let id = self.next_controller_id.get();
		self.next_controller_id.set(id.wrapping_add(1));
		id
	}

	/// Counts one more invalid binding referencing `element`, showing it if it was hidden by the count.
	pub(crate) fn retain_error_element(&self, element: &Element) {
		let key = self.key_of(element);
		match self.error_elements.borrow_mut().increment_or_insert_with(key, || element.clone()) {
			Ok((element, true)) => {
				trace!("Showing error element.");
				dom::set_visible(element, true);
			}
			Ok((_, false)) => (),
			Err(CountSaturatedError) => error!("Too many (more than 65k) invalid bindings share one error element."),
		}
	}

	/// Counts one invalid binding less referencing `element`, hiding it once no invalid binding references it.
	pub(crate) fn release_error_element(&self, element: &Element) {
		let key = self.key_of(element);
		let decrement = self.error_elements.borrow_mut().decrement(&key);
		match decrement {
			Ok(Decrement::Released(element)) => {
				trace!("Hiding error element.");
				dom::set_visible(&element, false);
			}
			Ok(Decrement::Held) => (),
			Ok(Decrement::Missing) | Err(CountSaturatedError) => error!("Released an error element that wasn't retained."),
		}
	}

	/// How many invalid bindings currently reference `element`.
	#[must_use]
	pub fn error_element_count(&self, element: &Element) -> u16 {
		self.error_elements.borrow().count(&self.key_of(element))
	}

	/// Detaches every listener registered through this registry.
	#[instrument(skip(self))]
	pub fn teardown(&self) {
		self.groups.borrow_mut().clear();
	}
}
