//! Two-way binding between [`Model`] properties and form fields.
//!
//! A [`FormController`] starts out idle: field edits only hide the bindings' "hide" elements
//! (and are written to the model if [`ControllerOptions::assign_always`] is set).
//! Once [`FormController::validate`] finds an invalid value with [`ControllerOptions::auto_update`] enabled,
//! every edit re-validates its binding (and its dependents) until [`FormController::reset`] is called.

use crate::{
	dom,
	model::{Model, Subscription, Value},
	redact,
	registry::Registry,
};
use core::cell::{Cell, RefCell};
use hashbrown::{HashMap, HashSet};
use std::{collections::VecDeque, rc::Rc};
use tracing::{instrument, trace, trace_span, warn};
use web_sys::Element;

/// Dependent-property chains longer than this are cut off.
pub const MAX_CASCADE_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerOptions {
	/// Re-validate on every edit after a failed [`FormController::validate`].
	pub auto_update: bool,
	/// Write field values to the model even if they're invalid, and while idle.
	pub assign_always: bool,
}

/// How a binding presents its validity.
#[derive(Debug, Clone, Default)]
pub struct VisualOptions {
	/// Added to the field while it's invalid.
	pub error_classes: Vec<String>,
	/// Shown while at least one invalid binding (of any controller sharing the [`Registry`]) references them.
	pub error_elements: Vec<Element>,
	/// Hidden as soon as the field is edited.
	pub hide_elements: Vec<Element>,
	/// Re-validated whenever this binding is.
	pub dependent_properties: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
	Idle,
	AutoUpdating,
}

#[derive(Debug)]
struct Binding {
	element: Element,
	visual: VisualOptions,
	valid: bool,
}

struct Inner {
	registry: Rc<Registry>,
	model: Rc<dyn Model>,
	options: ControllerOptions,
	group: String,
	/// Set while this controller writes to the model, so its own change notifications are ignored.
	assigning: Cell<bool>,
	state: Cell<State>,
	bindings: RefCell<HashMap<String, Binding>>,
}

/// Binds form fields to [`Model`] properties, at most one field per property.
pub struct FormController {
	inner: Rc<Inner>,
	subscription: RefCell<Option<Subscription>>,
}
impl core::fmt::Debug for FormController {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("FormController")
			.field("group", &self.inner.group)
			.field("options", &self.inner.options)
			.field("state", &self.inner.state.get())
			.field("bindings", &self.inner.bindings.borrow().keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Orders `start` and everything reachable from it through `dependents`, breadth first, each at most once.
///
/// Chains longer than `max_depth` are cut off with a warning.
pub fn cascade_order<'a>(start: &'a str, dependents: impl Fn(&str) -> &'a [String], max_depth: usize) -> Vec<&'a str> {
	let mut visited = HashSet::new();
	let mut order = Vec::new();
	let mut queue = VecDeque::new();
	queue.push_back((start, 0));
	while let Some((property, depth)) = queue.pop_front() {
		if !visited.insert(property) {
			continue;
		}
		order.push(property);
		if depth == max_depth {
			if !dependents(property).is_empty() {
				warn!("Dependent properties of {:?} exceed the maximum cascade depth ({}).", property, max_depth);
			}
			continue;
		}
		for dependent in dependents(property) {
			if !visited.contains(dependent.as_str()) {
				queue.push_back((dependent.as_str(), depth + 1));
			}
		}
	}
	order
}

impl FormController {
	/// Event group names are derived from this prefix and a per-controller counter.
	pub const GROUP_PREFIX: &'static str = "uf-form-controller";

	pub fn new(registry: Rc<Registry>, model: Rc<dyn Model>, options: ControllerOptions) -> Self {
		let id = registry.next_controller_id();

		let inner = Rc::new(Inner {
			registry,
			model,
			options,
			group: format!("{}-{}", Self::GROUP_PREFIX, id),
			assigning: Cell::new(false),
			state: Cell::new(State::Idle),
			bindings: RefCell::default(),
		});

		let weak = Rc::downgrade(&inner);
		let subscription = inner.model.add_property_change_listener(Rc::new(move |property: &str| {
			if let Some(inner) = weak.upgrade() {
				inner.model_changed(property);
			}
		}));

		Self {
			inner,
			subscription: RefCell::new(Some(subscription)),
		}
	}

	/// Binds `element` to `property`, replacing any previous binding of `property`.
	///
	/// With `initial_update`, the field is filled from the model right away.
	#[instrument(skip(self, element, visual))]
	pub fn bind(&self, property: &str, element: &Element, visual: VisualOptions, initial_update: bool) {
		self.unbind(property);

		if initial_update {
			dom::write_field(element, &self.inner.model.get_property_value(property));
		}
		for error_element in &visual.error_elements {
			if self.inner.registry.error_element_count(error_element) == 0 {
				dom::set_visible(error_element, false);
			}
		}

		let events: &[&str] = if dom::is_checkable(element) || element.tag_name().eq_ignore_ascii_case("SELECT") {
			&["change"]
		} else {
			&["input"]
		};
		for event in events {
			let weak = Rc::downgrade(&self.inner);
			let name = property.to_owned();
			self.inner.registry.add_listener(&self.inner.group_of(property), element, event, move |_| {
				if let Some(inner) = weak.upgrade() {
					inner.field_changed(&name);
				}
			});
		}

		self.inner.bindings.borrow_mut().insert(
			property.to_owned(),
			Binding {
				element: element.clone(),
				visual,
				valid: true,
			},
		);
	}

	/// Detaches the field bound to `property`, if any, and withdraws its error state.
	#[instrument(skip(self))]
	pub fn unbind(&self, property: &str) {
		let binding = self.inner.bindings.borrow_mut().remove(property);
		if let Some(binding) = binding {
			self.inner.registry.remove_group(&self.inner.group_of(property));
			if !binding.valid {
				self.inner.show_validity(&binding, false);
			}
			trace!("Unbound.");
		}
	}

	/// Validates every binding, writing valid values to the model.
	///
	/// Returns whether all bindings are valid.
	#[instrument(skip(self))]
	pub fn validate(&self) -> bool {
		let mut properties: Vec<String> = self.inner.bindings.borrow().keys().cloned().collect();
		properties.sort();
		let mut all_valid = true;
		for property in &properties {
			all_valid &= self.inner.validate_property(property);
		}
		if !all_valid && self.inner.options.auto_update {
			trace!("Auto-updating.");
			self.inner.state.set(State::AutoUpdating);
		}
		all_valid
	}

	/// Stops auto-updating and clears all error visuals.
	#[instrument(skip(self))]
	pub fn reset(&self) {
		self.inner.state.set(State::Idle);
		let mut bindings = self.inner.bindings.borrow_mut();
		for binding in bindings.values_mut() {
			if !binding.valid {
				binding.valid = true;
				self.inner.show_validity(binding, false);
			}
		}
	}

	/// The validity of `property` as of the last validation, or [`None`] if it isn't bound.
	#[must_use]
	pub fn is_valid(&self, property: &str) -> Option<bool> {
		self.inner.bindings.borrow().get(property).map(|binding| binding.valid)
	}

	#[must_use]
	pub fn is_auto_updating(&self) -> bool {
		self.inner.state.get() == State::AutoUpdating
	}

	/// Unbinds everything and stops listening to the model.
	#[instrument(skip(self))]
	pub fn destroy(&self) {
		let properties: Vec<String> = self.inner.bindings.borrow().keys().cloned().collect();
		for property in properties {
			self.unbind(&property);
		}
		self.subscription.borrow_mut().take();
		self.inner.state.set(State::Idle);
	}
}
impl Drop for FormController {
	fn drop(&mut self) {
		self.destroy();
	}
}

impl Inner {
	fn group_of(&self, property: &str) -> String {
		format!("{}:{}", self.group, property)
	}

	fn field_changed(&self, property: &str) {
		let span = trace_span!("field_changed", property, state = ?self.state.get());
		let _enter = span.enter();

		let element = match self.bindings.borrow().get(property) {
			Some(binding) => {
				for hide in &binding.visual.hide_elements {
					dom::set_visible(hide, false);
				}
				binding.element.clone()
			}
			None => return,
		};

		match self.state.get() {
			State::AutoUpdating => {
				let bindings = self.bindings.borrow();
				let order: Vec<String> = cascade_order(
					property,
					|property| bindings.get(property).map_or(&[][..], |binding| &binding.visual.dependent_properties[..]),
					MAX_CASCADE_DEPTH,
				)
				.into_iter()
				.map(str::to_owned)
				.collect();
				drop(bindings);
				for property in order {
					self.validate_property(&property);
				}
			}
			State::Idle => {
				if self.options.assign_always {
					self.assign(property, dom::read_field(&element));
				}
			}
		}
	}

	fn model_changed(&self, property: &str) {
		if self.assigning.get() {
			return;
		}
		let bindings = self.bindings.borrow();
		if let Some(binding) = bindings.get(property) {
			let value = self.model.get_property_value(property);
			trace!(property, value = redact(&value.to_text()), "Updating field from model.");
			dom::write_field(&binding.element, &value);
		}
	}

	/// Validates one binding (not its dependents) and updates its visuals. Returns its validity.
	fn validate_property(&self, property: &str) -> bool {
		let (value, valid) = {
			let mut bindings = self.bindings.borrow_mut();
			let binding = match bindings.get_mut(property) {
				Some(binding) => binding,
				None => return true,
			};
			let value = dom::read_field(&binding.element);
			let valid = self.model.is_valid_property_value(property, &value);
			trace!(property, value = redact(&value.to_text()), valid, "Validated.");
			if binding.valid != valid {
				binding.valid = valid;
				self.show_validity(binding, !valid);
			}
			(value, valid)
		};

		if valid || self.options.assign_always {
			self.assign(property, value);
		}
		valid
	}

	fn assign(&self, property: &str, value: Value) {
		self.assigning.set(true);
		self.model.set_property_value(property, value);
		self.assigning.set(false);
	}

	/// Applies (or withdraws) the error visuals of `binding`.
	///
	/// Must only be called on validity transitions, since shared error elements are reference counted.
	fn show_validity(&self, binding: &Binding, invalid: bool) {
		dom::set_classes(&binding.element, &binding.visual.error_classes, invalid);
		for error_element in &binding.visual.error_elements {
			if invalid {
				self.registry.retain_error_element(error_element);
			} else {
				self.registry.release_error_element(error_element);
			}
		}
	}
}
