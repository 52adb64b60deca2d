//! The data model a [`FormController`](`crate::FormController`) binds fields to.
//!
//! This crate only consumes the [`Model`] capability set, it doesn't provide an implementation.

use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;

/// A form field's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	/// Text-like controls: inputs, selects, text areas.
	Text(String),
	/// Checkboxes and radio buttons.
	Flag(bool),
}
impl Value {
	#[must_use]
	pub fn to_text(&self) -> String {
		match self {
			Value::Text(text) => text.clone(),
			Value::Flag(flag) => flag.to_string(),
		}
	}

	#[must_use]
	pub fn is_truthy(&self) -> bool {
		match self {
			Value::Text(text) => !text.is_empty() && text != "false",
			Value::Flag(flag) => *flag,
		}
	}
}
impl From<&str> for Value {
	fn from(text: &str) -> Self {
		Value::Text(text.to_owned())
	}
}
impl From<String> for Value {
	fn from(text: String) -> Self {
		Value::Text(text)
	}
}
impl From<bool> for Value {
	fn from(flag: bool) -> Self {
		Value::Flag(flag)
	}
}

/// Called with the name of the changed property.
pub type PropertyChangeListener = Rc<dyn Fn(&str)>;

pub trait Model {
	fn get_property_value(&self, property: &str) -> Value;

	/// Stores `value` and notifies change listeners synchronously.
	fn set_property_value(&self, property: &str, value: Value);

	fn is_valid_property_value(&self, property: &str, value: &Value) -> bool;

	fn add_property_change_listener(&self, listener: PropertyChangeListener) -> Subscription;
}

/// Unsubscribes a listener when dropped (or explicitly through [`Subscription::unsubscribe`]).
#[must_use = "Dropping a `Subscription` unsubscribes immediately."]
pub struct Subscription(Option<Box<dyn FnOnce()>>);
impl Subscription {
	pub fn new(unsubscribe: impl 'static + FnOnce()) -> Self {
		Self(Some(Box::new(unsubscribe)))
	}

	pub fn unsubscribe(mut self) {
		self.run();
	}

	fn run(&mut self) {
		if let Some(unsubscribe) = self.0.take() {
			unsubscribe();
		}
	}
}
impl Drop for Subscription {
	fn drop(&mut self) {
		self.run();
	}
}
impl Debug for Subscription {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Subscription").field(&self.0.is_some()).finish()
	}
}
