#![cfg(target_arch = "wasm32")]
#![allow(dead_code)]

use std::{
	cell::{Cell, RefCell},
	collections::HashMap,
	rc::Rc,
};
use uf_dom::{model::PropertyChangeListener, Model, Subscription, Value};

type Listeners = Rc<RefCell<Vec<(usize, PropertyChangeListener)>>>;

/// An in-memory [`Model`] with per-property validators, recording every write.
#[derive(Default)]
pub struct TestModel {
	values: RefCell<HashMap<String, Value>>,
	validators: HashMap<String, Box<dyn Fn(&Value) -> bool>>,
	listeners: Listeners,
	next_listener: Cell<usize>,
	pub writes: RefCell<Vec<(String, Value)>>,
}
impl TestModel {
	pub fn with_value(self, property: &str, value: impl Into<Value>) -> Self {
		self.values.borrow_mut().insert(property.to_owned(), value.into());
		self
	}

	pub fn with_validator(mut self, property: &str, validator: impl 'static + Fn(&Value) -> bool) -> Self {
		self.validators.insert(property.to_owned(), Box::new(validator));
		self
	}

	pub fn listener_count(&self) -> usize {
		self.listeners.borrow().len()
	}
}
impl Model for TestModel {
	fn get_property_value(&self, property: &str) -> Value {
		self.values.borrow().get(property).cloned().unwrap_or_else(|| Value::Text(String::new()))
	}

	fn set_property_value(&self, property: &str, value: Value) {
		self.values.borrow_mut().insert(property.to_owned(), value.clone());
		self.writes.borrow_mut().push((property.to_owned(), value));
		let listeners: Vec<PropertyChangeListener> = self.listeners.borrow().iter().map(|(_, listener)| Rc::clone(listener)).collect();
		for listener in listeners {
			listener(property);
		}
	}

	fn is_valid_property_value(&self, property: &str, value: &Value) -> bool {
		self.validators.get(property).map_or(true, |validator| validator(value))
	}

	fn add_property_change_listener(&self, listener: PropertyChangeListener) -> Subscription {
		let id = self.next_listener.get();
		self.next_listener.set(id + 1);
		self.listeners.borrow_mut().push((id, listener));
		let listeners = Rc::downgrade(&self.listeners);
		Subscription::new(move || {
			if let Some(listeners) = listeners.upgrade() {
				listeners.borrow_mut().retain(|(other, _)| *other != id);
			}
		})
	}
}
