//! Stable keys for DOM elements, so per-element state can live in ordinary Rust side-tables
//! instead of being attached to the elements themselves.

use core::cell::Cell;
use js_sys::{Object, WeakMap};
use wasm_bindgen::{JsCast, JsValue};

/// Identifies one DOM element for the lifetime of the [`ElementKeys`] that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementKey(u32);

/// Issues [`ElementKey`]s.
///
/// Keys are held in a JavaScript `WeakMap`, so elements removed from the page can still be collected.
#[derive(Debug)]
pub struct ElementKeys {
	map: WeakMap,
	next: Cell<u32>,
}
impl Default for ElementKeys {
	fn default() -> Self {
		Self::new()
	}
}
impl ElementKeys {
	#[must_use]
	pub fn new() -> Self {
		Self {
			map: WeakMap::new(),
			next: Cell::new(0),
		}
	}

	/// Returns the key of `element`, issuing a new one on first use.
	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	pub fn key_of(&self, element: &web_sys::Element) -> ElementKey {
		let object: &Object = element.unchecked_ref();
		if let Some(existing) = self.map.get(object).as_f64() {
			return ElementKey(existing as u32);
		}
		let key = self.next.get();
		self.next.set(key.wrapping_add(1));
		self.map.set(object, &JsValue::from(key));
		ElementKey(key)
	}
}
