//! Toggles state on a subject element depending on the state of one or more target elements.
//!
//! ```html
//! <form>
//!     <input name="email" type="email" required>
//!     <button data-uf-toggle-target="">Send</button> <!-- Enabled while the form is valid. -->
//! </form>
//! <input type="checkbox" id="more">
//! <div data-uf-toggle-target="#more">Shown while #more is checked.</div>
//! ```

use crate::{
	dom,
	element_key::ElementKey,
	redact,
	registry::Registry,
	scan::{self, keywords, Setting, Skip},
};
use core::cell::RefCell;
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{error, instrument, trace, trace_span, warn};
use wasm_bindgen::JsValue;
use web_sys::Element;

pub const TARGET: &str = "data-uf-toggle-target";
pub const TYPE: &str = "data-uf-toggle-type";
pub const PROPERTY: &str = "data-uf-toggle-property";
pub const VALUES: &str = "data-uf-toggle-values";
pub const CONDITION: &str = "data-uf-toggle-condition";
pub const ACTION: &str = "data-uf-toggle-action";
pub const TRUE_CLASSES: &str = "data-uf-toggle-true-classes";
pub const FALSE_CLASSES: &str = "data-uf-toggle-false-classes";

/// How targets' individual matches combine into one result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
	Any,
	All,
	None,
}
keywords!(Condition { "any" => Any, "all" => All, "none" => None });
impl Condition {
	/// Combines `matches`, evaluating lazily and stopping as soon as the result is known.
	pub fn reduce(self, matches: impl IntoIterator<Item = bool>) -> bool {
		let mut matches = matches.into_iter();
		match self {
			Condition::Any => matches.any(|matched| matched),
			Condition::All => matches.all(|matched| matched),
			Condition::None => !matches.any(|matched| matched),
		}
	}
}

/// What is checked on each target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
	/// Native `checkValidity()`.
	Validity,
	/// A DOM property, `checked` unless configured otherwise.
	Property,
	/// The field value.
	Value,
}
keywords!(Check { "validity" => Validity, "property" => Property, "value" => Value });
impl Check {
	#[must_use]
	pub fn resolve_auto(checkable: bool, has_values: bool) -> Self {
		if checkable {
			Check::Property
		} else if has_values {
			Check::Value
		} else {
			Check::Validity
		}
	}
}

/// The state change applied to the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	Enable,
	Visible,
	None,
	Required,
	NotRequired,
}
keywords!(Action {
	"enable" => Enable,
	"visible" => Visible,
	"none" => None,
	"required" => Required,
	"not-required" => NotRequired,
});
impl Action {
	#[must_use]
	pub fn resolve_auto(has_classes: bool, subject_tag: &str) -> Self {
		if has_classes {
			Action::None
		} else if dom::FORM_CONTROL_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(subject_tag)) {
			Action::Enable
		} else {
			Action::Visible
		}
	}
}

/// Matches `value` against a value set. An empty set accepts any non-empty value.
#[must_use]
pub fn value_matches(value: &str, values: &[String]) -> bool {
	if values.is_empty() {
		!value.is_empty()
	} else {
		values.iter().any(|candidate| candidate == value)
	}
}

fn js_to_string(value: &JsValue) -> Option<String> {
	value
		.as_bool()
		.map(|flag| flag.to_string())
		.or_else(|| value.as_string())
		.or_else(|| value.as_f64().map(|number| number.to_string()))
}

#[derive(Debug)]
struct ToggleDescriptor {
	subject: Element,
	targets: Vec<Element>,
	check: Setting<Check>,
	property: String,
	values: Vec<String>,
	condition: Condition,
	action: Action,
	true_classes: Vec<String>,
	false_classes: Vec<String>,
	matched: Option<bool>,
}
impl ToggleDescriptor {
	fn decode(subject: &Element) -> Result<Self, Skip> {
		let selector = subject.get_attribute(TARGET).unwrap_or_default();
		let targets = if selector.trim().is_empty() {
			dom::closest(subject, "form").into_iter().collect()
		} else {
			dom::query_document_all(subject, &selector)
		};
		if targets.is_empty() {
			if selector.trim().is_empty() {
				warn!("Skipping <{}>: empty `{}` outside of a form.", subject.tag_name(), TARGET);
			} else {
				error!("Skipping <{}>: no toggle target found for {:?}.", subject.tag_name(), selector);
			}
			return Err(Skip);
		}

		let true_classes = dom::split_list(&subject.get_attribute(TRUE_CLASSES).unwrap_or_default());
		let false_classes = dom::split_list(&subject.get_attribute(FALSE_CLASSES).unwrap_or_default());
		let action = match scan::decode(subject, ACTION, Setting::Auto)? {
			Setting::Auto => Action::resolve_auto(!true_classes.is_empty() || !false_classes.is_empty(), &subject.tag_name()),
			Setting::Fixed(action) => action,
		};

		Ok(Self {
			subject: subject.clone(),
			targets,
			check: scan::decode(subject, TYPE, Setting::Auto)?,
			property: scan::non_blank(subject, PROPERTY).unwrap_or_else(|| "checked".to_owned()),
			values: subject
				.get_attribute(VALUES)
				.map(|values| values.split('|').map(str::to_owned).collect())
				.unwrap_or_default(),
			condition: scan::decode(subject, CONDITION, Condition::Any)?,
			action,
			true_classes,
			false_classes,
			matched: None,
		})
	}

	fn target_matches(&self, target: &Element) -> bool {
		let check = match self.check {
			Setting::Auto => Check::resolve_auto(dom::is_checkable(target), !self.values.is_empty()),
			Setting::Fixed(check) => check,
		};
		match check {
			Check::Validity => dom::check_validity(target),
			Check::Property => {
				let property = dom::read_property(target, &self.property);
				if self.values.is_empty() {
					property.is_truthy()
				} else {
					js_to_string(&property).map_or(false, |value| self.values.contains(&value))
				}
			}
			Check::Value => {
				let value = dom::read_field(target).to_text();
				trace!(value = redact(&value), "Checking value.");
				value_matches(&value, &self.values)
			}
		}
	}

	fn update(&mut self) {
		let result = self.condition.reduce(self.targets.iter().map(|target| self.target_matches(target)));
		if self.matched == Some(result) {
			return;
		}
		self.matched = Some(result);
		trace!(result, action = ?self.action, "Applying toggle.");

		dom::set_classes(&self.subject, &self.true_classes, result);
		dom::set_classes(&self.subject, &self.false_classes, !result);
		match self.action {
			Action::Enable => dom::set_flag_attribute(&self.subject, "disabled", !result),
			Action::Visible => dom::set_visible(&self.subject, result),
			Action::Required => dom::set_flag_attribute(&self.subject, "required", result),
			Action::NotRequired => dom::set_flag_attribute(&self.subject, "required", !result),
			Action::None => (),
		}
	}
}

type Descriptors = Rc<RefCell<HashMap<ElementKey, ToggleDescriptor>>>;

/// Scans for `[data-uf-toggle-target]` subjects and keeps them in sync with their targets.
#[derive(Debug)]
pub struct FormToggleHelper {
	registry: Rc<Registry>,
	root: Element,
	group: String,
	descriptors: Descriptors,
}
impl FormToggleHelper {
	pub const GROUP: &'static str = "uf-form-toggle";

	#[must_use]
	pub fn new(registry: Rc<Registry>, root: Element) -> Self {
		Self {
			registry,
			root,
			group: Self::GROUP.to_owned(),
			descriptors: Rc::default(),
		}
	}

	#[must_use]
	pub fn with_group(mut self, group: impl Into<String>) -> Self {
		self.group = group.into();
		self
	}

	#[instrument(skip(self), fields(group = %self.group))]
	pub fn scan(&self) {
		self.registry.remove_group(&self.group);
		self.descriptors.borrow_mut().clear();

		for subject in dom::query_all(&self.root, &format!("[{}]", TARGET)) {
			let descriptor = match ToggleDescriptor::decode(&subject) {
				Ok(descriptor) => descriptor,
				Err(Skip) => continue,
			};
			let key = self.registry.key_of(&subject);
			for target in &descriptor.targets {
				for event in ["input", "change"] {
					let descriptors = Rc::downgrade(&self.descriptors);
					self.registry.add_listener(&self.group, target, event, move |_| {
						let span = trace_span!("toggle_handler", ?key);
						let _enter = span.enter();
						if let Some(descriptors) = descriptors.upgrade() {
							if let Some(descriptor) = descriptors.borrow_mut().get_mut(&key) {
								descriptor.update();
							}
						}
					});
				}
			}
			self.descriptors.borrow_mut().insert(key, descriptor);
		}

		trace!("Scanned {} toggle subject(s).", self.descriptors.borrow().len());
		self.update_all();
	}

	/// Re-evaluates every subject.
	pub fn update_all(&self) {
		for descriptor in self.descriptors.borrow_mut().values_mut() {
			descriptor.update();
		}
	}

	/// The last result applied to `subject`, if it was found by the last scan.
	#[must_use]
	pub fn result_of(&self, subject: &Element) -> Option<bool> {
		self.descriptors.borrow().get(&self.registry.key_of(subject)).and_then(|descriptor| descriptor.matched)
	}

	/// Detaches all listeners and forgets all subjects.
	pub fn destroy(&self) {
		self.registry.remove_group(&self.group);
		self.descriptors.borrow_mut().clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn condition_truth_table() {
		for n in 1..4 {
			let all_valid = vec![true; n];
			let all_invalid = vec![false; n];
			let mut one_invalid = vec![true; n];
			one_invalid[n - 1] = false;
			let mut one_valid = vec![false; n];
			one_valid[0] = true;

			assert!(Condition::All.reduce(all_valid.iter().copied()));
			assert!(!Condition::All.reduce(one_invalid.iter().copied()));

			assert!(Condition::Any.reduce(one_valid.iter().copied()));
			assert!(!Condition::Any.reduce(all_invalid.iter().copied()));

			assert!(Condition::None.reduce(all_invalid.iter().copied()));
			assert!(!Condition::None.reduce(one_valid.iter().copied()));
		}
	}

	#[test]
	fn reduce_short_circuits() {
		let mut evaluated = 0;
		assert!(Condition::Any.reduce([false, true, true, true].iter().map(|&matched| {
			evaluated += 1;
			matched
		})));
		assert_eq!(evaluated, 2);

		evaluated = 0;
		assert!(!Condition::All.reduce([true, false, true].iter().map(|&matched| {
			evaluated += 1;
			matched
		})));
		assert_eq!(evaluated, 2);

		evaluated = 0;
		assert!(!Condition::None.reduce([true, false].iter().map(|&matched| {
			evaluated += 1;
			matched
		})));
		assert_eq!(evaluated, 1);
	}

	#[test]
	fn empty_target_list() {
		assert!(!Condition::Any.reduce(core::iter::empty()));
		assert!(Condition::All.reduce(core::iter::empty()));
		assert!(Condition::None.reduce(core::iter::empty()));
	}

	#[test]
	fn auto_resolution() {
		assert_eq!(Check::resolve_auto(true, true), Check::Property);
		assert_eq!(Check::resolve_auto(false, true), Check::Value);
		assert_eq!(Check::resolve_auto(false, false), Check::Validity);

		assert_eq!(Action::resolve_auto(true, "INPUT"), Action::None);
		assert_eq!(Action::resolve_auto(false, "BUTTON"), Action::Enable);
		assert_eq!(Action::resolve_auto(false, "fieldset"), Action::Enable);
		assert_eq!(Action::resolve_auto(false, "DIV"), Action::Visible);
	}

	#[test]
	fn values() {
		let values = vec!["a".to_owned(), "B".to_owned()];
		assert!(value_matches("a", &values));
		assert!(!value_matches("b", &values));
		assert!(value_matches("x", &[]));
		assert!(!value_matches("", &[]));
		assert_eq!("not-required".parse::<Action>(), Ok(Action::NotRequired));
	}
}
