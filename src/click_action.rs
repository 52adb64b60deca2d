//! Declarative click actions, including opening and closing dialogs.
//!
//! ```html
//! <button data-uf-click-action="open-dialog" data-uf-click-target="#confirm">Delete…</button>
//! <dialog id="confirm">
//!     <button data-uf-click-action="close-dialog">Cancel</button>
//! </dialog>
//! <button data-uf-click-action="toggle-class" data-uf-click-class="expanded" data-uf-click-target="#details">More</button>
//! ```

use crate::{
	dom,
	registry::Registry,
	scan::{self, keywords, Skip},
};
use core::cell::Cell;
use std::rc::Rc;
use tracing::{error, instrument, trace, warn};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlDialogElement};

pub const ACTION: &str = "data-uf-click-action";
pub const TARGET: &str = "data-uf-click-target";
pub const CLASS: &str = "data-uf-click-class";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
	Show,
	Hide,
	Toggle,
	Remove,
	ToggleClass,
	OpenDialog,
	CloseDialog,
}
keywords!(ClickAction {
	"show" => Show,
	"hide" => Hide,
	"toggle" => Toggle,
	"remove" => Remove,
	"toggle-class" => ToggleClass,
	"open-dialog" => OpenDialog,
	"close-dialog" => CloseDialog,
});

#[derive(Debug, Clone)]
struct ClickDescriptor {
	element: Element,
	action: ClickAction,
	target: Option<String>,
	class: Option<String>,
}
impl ClickDescriptor {
	fn decode(element: Element) -> Result<Self, Skip> {
		let action = match scan::non_blank(&element, ACTION) {
			Some(action) => action.parse().map_err(|error| {
				warn!("Skipping <{}>: {} in `{}`.", element.tag_name(), error, ACTION);
				Skip
			})?,
			None => {
				warn!("Skipping <{}> with empty `{}`.", element.tag_name(), ACTION);
				return Err(Skip);
			}
		};
		let class = scan::non_blank(&element, CLASS);
		if action == ClickAction::ToggleClass && class.is_none() {
			warn!("Skipping `toggle-class` action without `{}`.", CLASS);
			return Err(Skip);
		}
		Ok(Self {
			target: scan::non_blank(&element, TARGET),
			element,
			action,
			class,
		})
	}

	fn targets(&self) -> Vec<Element> {
		match &self.target {
			Some(selector) => dom::query_document_all(&self.element, selector),
			None if self.action == ClickAction::CloseDialog => dom::closest(&self.element, "dialog").into_iter().collect(),
			None => vec![self.element.clone()],
		}
	}

	fn run(&self) {
		let targets = self.targets();
		if targets.is_empty() {
			return error!(action = ?self.action, target = ?self.target, "Click action target not found.");
		}
		for target in &targets {
			self.apply(target);
		}
	}

	fn apply(&self, target: &Element) {
		match self.action {
			ClickAction::Show => dom::set_visible(target, true),
			ClickAction::Hide => dom::set_visible(target, false),
			ClickAction::Toggle => dom::set_visible(target, !dom::is_visible(target)),
			ClickAction::Remove => target.remove(),
			ClickAction::ToggleClass => {
				if let Some(class) = &self.class {
					if let Err(error) = target.class_list().toggle(class) {
						warn!("Could not toggle class {:?}: {:?}", class, error);
					}
				}
			}
			ClickAction::OpenDialog => match target.dyn_ref::<HtmlDialogElement>() {
				Some(dialog) if dialog.open() => trace!("Dialog is already open."),
				Some(dialog) => {
					if let Err(error) = dialog.show_modal() {
						error!("Could not open dialog: {:?}", error);
					}
				}
				None => error!("Click action target <{}> is not a <dialog>.", target.tag_name()),
			},
			ClickAction::CloseDialog => match target.dyn_ref::<HtmlDialogElement>() {
				Some(dialog) => dialog.close(),
				None => error!("Click action target <{}> is not a <dialog>.", target.tag_name()),
			},
		}
	}
}

/// Runs the `[data-uf-click-action]` of elements when they're clicked.
#[derive(Debug)]
pub struct ClickActionHelper {
	registry: Rc<Registry>,
	root: Element,
	group: String,
	count: Cell<usize>,
}
impl ClickActionHelper {
	pub const GROUP: &'static str = "uf-click-action";

	#[must_use]
	pub fn new(registry: Rc<Registry>, root: Element) -> Self {
		Self {
			registry,
			root,
			group: Self::GROUP.to_owned(),
			count: Cell::new(0),
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

		let mut count = 0;
		for element in dom::query_all(&self.root, &format!("[{}]", ACTION)) {
			let descriptor = match ClickDescriptor::decode(element) {
				Ok(descriptor) => descriptor,
				Err(Skip) => continue,
			};
			let target = descriptor.element.clone();
			self.registry.add_listener(&self.group, &target, "click", move |event| {
				if descriptor.element.tag_name().eq_ignore_ascii_case("A") {
					event.prevent_default();
				}
				descriptor.run();
			});
			count += 1;
		}
		self.count.set(count);
		trace!("Scanned {} click action(s).", count);
	}

	/// How many elements the last scan attached actions to.
	#[must_use]
	pub fn action_count(&self) -> usize {
		self.count.get()
	}

	pub fn destroy(&self) {
		self.registry.remove_group(&self.group);
		self.count.set(0);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn actions() {
		assert_eq!("open-dialog".parse::<ClickAction>(), Ok(ClickAction::OpenDialog));
		assert_eq!("Toggle-Class".parse::<ClickAction>(), Ok(ClickAction::ToggleClass));
		assert!("explode".parse::<ClickAction>().is_err());
	}
}
