#![cfg(target_arch = "wasm32")]
#![allow(dead_code)]

use wasm_bindgen::JsCast;
use web_sys::{window, Element, Event, EventInit, HtmlElement, HtmlInputElement, HtmlSelectElement};

static mut LOG_INITIALIZED: bool = false;

pub fn init_log() {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}
}

/// Appends a `<div>` with `html` to the body. Remove it with [`Element::remove`] at the end of the test.
pub fn mount(html: &str) -> Element {
	let document = window().unwrap().document().unwrap();
	let root = document.create_element("div").unwrap();
	root.set_inner_html(html);
	document.body().unwrap().append_child(&root).unwrap();
	root
}

pub fn by_id(id: &str) -> Element {
	window().unwrap().document().unwrap().get_element_by_id(id).unwrap_or_else(|| panic!("No element #{}", id))
}

/// Dispatches a bubbling event, the way user input does.
pub fn fire(element: &Element, name: &str) {
	let mut init = EventInit::new();
	init.bubbles(true);
	let event = Event::new_with_event_init_dict(name, &init).unwrap();
	element.dispatch_event(&event).unwrap();
}

pub fn click(element: &Element) {
	element.dyn_ref::<HtmlElement>().unwrap().click();
}

pub fn type_into(element: &Element, text: &str) {
	if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
		input.set_value(text);
	} else {
		element.dyn_ref::<HtmlSelectElement>().unwrap().set_value(text);
	}
	fire(element, "input");
}

pub fn set_checked(element: &Element, checked: bool) {
	element.dyn_ref::<HtmlInputElement>().unwrap().set_checked(checked);
	fire(element, "change");
}

pub fn is_hidden(element: &Element) -> bool {
	element.dyn_ref::<HtmlElement>().unwrap().style().get_property_value("display").unwrap() == "none"
}

/// The trimmed text of each of `parent`'s element children, in document order.
pub fn child_texts(parent: &Element) -> Vec<String> {
	let children = parent.children();
	(0..children.length())
		.filter_map(|i| children.item(i))
		.map(|child| child.text_content().unwrap_or_default().trim().to_owned())
		.collect()
}
