//! Small conveniences over `web-sys` shared by the helpers.

use crate::model::Value;
use js_sys::{Function, Reflect};
use tracing::{error, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

/// Tags whose elements can be enabled and disabled.
pub const FORM_CONTROL_TAGS: &[&str] = &["INPUT", "SELECT", "TEXTAREA", "BUTTON", "FIELDSET", "OPTGROUP", "OPTION"];

/// All elements below `root` matching `selector`, or none if the selector is invalid.
pub fn query_all(root: &Element, selector: &str) -> Vec<Element> {
	match root.query_selector_all(selector) {
		Ok(list) => (0..list.length()).filter_map(|i| list.item(i)).filter_map(|node| node.dyn_into::<Element>().ok()).collect(),
		Err(error) => {
			warn!("Invalid selector {:?}: {:?}", selector, error);
			Vec::new()
		}
	}
}

/// All elements in `element`'s document matching `selector`, or none if the selector is invalid.
pub fn query_document_all(element: &Element, selector: &str) -> Vec<Element> {
	let document = match element.owner_document() {
		Some(document) => document,
		None => {
			error!("No owner document found for element.");
			return Vec::new();
		}
	};
	match document.query_selector_all(selector) {
		Ok(list) => (0..list.length()).filter_map(|i| list.item(i)).filter_map(|node| node.dyn_into::<Element>().ok()).collect(),
		Err(error) => {
			warn!("Invalid selector {:?}: {:?}", selector, error);
			Vec::new()
		}
	}
}

pub fn closest(element: &Element, selector: &str) -> Option<Element> {
	element.closest(selector).unwrap_or_else(|error| {
		warn!("Invalid selector {:?}: {:?}", selector, error);
		None
	})
}

pub fn children(element: &Element) -> Vec<Element> {
	let children = element.children();
	(0..children.length()).filter_map(|i| children.item(i)).collect()
}

/// Splits a whitespace-separated attribute value.
pub fn split_list(value: &str) -> Vec<String> {
	value.split_whitespace().map(str::to_owned).collect()
}

pub fn set_classes(element: &Element, classes: &[String], present: bool) {
	let class_list = element.class_list();
	for class in classes {
		let result = if present { class_list.add_1(class) } else { class_list.remove_1(class) };
		if let Err(error) = result {
			warn!("Could not update class {:?}: {:?}", class, error);
		}
	}
}

pub fn set_flag_attribute(element: &Element, name: &str, present: bool) {
	let result = if present { element.set_attribute(name, "") } else { element.remove_attribute(name) };
	if let Err(error) = result {
		warn!("Could not update attribute {:?}: {:?}", name, error);
	}
}

pub fn set_attribute(element: &Element, name: &str, value: Option<&str>) {
	let result = match value {
		Some(value) => element.set_attribute(name, value),
		None => element.remove_attribute(name),
	};
	if let Err(error) = result {
		warn!("Could not update attribute {:?}: {:?}", name, error);
	}
}

pub fn set_visible(element: &Element, visible: bool) {
	let html_element = match element.dyn_ref::<HtmlElement>() {
		Some(html_element) => html_element,
		None => return warn!("Can't change the visibility of non-HTML element <{}>.", element.tag_name()),
	};
	let style = html_element.style();
	let result = if visible { style.remove_property("display").map(drop) } else { style.set_property("display", "none") };
	if let Err(error) = result {
		warn!("Could not change visibility: {:?}", error);
	}
}

pub fn is_visible(element: &Element) -> bool {
	element
		.dyn_ref::<HtmlElement>()
		.map_or(true, |html_element| html_element.style().get_property_value("display").map_or(true, |display| display != "none"))
}

/// The rendered text of `element`, or its text content if it isn't an HTML element.
pub fn text_of(element: &Element) -> String {
	match element.dyn_ref::<HtmlElement>() {
		Some(html_element) => html_element.inner_text(),
		None => element.text_content().unwrap_or_default(),
	}
}

/// An attribute override, falling back to the element's text.
pub fn attribute_or_text(element: &Element, attribute: &str) -> String {
	element.get_attribute(attribute).unwrap_or_else(|| text_of(element))
}

pub fn is_checkable(element: &Element) -> bool {
	element.dyn_ref::<HtmlInputElement>().map_or(false, |input| {
		let kind = input.type_();
		kind.eq_ignore_ascii_case("checkbox") || kind.eq_ignore_ascii_case("radio")
	})
}

pub fn read_property(element: &Element, property: &str) -> JsValue {
	Reflect::get(element.as_ref(), &JsValue::from_str(property)).unwrap_or(JsValue::UNDEFINED)
}

/// Calls the element's native `checkValidity()`. Elements without one are valid.
pub fn check_validity(element: &Element) -> bool {
	match read_property(element, "checkValidity").dyn_into::<Function>() {
		Ok(check_validity) => check_validity.call0(element.as_ref()).map_or_else(
			|error| {
				warn!("`checkValidity()` threw: {:?}", error);
				false
			},
			|valid| valid.is_truthy(),
		),
		Err(_) => true,
	}
}

/// The current value of a form field.
pub fn read_field(element: &Element) -> Value {
	if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
		if is_checkable(element) {
			Value::Flag(input.checked())
		} else {
			Value::Text(input.value())
		}
	} else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
		Value::Text(select.value())
	} else if let Some(text_area) = element.dyn_ref::<HtmlTextAreaElement>() {
		Value::Text(text_area.value())
	} else {
		Value::Text(element.text_content().unwrap_or_default())
	}
}

pub fn write_field(element: &Element, value: &Value) {
	if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
		if is_checkable(element) {
			input.set_checked(value.is_truthy());
		} else {
			input.set_value(&value.to_text());
		}
	} else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
		select.set_value(&value.to_text());
	} else if let Some(text_area) = element.dyn_ref::<HtmlTextAreaElement>() {
		text_area.set_value(&value.to_text());
	} else {
		element.set_text_content(Some(&value.to_text()));
	}
}

/// Appends a `<style>` element with the given id and rules to the document head, unless one already exists.
pub fn install_style_once(document: &Document, id: &str, css: &str) {
	if document.get_element_by_id(id).is_some() {
		return;
	}
	let style = match document.create_element("style") {
		Ok(style) => style,
		Err(error) => return error!("Could not create <style>: {:?}", error),
	};
	style.set_id(id);
	style.set_text_content(Some(css));
	let parent: Option<Element> = document.head().map(Into::into).or_else(|| document.document_element());
	match parent {
		Some(parent) => {
			if let Err(error) = parent.append_child(&style) {
				error!("Could not insert <style>: {:?}", error);
			}
		}
		None => error!("No document element to insert <style> into."),
	}
}
