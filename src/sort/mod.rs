//! Table and grid sorting.
//!
//! Both variants cache a [`SortEntry`](`order::SortEntry`) per row or item at scan time,
//! keep exactly one active `(column, direction)` pair per table or grid,
//! and physically reorder the DOM to match it.

use crate::dom;
use web_sys::Element;

pub mod grid;
pub mod order;
pub mod persist;
pub mod table;
pub mod value;

pub const SORT_TYPE: &str = "data-uf-sort-type";
pub const SORT_VALUE: &str = "data-uf-sort-value";
pub const SORT_LOCATION: &str = "data-uf-sort-location";
/// Set to `ascending` or `descending` on the active header cell or control.
pub const SORT_STATE: &str = "data-uf-sort-state";

/// Marks `element` as the active sort control in the given direction, or as inactive.
fn show_sort_state(element: &Element, descending: Option<bool>, aria: bool) {
	let state = descending.map(|descending| if descending { "descending" } else { "ascending" });
	dom::set_attribute(element, SORT_STATE, state);
	if aria {
		dom::set_attribute(element, "aria-sort", state);
	}
}

/// The storage key configured by a marker attribute's value, if any.
fn storage_key(element: &Element, attribute: &str) -> Option<String> {
	crate::scan::non_blank(element, attribute)
}
