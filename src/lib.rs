#![doc(html_root_url = "https://docs.rs/uf-dom/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Declarative, attribute-driven DOM behaviours.
//!
//! Each helper scans a root [`web_sys::Element`] for its `data-uf-*` marker attributes,
//! builds a side-table of descriptors and attaches its event listeners under its own event group.
//! Calling `scan()` again (after DOM mutations, for example) first removes everything the previous scan attached,
//! so scanning is idempotent.
//!
//! All helpers share one explicitly constructed [`Registry`], which owns the event groups,
//! the element key side-table and the shared error element counts of [`FormController`]s.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

mod dom;
mod rc_hash_map;
mod scan;

pub mod click_action;
pub mod element_key;
pub mod error;
pub mod event_group;
pub mod filter;
pub mod form_controller;
pub mod model;
pub mod registry;
pub mod showable;
pub mod sort;
pub mod toggle;

pub use click_action::{ClickAction, ClickActionHelper};
pub use error::{Error, Result};
pub use filter::{CellFilterHelper, FilterHelper};
pub use form_controller::{ControllerOptions, FormController, VisualOptions};
pub use model::{Model, Subscription, Value};
pub use registry::Registry;
pub use showable::Showable;
pub use sort::{grid::GridSortHelper, table::TableSortHelper};
pub use toggle::FormToggleHelper;

/// Hides page content from log fields unless the `"dangerous-logging"` feature is enabled.
pub(crate) fn redact(value: &str) -> &str {
	if cfg!(feature = "dangerous-logging") {
		value
	} else {
		"<redacted>"
	}
}
