//! Free-text filtering of element children and table rows.
//!
//! Matching only sets or removes the `data-uf-filter-no-match` attribute.
//! A stylesheet rule, injected once per document, hides everything carrying it.
//!
//! ```html
//! <input type="search" data-uf-filter-target="#people">
//! <ul id="people">
//!     <li data-uf-no-filter>Always shown</li>
//!     <li data-uf-filter-group="smiths">Alice Smith</li>
//!     <li data-uf-filter-group="smiths">(spouse)</li>  <!-- Shown whenever "smith" matches. -->
//!     <li data-uf-filter-container>
//!         <span>Bob</span> <span data-uf-filter-value="robert">Rob</span>
//!     </li>
//! </ul>
//! ```

use crate::{
	dom, redact,
	registry::Registry,
	scan::{self, Skip},
	sort::table::cells,
};
use core::{cell::RefCell, ops::Range};
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{instrument, trace, trace_span, warn};
use web_sys::Element;

pub const TARGET: &str = "data-uf-filter-target";
pub const CELL_FILTER: &str = "data-uf-cell-filter";
pub const COLUMN: &str = "data-uf-filter-column";
pub const NO_FILTER: &str = "data-uf-no-filter";
pub const CONTAINER: &str = "data-uf-filter-container";
pub const VALUE: &str = "data-uf-filter-value";
pub const GROUP: &str = "data-uf-filter-group";
pub const NO_MATCH: &str = "data-uf-filter-no-match";

const STYLE_ID: &str = "uf-filter-style";

/// Whether `text` contains `query`, ignoring case. `query` must already be lower-case.
#[must_use]
pub fn text_matches(text: &str, query: &str) -> bool {
	query.is_empty() || text.to_lowercase().contains(query)
}

/// Spreads matches over groups: every candidate sharing a group gets `true` if any member matched.
/// Ungrouped candidates keep their own result.
#[must_use]
pub fn reduce_groups(candidates: &[(Option<&str>, bool)]) -> Vec<bool> {
	let mut groups: HashMap<&str, bool> = HashMap::new();
	for &(group, matched) in candidates {
		if let Some(group) = group {
			*groups.entry(group).or_insert(false) |= matched;
		}
	}
	candidates
		.iter()
		.map(|&(group, matched)| group.and_then(|group| groups.get(group).copied()).unwrap_or(matched))
		.collect()
}

fn install_style(root: &Element) {
	if let Some(document) = root.owner_document() {
		dom::install_style_once(&document, STYLE_ID, &format!("[{}]{{display:none!important}}", NO_MATCH));
	}
}

fn query_of(input: &Element) -> String {
	dom::read_field(input).to_text().trim().to_lowercase()
}

/// Filters the direct children of `target` (and of its containers) by `query`.
fn filter_children(target: &Element, query: &str) {
	let mut candidates = Vec::new();
	let mut containers: Vec<(Element, Range<usize>)> = Vec::new();
	for child in dom::children(target) {
		if child.has_attribute(NO_FILTER) {
			continue;
		}
		if child.has_attribute(CONTAINER) {
			let start = candidates.len();
			candidates.extend(dom::children(&child).into_iter().filter(|member| !member.has_attribute(NO_FILTER)));
			containers.push((child, start..candidates.len()));
		} else {
			candidates.push(child);
		}
	}

	let groups: Vec<Option<String>> = candidates.iter().map(|candidate| scan::non_blank(candidate, GROUP)).collect();
	let raw: Vec<(Option<&str>, bool)> = candidates
		.iter()
		.zip(&groups)
		.map(|(candidate, group)| (group.as_deref(), text_matches(&dom::attribute_or_text(candidate, VALUE), query)))
		.collect();
	let matches = reduce_groups(&raw);

	for (candidate, &matched) in candidates.iter().zip(&matches) {
		dom::set_flag_attribute(candidate, NO_MATCH, !matched);
	}
	for (container, members) in containers {
		let shown = query.is_empty() || matches[members].iter().any(|&matched| matched);
		dom::set_flag_attribute(&container, NO_MATCH, !shown);
	}
	trace!("Filtered {} candidate(s).", candidates.len());
}

/// Filters the body rows of `table` by `query`, matching all cells or only the one at `column`.
fn filter_rows(table: &Element, query: &str, column: Option<usize>) {
	for row in dom::query_all(table, ":scope > tbody > tr") {
		if row.has_attribute(NO_FILTER) {
			dom::set_flag_attribute(&row, NO_MATCH, false);
			continue;
		}
		let cells = cells(&row);
		let text = match column {
			Some(column) => cells.get(column).map(dom::text_of).unwrap_or_default(),
			None => cells.iter().map(dom::text_of).collect::<Vec<_>>().join(" "),
		};
		dom::set_flag_attribute(&row, NO_MATCH, !text_matches(&text, query));
	}
}

#[derive(Debug, Clone)]
struct FilterInput {
	input: Element,
	selector: String,
}
impl FilterInput {
	fn apply(&self) {
		let query = query_of(&self.input);
		let span = trace_span!("Filtering", selector = %self.selector, query = redact(&query));
		let _enter = span.enter();
		for target in dom::query_document_all(&self.input, &self.selector) {
			filter_children(&target, &query);
		}
	}
}

/// Filters the children of `[data-uf-filter-target]` inputs' targets as the user types.
#[derive(Debug)]
pub struct FilterHelper {
	registry: Rc<Registry>,
	root: Element,
	group: String,
	inputs: RefCell<Vec<FilterInput>>,
}
impl FilterHelper {
	pub const GROUP: &'static str = "uf-filter";

	#[must_use]
	pub fn new(registry: Rc<Registry>, root: Element) -> Self {
		Self {
			registry,
			root,
			group: Self::GROUP.to_owned(),
			inputs: RefCell::default(),
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
		install_style(&self.root);

		let mut inputs = Vec::new();
		for input in dom::query_all(&self.root, &format!("[{}]", TARGET)) {
			let selector = match scan::non_blank(&input, TARGET) {
				Some(selector) => selector,
				None => {
					warn!("Skipping filter input without target selector.");
					continue;
				}
			};
			let filter_input = FilterInput { input, selector };
			for event in ["input", "change"] {
				let filter_input_ = filter_input.clone();
				self.registry.add_listener(&self.group, &filter_input.input, event, move |_| filter_input_.apply());
			}
			inputs.push(filter_input);
		}
		*self.inputs.borrow_mut() = inputs;
		self.apply();
	}

	/// Re-applies every input's current query.
	pub fn apply(&self) {
		for input in self.inputs.borrow().iter() {
			input.apply();
		}
	}

	pub fn destroy(&self) {
		self.registry.remove_group(&self.group);
		self.inputs.borrow_mut().clear();
	}
}

#[derive(Debug, Clone)]
struct CellFilterInput {
	input: Element,
	selector: String,
	column: Option<usize>,
}
impl CellFilterInput {
	fn decode(input: Element) -> Result<Self, Skip> {
		let selector = scan::non_blank(&input, CELL_FILTER).ok_or_else(|| {
			warn!("Skipping cell filter input without table selector.");
			Skip
		})?;
		let column = match scan::non_blank(&input, COLUMN) {
			Some(column) => Some(column.parse().map_err(|_| {
				warn!("Skipping cell filter input with invalid column {:?}.", column);
				Skip
			})?),
			None => None,
		};
		Ok(Self { input, selector, column })
	}

	fn apply(&self) {
		let query = query_of(&self.input);
		let span = trace_span!("Filtering rows", selector = %self.selector, column = ?self.column, query = redact(&query));
		let _enter = span.enter();
		for table in dom::query_document_all(&self.input, &self.selector) {
			filter_rows(&table, &query, self.column);
		}
	}
}

/// Filters table rows by the text of their cells as the user types into `[data-uf-cell-filter]` inputs.
#[derive(Debug)]
pub struct CellFilterHelper {
	registry: Rc<Registry>,
	root: Element,
	group: String,
	inputs: RefCell<Vec<CellFilterInput>>,
}
impl CellFilterHelper {
	pub const GROUP: &'static str = "uf-cell-filter";

	#[must_use]
	pub fn new(registry: Rc<Registry>, root: Element) -> Self {
		Self {
			registry,
			root,
			group: Self::GROUP.to_owned(),
			inputs: RefCell::default(),
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
		install_style(&self.root);

		let mut inputs = Vec::new();
		for input in dom::query_all(&self.root, &format!("[{}]", CELL_FILTER)) {
			let cell_filter_input = match CellFilterInput::decode(input) {
				Ok(cell_filter_input) => cell_filter_input,
				Err(Skip) => continue,
			};
			for event in ["input", "change"] {
				let cell_filter_input_ = cell_filter_input.clone();
				self.registry.add_listener(&self.group, &cell_filter_input.input, event, move |_| cell_filter_input_.apply());
			}
			inputs.push(cell_filter_input);
		}
		*self.inputs.borrow_mut() = inputs;
		self.apply();
	}

	pub fn apply(&self) {
		for input in self.inputs.borrow().iter() {
			input.apply();
		}
	}

	pub fn destroy(&self) {
		self.registry.remove_group(&self.group);
		self.inputs.borrow_mut().clear();
	}
}
