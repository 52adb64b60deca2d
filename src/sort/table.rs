//! Click-to-sort tables.
//!
//! ```html
//! <table data-uf-table-sort="orders-sort">
//!     <thead><tr><th>Customer</th><th data-uf-sort-type="number">Total</th><th data-uf-sort-type="none"></th></tr></thead>
//!     <tbody>
//!         <tr data-uf-sort-location="top"><td>Pinned</td><td>0</td><td></td></tr>
//!         <tr><td>Alice</td><td data-uf-sort-value="1200">1.200,00</td><td></td></tr>
//!     </tbody>
//! </table>
//! ```

use super::{
	order::{next_sort, sorted_order, Location, SortEntry},
	persist::{restore_index, ColumnSortInfo, SortStorage},
	show_sort_state, storage_key,
	value::{SortType, SortValue},
	SORT_LOCATION, SORT_TYPE, SORT_VALUE,
};
use crate::{
	dom,
	element_key::ElementKey,
	error::{Error, Result},
	registry::Registry,
	scan::{self, Skip},
};
use core::cell::RefCell;
use hashbrown::HashMap;
use std::rc::Rc;
use tracing::{error, instrument, trace, trace_span, warn};
use web_sys::Element;

/// Marks a sortable table. The value is an optional `localStorage` key.
pub const TABLE: &str = "data-uf-table-sort";

#[derive(Debug)]
struct Column {
	header: Element,
	index: usize,
	kind: SortType,
}

#[derive(Debug)]
struct Body {
	element: Element,
	rows: Vec<Element>,
	entries: Vec<SortEntry>,
}

#[derive(Debug)]
struct TableEntry {
	storage_key: Option<String>,
	columns: Vec<Column>,
	bodies: Vec<Body>,
	active: Option<(usize, bool)>,
}

pub(crate) fn cells(row: &Element) -> Vec<Element> {
	dom::children(row)
		.into_iter()
		.filter(|cell| cell.tag_name().eq_ignore_ascii_case("TD") || cell.tag_name().eq_ignore_ascii_case("TH"))
		.collect()
}

fn row_entry(row: &Element, columns: &[Column]) -> SortEntry {
	let cells = cells(row);
	let width = columns.iter().map(|column| column.index + 1).max().unwrap_or(0);
	let mut values = vec![SortValue::Missing; width];
	for column in columns {
		if let Some(cell) = cells.get(column.index) {
			values[column.index] = SortValue::parse(column.kind, Some(&dom::attribute_or_text(cell, SORT_VALUE)));
		}
	}
	SortEntry {
		location: Location::from_attribute(row.get_attribute(SORT_LOCATION).as_deref()),
		values,
	}
}

impl TableEntry {
	fn decode(table: &Element) -> core::result::Result<Self, Skip> {
		let header_row = if dom::query_all(table, ":scope > thead").is_empty() {
			dom::query_all(table, ":scope > tbody > tr, :scope > tr").into_iter().next()
		} else {
			dom::query_all(table, ":scope > thead > tr").into_iter().next()
		};
		let header_row = match header_row {
			Some(header_row) => header_row,
			None => {
				warn!("Skipping sortable table without header row.");
				return Err(Skip);
			}
		};

		let mut columns = Vec::new();
		for (index, header) in cells(&header_row).into_iter().enumerate() {
			if header.get_attribute(SORT_TYPE).map_or(false, |kind| kind.trim().eq_ignore_ascii_case("none")) {
				continue;
			}
			if let Ok(kind) = scan::decode(&header, SORT_TYPE, SortType::Text) {
				columns.push(Column { header, index, kind });
			}
		}
		if columns.is_empty() {
			warn!("Skipping table without sortable columns.");
			return Err(Skip);
		}

		let bodies = dom::query_all(table, ":scope > tbody")
			.into_iter()
			.map(|body| {
				let rows: Vec<Element> = dom::children(&body)
					.into_iter()
					.filter(|row| row.tag_name().eq_ignore_ascii_case("TR") && *row != header_row)
					.collect();
				let entries = rows.iter().map(|row| row_entry(row, &columns)).collect();
				Body { element: body, rows, entries }
			})
			.collect();

		Ok(Self {
			storage_key: storage_key(table, TABLE),
			columns,
			bodies,
			active: None,
		})
	}

	fn sortable_columns(&self) -> Vec<usize> {
		self.columns.iter().map(|column| column.index).collect()
	}

	fn sort(&mut self, index: usize, descending: bool) {
		let span = trace_span!("Sorting table", index, descending);
		let _enter = span.enter();

		for body in &mut self.bodies {
			let order = sorted_order(&body.entries, index, descending);
			body.rows = order.iter().map(|&i| body.rows[i].clone()).collect();
			body.entries = order.iter().map(|&i| body.entries[i].clone()).collect();
			for row in &body.rows {
				if let Err(error) = body.element.append_child(row) {
					error!("Failed to reinsert row: {:?}", error);
				}
			}
		}

		self.active = Some((index, descending));
		for column in &self.columns {
			show_sort_state(&column.header, (column.index == index).then(|| descending), true);
		}
	}

	fn click(&mut self, index: usize, storage: &SortStorage) {
		let (index, descending) = next_sort(self.active, index);
		self.sort(index, descending);
		if let Some(storage_key) = &self.storage_key {
			if let Err(error) = storage.save(storage_key, &ColumnSortInfo { index, descending }) {
				warn!("Could not store sort preference: {}", error);
			}
		}
	}
}

/// Sorts `table[data-uf-table-sort]` bodies when header cells are clicked.
#[derive(Debug)]
pub struct TableSortHelper {
	registry: Rc<Registry>,
	root: Element,
	group: String,
	storage: Rc<SortStorage>,
	tables: Rc<RefCell<HashMap<ElementKey, TableEntry>>>,
}
impl TableSortHelper {
	pub const GROUP: &'static str = "uf-table-sort";

	#[must_use]
	pub fn new(registry: Rc<Registry>, root: Element) -> Self {
		Self {
			registry,
			root,
			group: Self::GROUP.to_owned(),
			storage: Rc::new(SortStorage::local()),
			tables: Rc::default(),
		}
	}

	#[must_use]
	pub fn with_group(mut self, group: impl Into<String>) -> Self {
		self.group = group.into();
		self
	}

	/// Finds sortable tables, restores their stored (or default) order and listens for header clicks.
	#[instrument(skip(self), fields(group = %self.group))]
	pub fn scan(&self) {
		self.registry.remove_group(&self.group);
		self.tables.borrow_mut().clear();

		for table in dom::query_all(&self.root, &format!("[{}]", TABLE)) {
			let mut entry = match TableEntry::decode(&table) {
				Ok(entry) => entry,
				Err(Skip) => continue,
			};
			let key = self.registry.key_of(&table);

			for column in &entry.columns {
				let index = column.index;
				let tables = Rc::downgrade(&self.tables);
				let storage = Rc::clone(&self.storage);
				self.registry.add_listener(&self.group, &column.header, "click", move |_| {
					if let Some(tables) = tables.upgrade() {
						if let Some(entry) = tables.borrow_mut().get_mut(&key) {
							entry.click(index, &storage);
						}
					}
				});
			}

			let stored = entry.storage_key.as_deref().and_then(|storage_key| self.storage.load::<ColumnSortInfo>(storage_key));
			if let Some(ColumnSortInfo { index, descending }) = restore_index(stored, &entry.sortable_columns()) {
				entry.sort(index, descending);
			}
			self.tables.borrow_mut().insert(key, entry);
		}
		trace!("Scanned {} table(s).", self.tables.borrow().len());
	}

	/// Sorts `table` by the column at `index`. This doesn't store a preference.
	///
	/// # Errors
	///
	/// [`Error::NotScanned`] if `table` wasn't found by the last scan,
	/// [`Error::UnknownSortColumn`] if the column isn't sortable.
	pub fn sort(&self, table: &Element, index: usize, descending: bool) -> Result<()> {
		let mut tables = self.tables.borrow_mut();
		let entry = tables.get_mut(&self.registry.key_of(table)).ok_or(Error::NotScanned)?;
		if !entry.sortable_columns().contains(&index) {
			return Err(Error::UnknownSortColumn { index });
		}
		entry.sort(index, descending);
		Ok(())
	}

	/// The active `(column, descending)` pair of `table`.
	#[must_use]
	pub fn active(&self, table: &Element) -> Option<(usize, bool)> {
		self.tables.borrow().get(&self.registry.key_of(table)).and_then(|entry| entry.active)
	}

	pub fn destroy(&self) {
		self.registry.remove_group(&self.group);
		self.tables.borrow_mut().clear();
	}
}
