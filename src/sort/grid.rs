//! Sorting of arbitrary item layouts ("grids") through separate sort controls.
//!
//! ```html
//! <div data-uf-grid-sort="products-sort">
//!     <button data-uf-sort-control="name">Name</button>
//!     <button data-uf-sort-control="price" data-uf-sort-type="number">Price</button>
//!     <ul>
//!         <li data-uf-sort-item><span data-uf-sort-key="name">Teapot</span> <span data-uf-sort-key="price">12</span></li>
//!         <li data-uf-sort-item data-uf-sort-group="cups"><span data-uf-sort-key="name">Cup</span></li>
//!         <li data-uf-sort-item data-uf-sort-group="cups"><span data-uf-sort-key="price">4</span></li>
//!         <li data-uf-sort-anchor>Not sorted, always after the items.</li>
//!     </ul>
//! </div>
//! ```

use super::{
	order::{next_sort, sorted_order, Location, SortEntry},
	persist::{restore_key, SortInfo, SortStorage},
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
use web_sys::{Element, Node};

/// Marks a grid. The value is an optional `localStorage` key.
pub const GRID: &str = "data-uf-grid-sort";
pub const CONTROL: &str = "data-uf-sort-control";
pub const BUTTON: &str = "data-uf-sort-button";
pub const ITEM: &str = "data-uf-sort-item";
pub const KEY: &str = "data-uf-sort-key";
pub const GROUP: &str = "data-uf-sort-group";
pub const ANCHOR: &str = "data-uf-sort-anchor";

#[derive(Debug)]
struct Control {
	element: Element,
	button: Element,
	key: String,
	kind: SortType,
}

/// Items sorted together: either one ungrouped item or all items of one group, in document order.
#[derive(Debug, Clone)]
struct Unit {
	members: Vec<Element>,
	entry: SortEntry,
}

#[derive(Debug)]
struct GridEntry {
	storage_key: Option<String>,
	controls: Vec<Control>,
	units: Vec<Unit>,
	active: Option<(usize, bool)>,
}

/// The raw value of `key` on `item`: from the item itself or its first descendant tagged with that key.
fn raw_value(item: &Element, key: &str) -> Option<String> {
	let source = if item.get_attribute(KEY).as_deref() == Some(key) {
		Some(item.clone())
	} else {
		dom::query_all(item, &format!("[{}]", KEY)).into_iter().find(|source| source.get_attribute(KEY).as_deref() == Some(key))
	};
	source.map(|source| dom::attribute_or_text(&source, SORT_VALUE))
}

fn decode_controls(grid: &Element) -> Vec<Control> {
	let mut controls: Vec<Control> = Vec::new();
	for element in dom::query_all(grid, &format!("[{}]", CONTROL)) {
		let key = match scan::non_blank(&element, CONTROL) {
			Some(key) => key,
			None => {
				warn!("Skipping sort control without key.");
				continue;
			}
		};
		if controls.iter().any(|control| control.key == key) {
			warn!("Skipping duplicate sort control {:?}.", key);
			continue;
		}
		let kind = match scan::decode(&element, SORT_TYPE, SortType::Text) {
			Ok(kind) => kind,
			Err(Skip) => continue,
		};
		let button = dom::query_all(&element, &format!("[{}]", BUTTON)).into_iter().next().unwrap_or_else(|| element.clone());
		controls.push(Control { element, button, key, kind });
	}
	controls
}

/// Groups items into units. A unit's values and location come from the first member providing them.
fn decode_units(grid: &Element, controls: &[Control]) -> Vec<Unit> {
	let mut units: Vec<Unit> = Vec::new();
	let mut groups: HashMap<String, usize> = HashMap::new();
	for item in dom::query_all(grid, &format!("[{}]", ITEM)) {
		let values: Vec<SortValue> = controls.iter().map(|control| SortValue::parse(control.kind, raw_value(&item, &control.key).as_deref())).collect();
		let group = scan::non_blank(&item, GROUP);
		match group.as_ref().and_then(|group| groups.get(group)) {
			Some(&unit) => {
				let unit = &mut units[unit];
				for (existing, value) in unit.entry.values.iter_mut().zip(values) {
					if existing.is_missing() {
						*existing = value;
					}
				}
				unit.members.push(item);
			}
			None => {
				if let Some(group) = group {
					groups.insert(group, units.len());
				}
				units.push(Unit {
					entry: SortEntry {
						location: Location::from_attribute(item.get_attribute(SORT_LOCATION).as_deref()),
						values,
					},
					members: vec![item],
				});
			}
		}
	}
	units
}

fn anchor_of(parent: &Element) -> Option<Element> {
	dom::children(parent).into_iter().find(|child| child.has_attribute(ANCHOR))
}

impl GridEntry {
	fn decode(grid: &Element) -> core::result::Result<Self, Skip> {
		let controls = decode_controls(grid);
		if controls.is_empty() {
			warn!("Skipping grid without sort controls.");
			return Err(Skip);
		}
		let units = decode_units(grid, &controls);
		Ok(Self {
			storage_key: storage_key(grid, GRID),
			controls,
			units,
			active: None,
		})
	}

	fn index_of(&self, key: &str) -> Option<usize> {
		self.controls.iter().position(|control| control.key == key)
	}

	fn sort(&mut self, registry: &Registry, index: usize, descending: bool) {
		let span = trace_span!("Sorting grid", key = %self.controls[index].key, descending);
		let _enter = span.enter();

		let entries: Vec<SortEntry> = self.units.iter().map(|unit| unit.entry.clone()).collect();
		let order = sorted_order(&entries, index, descending);
		self.units = order.iter().map(|&i| self.units[i].clone()).collect();
		self.reinsert(registry);

		self.active = Some((index, descending));
		for (i, control) in self.controls.iter().enumerate() {
			show_sort_state(&control.element, (i == index).then(|| descending), false);
		}
	}

	/// Moves all items into unit order.
	///
	/// Per parent, the first moved item goes before the parent's anchor (or to its end),
	/// and each further one right after the previously moved item. Other children keep their places.
	fn reinsert(&self, registry: &Registry) {
		let mut last_inserted: HashMap<ElementKey, Element> = HashMap::new();
		for member in self.units.iter().flat_map(|unit| &unit.members) {
			let parent = match member.parent_element() {
				Some(parent) => parent,
				None => {
					error!("Sort item was removed from the document. Rescan after removing items.");
					continue;
				}
			};
			let parent_key = registry.key_of(&parent);
			let reference: Option<Node> = match last_inserted.get(&parent_key) {
				Some(last) => last.next_sibling(),
				None => anchor_of(&parent).map(Into::into),
			};
			if let Err(error) = parent.insert_before(member, reference.as_ref()) {
				error!("Failed to reinsert sort item: {:?}", error);
				continue;
			}
			last_inserted.insert(parent_key, member.clone());
		}
	}

	fn click(&mut self, registry: &Registry, index: usize, storage: &SortStorage) {
		let (index, descending) = next_sort(self.active, index);
		self.sort(registry, index, descending);
		if let Some(storage_key) = &self.storage_key {
			let info = SortInfo {
				key: self.controls[index].key.clone(),
				descending,
			};
			if let Err(error) = storage.save(storage_key, &info) {
				warn!("Could not store sort preference: {}", error);
			}
		}
	}
}

/// Sorts the items of `[data-uf-grid-sort]` containers through their sort controls.
#[derive(Debug)]
pub struct GridSortHelper {
	registry: Rc<Registry>,
	root: Element,
	group: String,
	storage: Rc<SortStorage>,
	grids: Rc<RefCell<HashMap<ElementKey, GridEntry>>>,
}
impl GridSortHelper {
	pub const GROUP: &'static str = "uf-grid-sort";

	#[must_use]
	pub fn new(registry: Rc<Registry>, root: Element) -> Self {
		Self {
			registry,
			root,
			group: Self::GROUP.to_owned(),
			storage: Rc::new(SortStorage::local()),
			grids: Rc::default(),
		}
	}

	#[must_use]
	pub fn with_group(mut self, group: impl Into<String>) -> Self {
		self.group = group.into();
		self
	}

	/// Finds grids, restores their stored (or default) order and listens for control clicks.
	#[instrument(skip(self), fields(group = %self.group))]
	pub fn scan(&self) {
		self.registry.remove_group(&self.group);
		self.grids.borrow_mut().clear();

		for grid in dom::query_all(&self.root, &format!("[{}]", GRID)) {
			let mut entry = match GridEntry::decode(&grid) {
				Ok(entry) => entry,
				Err(Skip) => continue,
			};
			let key = self.registry.key_of(&grid);

			for (index, control) in entry.controls.iter().enumerate() {
				let grids = Rc::downgrade(&self.grids);
				let registry = Rc::downgrade(&self.registry);
				let storage = Rc::clone(&self.storage);
				self.registry.add_listener(&self.group, &control.button, "click", move |_| {
					if let (Some(grids), Some(registry)) = (grids.upgrade(), registry.upgrade()) {
						if let Some(entry) = grids.borrow_mut().get_mut(&key) {
							entry.click(&registry, index, &storage);
						}
					}
				});
			}

			let keys: Vec<&str> = entry.controls.iter().map(|control| control.key.as_str()).collect();
			let stored = entry.storage_key.as_deref().and_then(|storage_key| self.storage.load::<SortInfo>(storage_key));
			let restored = restore_key(stored, &keys).and_then(|info| entry.index_of(&info.key).map(|index| (index, info.descending)));
			if let Some((index, descending)) = restored {
				entry.sort(&self.registry, index, descending);
			}
			self.grids.borrow_mut().insert(key, entry);
		}
		trace!("Scanned {} grid(s).", self.grids.borrow().len());
	}

	/// Sorts `grid` by the control with `key`. This doesn't store a preference.
	///
	/// # Errors
	///
	/// [`Error::NotScanned`] if `grid` wasn't found by the last scan,
	/// [`Error::UnknownSortKey`] if it has no control with that key.
	pub fn sort(&self, grid: &Element, key: &str, descending: bool) -> Result<()> {
		let mut grids = self.grids.borrow_mut();
		let entry = grids.get_mut(&self.registry.key_of(grid)).ok_or(Error::NotScanned)?;
		let index = entry.index_of(key).ok_or_else(|| Error::UnknownSortKey { key: key.to_owned() })?;
		entry.sort(&self.registry, index, descending);
		Ok(())
	}

	/// The active key and direction of `grid`.
	#[must_use]
	pub fn active(&self, grid: &Element) -> Option<SortInfo> {
		let grids = self.grids.borrow();
		let entry = grids.get(&self.registry.key_of(grid))?;
		entry.active.map(|(index, descending)| SortInfo {
			key: entry.controls[index].key.clone(),
			descending,
		})
	}

	pub fn destroy(&self) {
		self.registry.remove_group(&self.group);
		self.grids.borrow_mut().clear();
	}
}
