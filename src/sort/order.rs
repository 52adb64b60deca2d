use super::value::SortValue;
use core::cmp::Ordering;

/// Pinned locations take priority over the active sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Location {
	Top,
	Middle,
	Bottom,
}
impl Location {
	/// Decodes `data-uf-sort-location`. Anything but `top` or `bottom` is [`Location::Middle`].
	#[must_use]
	pub fn from_attribute(value: Option<&str>) -> Self {
		match value.map(str::trim) {
			Some(value) if value.eq_ignore_ascii_case("top") => Location::Top,
			Some(value) if value.eq_ignore_ascii_case("bottom") => Location::Bottom,
			_ => Location::Middle,
		}
	}
}

/// The cached sort data of one row or item (group).
#[derive(Debug, Clone, PartialEq)]
pub struct SortEntry {
	pub location: Location,
	/// One value per column or control. Absent trailing values count as [`SortValue::Missing`].
	pub values: Vec<SortValue>,
}
impl SortEntry {
	#[must_use]
	pub fn value(&self, column: usize) -> &SortValue {
		static MISSING: SortValue = SortValue::Missing;
		self.values.get(column).unwrap_or(&MISSING)
	}
}

#[must_use]
pub fn compare_entries(a: &SortEntry, b: &SortEntry, column: usize, descending: bool) -> Ordering {
	a.location.cmp(&b.location).then_with(|| a.value(column).compare(b.value(column), descending))
}

/// The stable sort permutation of `entries`: position `i` of the result is the index of the entry that goes there.
#[must_use]
pub fn sorted_order(entries: &[SortEntry], column: usize, descending: bool) -> Vec<usize> {
	let mut order: Vec<usize> = (0..entries.len()).collect();
	// `sort_by` is stable, so equal entries keep their relative order.
	order.sort_by(|&a, &b| compare_entries(&entries[a], &entries[b], column, descending));
	order
}

/// The `(column, descending)` pair after a click on `clicked`:
/// the active column flips direction, any other column becomes active ascending.
#[must_use]
pub fn next_sort(active: Option<(usize, bool)>, clicked: usize) -> (usize, bool) {
	match active {
		Some((column, descending)) if column == clicked => (column, !descending),
		_ => (clicked, false),
	}
}
