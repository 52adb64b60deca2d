//! Sort preferences in `localStorage`.

use crate::error::{Error, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{instrument, warn};

/// The active control of a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortInfo {
	pub key: String,
	pub descending: bool,
}

/// The active column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSortInfo {
	pub index: usize,
	pub descending: bool,
}

/// Honours `stored` only if its key is one of `keys`. Otherwise falls back to the first key, ascending.
///
/// Returns [`None`] only if there are no keys at all.
#[must_use]
pub fn restore_key(stored: Option<SortInfo>, keys: &[&str]) -> Option<SortInfo> {
	match stored {
		Some(stored) if keys.contains(&stored.key.as_str()) => Some(stored),
		_ => keys.first().map(|&key| SortInfo {
			key: key.to_owned(),
			descending: false,
		}),
	}
}

/// Honours `stored` only if its index is one of `columns`. Otherwise falls back to the first column, ascending.
#[must_use]
pub fn restore_index(stored: Option<ColumnSortInfo>, columns: &[usize]) -> Option<ColumnSortInfo> {
	match stored {
		Some(stored) if columns.contains(&stored.index) => Some(stored),
		_ => columns.first().map(|&index| ColumnSortInfo { index, descending: false }),
	}
}

pub fn decode<T: DeserializeOwned>(json: &str) -> Result<T> {
	Ok(serde_json::from_str(json)?)
}

/// `window.localStorage`, if available.
#[derive(Debug, Clone)]
pub struct SortStorage {
	storage: Option<web_sys::Storage>,
}
impl SortStorage {
	#[must_use]
	pub fn local() -> Self {
		let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
		if storage.is_none() {
			warn!("`localStorage` is unavailable; sort preferences won't persist.");
		}
		Self { storage }
	}

	/// Loads the preference stored under `key`. Missing storage, a missing entry and malformed JSON all yield [`None`].
	#[instrument(skip(self))]
	pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		let json = self.storage.as_ref()?.get_item(key).ok().flatten()?;
		decode(&json).map_err(|error| warn!("Ignoring stored sort preference: {}", error)).ok()
	}

	#[instrument(skip(self, value))]
	pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
		let storage = self.storage.as_ref().ok_or(Error::StorageUnavailable)?;
		storage.set_item(key, &serde_json::to_string(value)?)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn stored_key_is_honoured_if_present() {
		let stored = decode::<SortInfo>(r#"{"key":"name","descending":true}"#).unwrap();
		assert_eq!(
			restore_key(Some(stored), &["date", "name"]),
			Some(SortInfo {
				key: "name".to_owned(),
				descending: true
			})
		);
	}

	#[test]
	fn stale_key_falls_back_to_first_ascending() {
		let stored = SortInfo {
			key: "removed".to_owned(),
			descending: true,
		};
		assert_eq!(
			restore_key(Some(stored), &["date", "name"]),
			Some(SortInfo {
				key: "date".to_owned(),
				descending: false
			})
		);
		assert_eq!(restore_key(None, &[]), None);
	}

	#[test]
	fn columns() {
		let stored = decode::<ColumnSortInfo>(r#"{"index":2,"descending":true}"#).unwrap();
		assert_eq!(restore_index(Some(stored), &[0, 2]), Some(stored));
		assert_eq!(restore_index(Some(stored), &[1, 3]), Some(ColumnSortInfo { index: 1, descending: false }));
	}

	#[test]
	fn malformed_json() {
		assert!(matches!(decode::<SortInfo>("{\"key\":1}"), Err(Error::Serialization(_))));
	}
}
