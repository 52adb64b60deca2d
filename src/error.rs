//! Errors surfaced to callers.
//!
//! Markup problems (missing selectors, unknown attribute values) are never reported through this type:
//! scans log and skip them instead.
//! The variants here are the programmer errors and I/O failures of the programmatic API.

use wasm_bindgen::JsValue;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no sort control with key {key:?} in this grid")]
	UnknownSortKey { key: String },

	#[error("column {index} is not a sortable column of this table")]
	UnknownSortColumn { index: usize },

	#[error("the element was not registered by the last scan")]
	NotScanned,

	#[error("`window.localStorage` is unavailable")]
	StorageUnavailable,

	#[error("could not (de)serialize the stored sort preference: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("JavaScript error: {0}")]
	Js(String),
}

impl From<JsValue> for Error {
	fn from(value: JsValue) -> Self {
		Self::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
	}
}
