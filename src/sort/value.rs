//! Type-aware sort values.

use crate::scan::keywords;
use core::cmp::Ordering;

/// How a column's or control's raw text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortType {
	/// Trimmed, lower-cased text.
	Text,
	/// The longest numeric prefix, like JavaScript's `parseFloat`.
	Number,
	/// Anything `Date.parse` understands. Sorts newest first when ascending.
	Date,
}
keywords!(SortType { "text" => Text, "number" => Number, "date" => Date });

#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
	/// Absent or unparseable. Sorts after every present value in either direction.
	Missing,
	Number(f64),
	Text(String),
}
impl SortValue {
	/// Coerces `raw` according to `kind`.
	#[must_use]
	pub fn parse(kind: SortType, raw: Option<&str>) -> Self {
		let raw = match raw.map(str::trim) {
			Some(raw) if !raw.is_empty() => raw,
			_ => return SortValue::Missing,
		};
		match kind {
			SortType::Text => SortValue::Text(raw.to_lowercase()),
			SortType::Number => parse_float(raw).map_or(SortValue::Missing, SortValue::Number),
			SortType::Date => {
				let epoch = parse_date(raw);
				if epoch.is_nan() {
					SortValue::Missing
				} else {
					// Negated so that ascending order is reverse-chronological.
					SortValue::Number(-epoch)
				}
			}
		}
	}

	#[must_use]
	pub fn is_missing(&self) -> bool {
		matches!(self, SortValue::Missing)
	}

	/// Compares two values of the same column. [`SortValue::Missing`] is last regardless of `descending`.
	#[must_use]
	pub fn compare(&self, other: &Self, descending: bool) -> Ordering {
		let ordering = match (self, other) {
			(SortValue::Missing, SortValue::Missing) => return Ordering::Equal,
			(SortValue::Missing, _) => return Ordering::Greater,
			(_, SortValue::Missing) => return Ordering::Less,
			(SortValue::Number(a), SortValue::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
			(SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
			(SortValue::Number(_), SortValue::Text(_)) | (SortValue::Text(_), SortValue::Number(_)) => Ordering::Equal,
		};
		if descending {
			ordering.reverse()
		} else {
			ordering
		}
	}
}

fn parse_date(raw: &str) -> f64 {
	js_sys::Date::parse(raw)
}

/// Parses the longest prefix of `text` (after leading whitespace) that forms a decimal number.
#[must_use]
pub fn parse_float(text: &str) -> Option<f64> {
	let text = text.trim_start();
	let bytes = text.as_bytes();
	let mut end = 0;
	if matches!(bytes.first(), Some(b'+' | b'-')) {
		end += 1;
	}
	if text[end..].starts_with("Infinity") {
		return text[..end + "Infinity".len()].replace("Infinity", "inf").parse().ok();
	}

	let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();
	let integer = digits(end);
	end += integer;
	let mut mantissa = integer;
	if bytes.get(end) == Some(&b'.') {
		let fraction = digits(end + 1);
		if integer > 0 || fraction > 0 {
			end += 1 + fraction;
			mantissa += fraction;
		}
	}
	if mantissa == 0 {
		return None;
	}
	if matches!(bytes.get(end), Some(b'e' | b'E')) {
		let mut exponent_end = end + 1;
		if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
			exponent_end += 1;
		}
		let exponent = digits(exponent_end);
		if exponent > 0 {
			end = exponent_end + exponent;
		}
	}
	text[..end].parse().ok()
}
