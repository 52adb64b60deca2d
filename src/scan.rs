//! Decoding of `data-uf-*` marker attributes, shared by all helpers' scans.
//!
//! Enumerated attribute values are decoded into closed `enum`s once per scan.
//! A value that fails to decode skips the element it's on (with a warning), never the whole scan.

use core::{fmt, str::FromStr};
use tracing::warn;
use web_sys::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue(pub String);
impl fmt::Display for UnknownValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unknown value {:?}", self.0)
	}
}

/// Either `"auto"`, resolved later from context, or a fixed choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting<T> {
	Auto,
	Fixed(T),
}
impl<T: FromStr<Err = UnknownValue>> FromStr for Setting<T> {
	type Err = UnknownValue;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.trim().eq_ignore_ascii_case("auto") {
			Ok(Setting::Auto)
		} else {
			s.parse().map(Setting::Fixed)
		}
	}
}

/// Marker for an element the current scan skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skip;

/// Decodes `attribute` on `element`, using `default` if it's absent or blank.
pub fn decode<T: FromStr<Err = UnknownValue>>(element: &Element, attribute: &str, default: T) -> Result<T, Skip> {
	match element.get_attribute(attribute) {
		Some(value) if !value.trim().is_empty() => value.trim().parse().map_err(|error| {
			warn!("Skipping <{}>: {} in `{}`.", element.tag_name(), error, attribute);
			Skip
		}),
		_ => Ok(default),
	}
}

/// A non-blank attribute value.
pub fn non_blank(element: &Element, attribute: &str) -> Option<String> {
	element.get_attribute(attribute).map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
}

/// Implements [`FromStr`] for a field-less `enum` from a fixed list of markup keywords.
macro_rules! keywords {
	($name:ident { $($keyword:literal => $variant:ident),+ $(,)? }) => {
		impl ::core::str::FromStr for $name {
			type Err = $crate::scan::UnknownValue;

			fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
				$(if s.eq_ignore_ascii_case($keyword) {
					return Ok(Self::$variant);
				})+
				Err($crate::scan::UnknownValue(s.to_owned()))
			}
		}
	};
}
pub(crate) use keywords;

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	enum Direction {
		Up,
		Down,
	}
	keywords!(Direction { "up" => Up, "down" => Down });

	#[test]
	fn keywords_are_case_insensitive() {
		assert_eq!("UP".parse::<Direction>(), Ok(Direction::Up));
		assert_eq!("down".parse::<Direction>(), Ok(Direction::Down));
		assert_eq!("sideways".parse::<Direction>(), Err(UnknownValue("sideways".to_owned())));
	}

	#[test]
	fn auto_setting() {
		assert_eq!(" auto ".parse::<Setting<Direction>>(), Ok(Setting::Auto));
		assert_eq!("up".parse::<Setting<Direction>>(), Ok(Setting::Fixed(Direction::Up)));
		assert!("left".parse::<Setting<Direction>>().is_err());
	}
}
