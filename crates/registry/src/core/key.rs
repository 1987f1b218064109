//! Namespaced entry keys.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Namespace assumed when a key is written without one.
pub const DEFAULT_NAMESPACE: &str = "core";

/// Rejected key strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
	#[error("empty {segment} in key {input:?}")]
	Empty { segment: &'static str, input: String },
	#[error("invalid character {ch:?} in {segment} of key {input:?}")]
	InvalidChar {
		segment: &'static str,
		ch: char,
		input: String,
	},
}

/// Stable identifier of an entry within one registry, written `namespace:path`.
///
/// Ordering is by namespace, then path. Both segments are reference-counted so
/// cloning a key (which snapshots do for every entry) never reallocates.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
	namespace: Arc<str>,
	path: Arc<str>,
}

impl Key {
	/// Builds a key from already separated segments.
	pub fn new(namespace: &str, path: &str) -> Result<Self, KeyError> {
		let input = || format!("{namespace}:{path}");
		validate("namespace", namespace, false, input)?;
		validate("path", path, true, input)?;
		Ok(Self {
			namespace: Arc::from(namespace),
			path: Arc::from(path),
		})
	}

	/// Builds a key in [`DEFAULT_NAMESPACE`].
	pub fn core(path: &str) -> Result<Self, KeyError> {
		Self::new(DEFAULT_NAMESPACE, path)
	}

	/// Parses `namespace:path`, or a bare `path` in the default namespace.
	pub fn parse(s: &str) -> Result<Self, KeyError> {
		match s.split_once(':') {
			Some((namespace, path)) => Self::new(namespace, path),
			None => Self::core(s),
		}
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn path(&self) -> &str {
		&self.path
	}
}

fn validate(segment: &'static str, s: &str, allow_slash: bool, input: impl Fn() -> String) -> Result<(), KeyError> {
	if s.is_empty() {
		return Err(KeyError::Empty { segment, input: input() });
	}
	let allowed = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-') || (allow_slash && c == '/');
	match s.chars().find(|&c| !allowed(c)) {
		Some(ch) => Err(KeyError::InvalidChar {
			segment,
			ch,
			input: input(),
		}),
		None => Ok(()),
	}
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.namespace, self.path)
	}
}

impl fmt::Debug for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Key({self})")
	}
}

impl FromStr for Key {
	type Err = KeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl Serialize for Key {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Key {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		Self::parse(&s).map_err(serde::de::Error::custom)
	}
}
