use std::fmt;

use serde::{Deserialize, Serialize};

/// Stability classification carried by every stored value.
///
/// The tag never gates whether a write is allowed. It only records how much a
/// consumer should trust the value, and overrides inherit it from the entry they
/// replace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Lifecycle {
	#[default]
	Stable,
	Experimental,
	Deprecated {
		/// Data version the value was deprecated in.
		since: u32,
	},
}

impl Lifecycle {
	pub const fn is_stable(self) -> bool {
		matches!(self, Self::Stable)
	}

	/// Folds two lifecycles into the least stable of the pair.
	///
	/// Experimental dominates deprecated, which dominates stable. Two
	/// deprecations keep the earlier version.
	pub const fn combine(self, other: Self) -> Self {
		match (self, other) {
			(Self::Experimental, _) | (_, Self::Experimental) => Self::Experimental,
			(Self::Deprecated { since: a }, Self::Deprecated { since: b }) => Self::Deprecated {
				since: if a < b { a } else { b },
			},
			(d @ Self::Deprecated { .. }, Self::Stable) | (Self::Stable, d @ Self::Deprecated { .. }) => d,
			(Self::Stable, Self::Stable) => Self::Stable,
		}
	}
}

impl fmt::Display for Lifecycle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Stable => f.write_str("stable"),
			Self::Experimental => f.write_str("experimental"),
			Self::Deprecated { since } => write!(f, "deprecated({since})"),
		}
	}
}
