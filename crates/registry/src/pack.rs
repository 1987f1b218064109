//! JSON content packs: the data source that populates registries on reload.
//!
//! ```json
//! {
//!   "biome": {
//!     "core:plains": { "lifecycle": "stable", "value": { "temperature": 0.8 } },
//!     "mymod:ash_fields": { "lifecycle": "experimental", "value": { "temperature": 2.0 } }
//!   }
//! }
//! ```
//!
//! Registry names are checked while parsing. Keys are checked while applying, so a
//! pack with a malformed key fails part-way through [`ContentPack::apply`] with some
//! entries already written; the reload controller's rollback is what undoes them.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::core::{Key, KeyError, Lifecycle, RegistryId, Value};
use crate::set::RegistrySet;

/// Content pack errors.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
	#[error("failed to read {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("JSON parse error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("bad key in registry {registry}: {source}")]
	Key {
		registry: RegistryId,
		#[source]
		source: KeyError,
	},
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackEntry {
	#[serde(default)]
	lifecycle: Lifecycle,
	value: serde_json::Value,
}

/// Parsed content pack. Values are stored as [`serde_json::Value`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ContentPack {
	registries: IndexMap<RegistryId, IndexMap<String, PackEntry>>,
}

impl ContentPack {
	pub fn from_json_str(s: &str) -> Result<Self, PackError> {
		Ok(serde_json::from_str(s)?)
	}

	pub fn from_path(path: &Path) -> Result<Self, PackError> {
		let content = std::fs::read_to_string(path).map_err(|source| PackError::Io {
			path: path.display().to_string(),
			source,
		})?;
		Self::from_json_str(&content)
	}

	/// Number of entries across all registries.
	pub fn len(&self) -> usize {
		self.registries.values().map(IndexMap::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Writes every entry into `set` in document order, returning the count written.
	pub fn apply(&self, set: &RegistrySet) -> Result<usize, PackError> {
		let mut written = 0;
		for (&registry, entries) in &self.registries {
			for (raw, entry) in entries {
				let key = Key::parse(raw).map_err(|source| PackError::Key { registry, source })?;
				set.put(registry, key, Value::new(entry.value.clone()), entry.lifecycle);
				written += 1;
			}
			tracing::debug!(%registry, entries = entries.len(), "applied pack entries");
		}
		Ok(written)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const PACK: &str = r#"{
		"biome": {
			"core:plains": { "value": { "temperature": 0.8 } },
			"mymod:ash_fields": { "lifecycle": "experimental", "value": { "temperature": 2.0 } }
		},
		"dimension_type": {
			"overworld": { "lifecycle": { "deprecated": { "since": 3 } }, "value": 384 }
		}
	}"#;

	#[test]
	fn applies_entries_with_lifecycles() {
		let pack = ContentPack::from_json_str(PACK).unwrap();
		assert_eq!(pack.len(), 3);

		let set = RegistrySet::new();
		assert_eq!(pack.apply(&set).unwrap(), 3);

		let plains = set.get(RegistryId::Biome, &Key::parse("plains").unwrap()).unwrap();
		assert_eq!(plains.lifecycle, Lifecycle::Stable);
		assert_eq!(
			plains.value.downcast_ref::<serde_json::Value>().unwrap()["temperature"],
			serde_json::json!(0.8)
		);

		let ash = set.get(RegistryId::Biome, &Key::parse("mymod:ash_fields").unwrap()).unwrap();
		assert_eq!(ash.lifecycle, Lifecycle::Experimental);

		let overworld = set
			.get(RegistryId::DimensionType, &Key::parse("overworld").unwrap())
			.unwrap();
		assert_eq!(overworld.lifecycle, Lifecycle::Deprecated { since: 3 });
	}

	#[test]
	fn unknown_registry_fails_at_parse() {
		let err = ContentPack::from_json_str(r#"{ "biomes": {} }"#).unwrap_err();
		assert!(matches!(err, PackError::Json(_)));
	}

	#[test]
	fn bad_key_fails_mid_apply() {
		let pack = ContentPack::from_json_str(
			r#"{ "biome": { "plains": { "value": 1 }, "Bad Key": { "value": 2 }, "forest": { "value": 3 } } }"#,
		)
		.unwrap();
		let set = RegistrySet::new();
		let err = pack.apply(&set).unwrap_err();
		assert!(matches!(err, PackError::Key { registry: RegistryId::Biome, .. }));
		// Entries before the bad key were already written.
		assert_eq!(set.store(RegistryId::Biome).len(), 1);
	}

	#[test]
	fn reads_from_disk() {
		let dir = tempfile::tempdir().expect("temp dir should be creatable");
		let path = dir.path().join("pack.json");
		std::fs::write(&path, PACK).expect("file should be writable");
		assert_eq!(ContentPack::from_path(&path).unwrap().len(), 3);
		assert!(matches!(
			ContentPack::from_path(&dir.path().join("missing.json")),
			Err(PackError::Io { .. })
		));
	}
}
