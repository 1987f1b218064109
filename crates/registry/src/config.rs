//! Reload controller configuration.

use std::path::Path;

use serde::Deserialize;

use crate::access::Exclusions;
use crate::core::RegistryId;
use crate::snapshot::RestorePolicy;

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read {path}: {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Settings read by [`ReloadController`](crate::ReloadController).
///
/// ```toml
/// fire_load_event = true
/// restore = "skip-identical"
/// exclude = ["dimension_type"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReloadConfig {
	/// Initial value of the "dispatch listeners on the next reload" flag.
	pub fire_load_event: bool,
	/// How rollback treats entries whose value is unchanged.
	pub restore: RestorePolicy,
	/// Registries hidden from [`ReloadCycle::access`](crate::ReloadCycle::access).
	pub exclude: Vec<RegistryId>,
}

impl Default for ReloadConfig {
	fn default() -> Self {
		Self {
			fire_load_event: true,
			restore: RestorePolicy::default(),
			exclude: Vec::new(),
		}
	}
}

impl ReloadConfig {
	pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(s)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.display().to_string(),
			source,
		})?;
		Self::from_toml_str(&content)
	}

	pub fn exclusions(&self) -> Exclusions {
		self.exclude.iter().copied().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_yields_defaults() {
		assert_eq!(ReloadConfig::from_toml_str("").unwrap(), ReloadConfig::default());
	}

	#[test]
	fn parses_all_fields() {
		let config = ReloadConfig::from_toml_str(
			r#"
			fire_load_event = false
			restore = "unconditional"
			exclude = ["biome", "template_pool"]
			"#,
		)
		.unwrap();
		assert!(!config.fire_load_event);
		assert_eq!(config.restore, RestorePolicy::Unconditional);
		assert!(config.exclusions().contains_id(RegistryId::Biome));
		assert!(config.exclusions().contains_id(RegistryId::TemplatePool));
		assert!(!config.exclusions().contains_id(RegistryId::DimensionType));
	}

	#[test]
	fn rejects_unknown_fields_and_registries() {
		assert!(matches!(ReloadConfig::from_toml_str("fire = true"), Err(ConfigError::Toml(_))));
		assert!(ReloadConfig::from_toml_str("exclude = [\"biomes\"]").is_err());
	}

	#[test]
	fn load_reads_from_disk() {
		let dir = tempfile::tempdir().expect("temp dir should be creatable");
		let path = dir.path().join("reload.toml");
		std::fs::write(&path, "restore = \"unconditional\"").expect("file should be writable");
		assert_eq!(ReloadConfig::load(&path).unwrap().restore, RestorePolicy::Unconditional);

		let missing = ReloadConfig::load(&dir.path().join("missing.toml"));
		assert!(matches!(missing, Err(ConfigError::Io { .. })));
	}
}
