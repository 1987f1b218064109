use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of one registry in the managed set.
///
/// The set is closed and fixed at compile time; [`RegistryId::ALL`] lists every
/// member in declaration order, which is also the order registries are captured
/// and restored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryId {
	/// Dimension types (height, lighting, sky).
	DimensionType,
	/// Noise generator settings.
	NoiseSettings,
	/// Biomes.
	Biome,
	/// Configured cave and canyon carvers.
	ConfiguredCarver,
	/// Configured features (ores, trees, lakes).
	ConfiguredFeature,
	/// Configured surface builders.
	SurfaceBuilder,
	/// Configured structure features.
	StructureFeature,
	/// Jigsaw template pools.
	TemplatePool,
	/// Structure processor lists.
	ProcessorList,
}

bitflags::bitflags! {
	/// A set of registry identifiers.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct RegistryIdSet: u16 {
		/// Dimension types.
		const DIMENSION_TYPE = 1 << 0;
		/// Noise generator settings.
		const NOISE_SETTINGS = 1 << 1;
		/// Biomes.
		const BIOME = 1 << 2;
		/// Configured carvers.
		const CONFIGURED_CARVER = 1 << 3;
		/// Configured features.
		const CONFIGURED_FEATURE = 1 << 4;
		/// Surface builders.
		const SURFACE_BUILDER = 1 << 5;
		/// Structure features.
		const STRUCTURE_FEATURE = 1 << 6;
		/// Template pools.
		const TEMPLATE_POOL = 1 << 7;
		/// Processor lists.
		const PROCESSOR_LIST = 1 << 8;
	}
}

/// Unknown registry name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown registry {0:?}")]
pub struct UnknownRegistry(pub String);

impl RegistryId {
	pub const COUNT: usize = 9;

	pub const ALL: [RegistryId; Self::COUNT] = [
		Self::DimensionType,
		Self::NoiseSettings,
		Self::Biome,
		Self::ConfiguredCarver,
		Self::ConfiguredFeature,
		Self::SurfaceBuilder,
		Self::StructureFeature,
		Self::TemplatePool,
		Self::ProcessorList,
	];

	/// Dense index into per-registry tables.
	#[inline]
	pub const fn index(self) -> usize {
		self as usize
	}

	/// Returns the bitflag for this registry.
	pub const fn as_set(self) -> RegistryIdSet {
		match self {
			Self::DimensionType => RegistryIdSet::DIMENSION_TYPE,
			Self::NoiseSettings => RegistryIdSet::NOISE_SETTINGS,
			Self::Biome => RegistryIdSet::BIOME,
			Self::ConfiguredCarver => RegistryIdSet::CONFIGURED_CARVER,
			Self::ConfiguredFeature => RegistryIdSet::CONFIGURED_FEATURE,
			Self::SurfaceBuilder => RegistryIdSet::SURFACE_BUILDER,
			Self::StructureFeature => RegistryIdSet::STRUCTURE_FEATURE,
			Self::TemplatePool => RegistryIdSet::TEMPLATE_POOL,
			Self::ProcessorList => RegistryIdSet::PROCESSOR_LIST,
		}
	}

	/// Stable snake_case name, as used in config files and content packs.
	pub const fn name(self) -> &'static str {
		match self {
			Self::DimensionType => "dimension_type",
			Self::NoiseSettings => "noise_settings",
			Self::Biome => "biome",
			Self::ConfiguredCarver => "configured_carver",
			Self::ConfiguredFeature => "configured_feature",
			Self::SurfaceBuilder => "surface_builder",
			Self::StructureFeature => "structure_feature",
			Self::TemplatePool => "template_pool",
			Self::ProcessorList => "processor_list",
		}
	}
}

impl RegistryIdSet {
	pub const fn contains_id(self, id: RegistryId) -> bool {
		self.contains(id.as_set())
	}

	/// Members in [`RegistryId::ALL`] order.
	pub fn ids(self) -> impl Iterator<Item = RegistryId> {
		RegistryId::ALL.into_iter().filter(move |&id| self.contains_id(id))
	}
}

impl From<RegistryId> for RegistryIdSet {
	fn from(id: RegistryId) -> Self {
		id.as_set()
	}
}

impl FromIterator<RegistryId> for RegistryIdSet {
	fn from_iter<I: IntoIterator<Item = RegistryId>>(iter: I) -> Self {
		let mut set = RegistryIdSet::empty();
		for id in iter {
			set |= id.as_set();
		}
		set
	}
}

impl fmt::Display for RegistryId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for RegistryId {
	type Err = UnknownRegistry;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|id| id.name() == s)
			.ok_or_else(|| UnknownRegistry(s.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn index_matches_declaration_order() {
		for (i, id) in RegistryId::ALL.into_iter().enumerate() {
			assert_eq!(id.index(), i);
		}
	}

	#[test]
	fn each_id_has_its_own_flag() {
		let all: RegistryIdSet = RegistryId::ALL.into_iter().collect();
		assert_eq!(all, RegistryIdSet::all());
		for id in RegistryId::ALL {
			assert_eq!(id.as_set().bits(), 1 << id.index());
			assert_eq!(id.as_set().ids().collect::<Vec<_>>(), [id]);
		}
	}

	#[test]
	fn names_round_trip_through_from_str() {
		for id in RegistryId::ALL {
			assert_eq!(id.name().parse::<RegistryId>(), Ok(id));
		}
		assert_eq!("biomes".parse::<RegistryId>(), Err(UnknownRegistry("biomes".into())));
	}
}
