//! End-to-end reload cycles driven through the public API.

#![allow(unused_crate_dependencies)]

use std::collections::BTreeMap;

use dynreg_registry::{
	BoxError, ContentPack, Exclusions, Key, Lifecycle, RegistryAccess, RegistryId, ReloadConfig, ReloadController,
	ReloadError, ReloadState, Value,
};
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, PartialEq)]
struct NoiseSettings {
	sea_level: i32,
	structure_spacing: BTreeMap<String, (u32, u32)>,
}

fn key(s: &str) -> Key {
	Key::parse(s).unwrap()
}

const BASE_PACK: &str = r#"{
	"dimension_type": {
		"overworld": { "value": { "height": 384 } },
		"the_end": { "lifecycle": "experimental", "value": { "height": 256 } }
	},
	"biome": {
		"plains": { "value": { "temperature": 0.8 } },
		"desert": { "value": { "temperature": 2.0 } }
	}
}"#;

fn controller_with_base() -> ReloadController {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
	let mut controller = ReloadController::new(&ReloadConfig::default());
	let pack = ContentPack::from_json_str(BASE_PACK).unwrap();
	controller.reload(|set| pack.apply(set).map(drop)).unwrap();
	controller
}

fn height(controller: &ReloadController, dim: &str) -> Option<serde_json::Value> {
	let entry = controller.registries().get(RegistryId::DimensionType, &key(dim))?;
	entry.value.downcast_ref::<serde_json::Value>().map(|v| v["height"].clone())
}

#[test]
fn pack_with_bad_key_leaves_previous_contents() {
	let mut controller = controller_with_base();
	let revision_plains = controller.registries().get(RegistryId::Biome, &key("plains")).unwrap();

	let broken = ContentPack::from_json_str(
		r#"{ "dimension_type": { "overworld": { "value": { "height": 1 } }, "Not A Key": { "value": {} } } }"#,
	)
	.unwrap();
	let err = controller.reload(|set| broken.apply(set).map(drop)).unwrap_err();

	assert!(matches!(err, ReloadError::Load(_)));
	assert_eq!(controller.state(), ReloadState::Idle);
	assert_eq!(height(&controller, "overworld"), Some(serde_json::json!(384)));
	// Untouched entries keep their identity across the rollback.
	let plains = controller.registries().get(RegistryId::Biome, &key("plains")).unwrap();
	assert!(plains.value.same(&revision_plains.value));
}

#[test]
fn listener_copies_one_entry_over_another() {
	let mut controller = controller_with_base();
	controller.add_load_listener(
		"end-sky-overworld",
		Exclusions::only(RegistryId::Biome),
		|access: RegistryAccess<'_>| -> Result<(), BoxError> {
			let dims = access.registry(RegistryId::DimensionType).ok_or("dimension types hidden")?;
			let end = dims.get(&key("the_end")).ok_or("the_end missing")?;
			dims.override_entry(&key("overworld"), end.value);
			Ok(())
		},
	);

	controller.reload(|_| Ok::<_, BoxError>(())).unwrap();

	let overworld = controller
		.registries()
		.get(RegistryId::DimensionType, &key("overworld"))
		.unwrap();
	assert_eq!(height(&controller, "overworld"), Some(serde_json::json!(256)));
	// The overworld keeps its own lifecycle, not the source entry's.
	assert_eq!(overworld.lifecycle, Lifecycle::Stable);
}

#[test]
fn typed_values_survive_rollback_of_a_copy_on_write_override() {
	let mut controller = ReloadController::default();
	let original = NoiseSettings {
		sea_level: 63,
		structure_spacing: BTreeMap::from([("ruined_portal".to_string(), (40, 15))]),
	};
	let seed = original.clone();
	controller
		.reload(move |set| {
			set.put(RegistryId::NoiseSettings, key("overworld"), Value::new(seed), Lifecycle::Stable);
			Ok::<_, BoxError>(())
		})
		.unwrap();

	let cycle = controller.begin();
	let edited = cycle
		.access()
		.override_with(RegistryId::NoiseSettings, &key("overworld"), |s: &mut NoiseSettings| {
			s.structure_spacing.insert("ruined_portal".to_string(), (2, 1));
		});
	assert!(edited);
	let during = cycle
		.access()
		.get_typed::<NoiseSettings>(RegistryId::NoiseSettings, &key("overworld"))
		.unwrap();
	assert_eq!(during.structure_spacing["ruined_portal"], (2, 1));
	cycle.rollback();

	let after = controller
		.registries()
		.get_typed::<NoiseSettings>(RegistryId::NoiseSettings, &key("overworld"))
		.unwrap();
	assert_eq!(*after, original);
}

#[test]
fn excluded_registry_is_absent_not_empty() {
	let mut controller = controller_with_base();
	let cycle = controller.begin();
	let access = cycle.access_excluding(Exclusions::only(RegistryId::Biome));

	assert!(!access.has_registry(RegistryId::Biome));
	assert!(access.get(RegistryId::Biome, &key("plains")).is_none());
	assert!(access.has_registry(RegistryId::ConfiguredFeature));
	assert!(access.registry(RegistryId::ConfiguredFeature).unwrap().is_empty());
	cycle.commit();
}
