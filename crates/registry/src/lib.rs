//! Reloadable keyed registries with snapshot rollback.
//!
//! A fixed [`RegistrySet`] of [`EntryStore`]s is reloaded from external content.
//! Each reload runs as a [`ReloadCycle`]: a [`Snapshot`] is captured, content is
//! loaded, collaborators override entries through a bounded [`RegistryAccess`], and
//! the cycle either commits (snapshot discarded) or rolls back (snapshot restored).
//!
//! # Modules
//!
//! - [`core`] - Keys, lifecycles, value handles, registry identifiers
//! - [`store`] - Single keyed registry
//! - [`set`] - The fixed collection of stores
//! - [`snapshot`] - Capture and targeted restore
//! - [`access`] - Read-and-override handles, read-only views, exclusions
//! - [`reload`] - Reload state machine and listener dispatch
//! - [`config`] - Controller configuration (TOML)
//! - `pack` - JSON content packs (feature `pack`)
//!
//! # Example
//!
//! ```
//! use dynreg_registry::{Exclusions, Key, Lifecycle, RegistryId, ReloadController, Value};
//!
//! let mut controller = ReloadController::default();
//! let plains = Key::parse("plains").unwrap();
//!
//! controller
//! 	.reload(|set| {
//! 		set.put(RegistryId::Biome, plains.clone(), Value::new(10_i32), Lifecycle::Stable);
//! 		Ok::<_, std::convert::Infallible>(())
//! 	})
//! 	.unwrap();
//!
//! let cycle = controller.begin();
//! let access = cycle.access_excluding(Exclusions::none());
//! assert!(access.override_entry(RegistryId::Biome, &plains, Value::new(20_i32)));
//! cycle.rollback();
//!
//! let entry = controller.registries().get(RegistryId::Biome, &plains).unwrap();
//! assert_eq!(entry.value.downcast_ref::<i32>(), Some(&10));
//! ```

pub mod access;
pub mod config;
pub mod core;
#[cfg(feature = "pack")]
pub mod pack;
pub mod reload;
pub mod set;
pub mod snapshot;
pub mod store;

pub use access::{Exclusions, RegistryAccess, RegistryView, StoreAccess, StoreView};
pub use config::{ConfigError, ReloadConfig};
pub use crate::core::{Key, KeyError, Lifecycle, RegistryId, RegistryIdSet, UnknownRegistry, Value};
#[cfg(feature = "pack")]
pub use pack::{ContentPack, PackError};
pub use reload::{
	BoxError, LoadListener, ReadyListener, ReloadController, ReloadCycle, ReloadError, ReloadReport,
	ReloadState,
};
pub use set::RegistrySet;
pub use snapshot::{RestorePolicy, RestoreStats, Snapshot, SnapshotEngine};
pub use store::{Entries, Entry, EntryStore};
