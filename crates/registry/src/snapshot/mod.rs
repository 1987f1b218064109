//! Point-in-time copies of a [`RegistrySet`] and targeted restore.
//!
//! # Mental Model
//!
//! A [`Snapshot`] records every `(key, value, lifecycle)` triple of every store.
//! Values are shared handles, so capture copies handles rather than payloads; since
//! values are replaced wholesale and never mutated in place, later writes to the
//! live set cannot reach a captured triple.
//!
//! Restore is a repair, not a wipe: each captured key is compared with the live
//! entry and written back only when it differs. Keys added after capture are left
//! in place.
//!
//! # Invariants
//!
//! - Restoring immediately after capture performs no writes.
//!   - Tested by: `tests::restore_without_mutation_is_a_no_op`
//! - After restore every captured key holds its captured value and lifecycle.
//!   - Tested by: `tests::prop_rollback_restores_captured_entries`
//! - At most one live snapshot per engine; a second capture returns the first.
//!   - Enforced in: [`SnapshotEngine::capture`]
//!   - Tested by: `tests::second_capture_keeps_baseline`

mod engine;


pub use engine::SnapshotEngine;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::core::{Key, RegistryId};
use crate::set::RegistrySet;
use crate::store::Entry;

/// How restore treats a live value that is identical to the captured one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestorePolicy {
	/// Skip the write when the live entry holds the captured allocation and lifecycle.
	#[default]
	SkipIdentical,
	/// Write every captured entry back.
	Unconditional,
}

/// Counts reported by [`Snapshot::restore`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreStats {
	/// Keys whose live value differed and was written back.
	pub restored: usize,
	/// Keys left untouched because the live entry was already the captured one.
	pub skipped: usize,
	/// Keys missing from the live store and inserted again.
	pub reinserted: usize,
}

impl RestoreStats {
	pub fn writes(&self) -> usize {
		self.restored + self.reinserted
	}
}

/// Immutable copy of one store.
#[derive(Debug)]
struct RegistrySnapshot {
	id: RegistryId,
	entries: Box<[(Key, Entry)]>,
	index: FxHashMap<Key, usize>,
}

impl RegistrySnapshot {
	fn capture(set: &RegistrySet, id: RegistryId) -> Self {
		let entries: Box<[(Key, Entry)]> = set
			.store(id)
			.read()
			.iter()
			.map(|(k, e)| (k.clone(), e.clone()))
			.collect();
		let index = entries
			.iter()
			.enumerate()
			.map(|(i, (k, _))| (k.clone(), i))
			.collect();
		Self { id, entries, index }
	}
}

/// Immutable, fully materialized copy of every store in a [`RegistrySet`].
#[derive(Debug)]
pub struct Snapshot {
	epoch: u64,
	registries: Box<[RegistrySnapshot]>,
}

impl Snapshot {
	/// Copies every store of `set`.
	pub fn capture(set: &RegistrySet, epoch: u64) -> Self {
		let registries = RegistryId::ALL
			.into_iter()
			.map(|id| RegistrySnapshot::capture(set, id))
			.collect();
		Self { epoch, registries }
	}

	/// Sequence number of the capture that produced this snapshot.
	pub fn epoch(&self) -> u64 {
		self.epoch
	}

	/// Captured entry for `key`, if it existed at capture time.
	pub fn get(&self, id: RegistryId, key: &Key) -> Option<&Entry> {
		let reg = self.registry(id)?;
		reg.index.get(key).map(|&i| &reg.entries[i].1)
	}

	/// Number of entries captured for `id`.
	pub fn len_of(&self, id: RegistryId) -> usize {
		self.registry(id).map_or(0, |r| r.entries.len())
	}

	/// Total captured entries.
	pub fn len(&self) -> usize {
		self.registries.iter().map(|r| r.entries.len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Writes captured entries back into `set` where they differ from the live ones.
	pub fn restore(&self, set: &RegistrySet, policy: RestorePolicy) -> RestoreStats {
		let mut stats = RestoreStats::default();
		for reg in self.registries.iter() {
			let store = set.store(reg.id);
			for (key, captured) in reg.entries.iter() {
				match store.get(key) {
					None => stats.reinserted += 1,
					Some(live) if policy == RestorePolicy::SkipIdentical && live.same(captured) => {
						stats.skipped += 1;
						continue;
					}
					Some(_) => stats.restored += 1,
				}
				store.put(key.clone(), captured.value.clone(), captured.lifecycle);
			}
		}
		stats
	}

	fn registry(&self, id: RegistryId) -> Option<&RegistrySnapshot> {
		self.registries.iter().find(|r| r.id == id)
	}
}
