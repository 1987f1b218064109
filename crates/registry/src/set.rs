//! The fixed collection of entry stores managed together.

use crate::core::{Key, Lifecycle, RegistryId, Value};
use crate::store::{Entry, EntryStore};

/// One [`EntryStore`] per [`RegistryId`].
///
/// The set is explicitly owned; there is no process-global instance. Every
/// identifier always has a store, possibly empty.
#[derive(Debug)]
pub struct RegistrySet {
	stores: [EntryStore; RegistryId::COUNT],
}

impl RegistrySet {
	pub fn new() -> Self {
		Self {
			stores: RegistryId::ALL.map(EntryStore::new),
		}
	}

	#[inline]
	pub fn store(&self, id: RegistryId) -> &EntryStore {
		&self.stores[id.index()]
	}

	/// Stores in [`RegistryId::ALL`] order.
	pub fn stores(&self) -> impl Iterator<Item = &EntryStore> + '_ {
		self.stores.iter()
	}

	pub fn get(&self, id: RegistryId, key: &Key) -> Option<Entry> {
		self.store(id).get(key)
	}

	pub fn put(&self, id: RegistryId, key: Key, value: Value, lifecycle: Lifecycle) -> Option<Entry> {
		self.store(id).put(key, value, lifecycle)
	}

	/// Total entries across all stores.
	pub fn len(&self) -> usize {
		self.stores.iter().map(EntryStore::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.stores.iter().all(EntryStore::is_empty)
	}

	/// Sum of store revisions; changes whenever any store is written.
	pub fn revision(&self) -> u64 {
		self.stores.iter().map(EntryStore::revision).sum()
	}
}

impl Default for RegistrySet {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn every_id_has_its_own_store() {
		let set = RegistrySet::new();
		for id in RegistryId::ALL {
			assert_eq!(set.store(id).id(), id);
		}
		assert!(set.is_empty());
	}

	#[test]
	fn stores_are_independent() {
		let set = RegistrySet::new();
		let key = Key::parse("overworld").unwrap();
		set.put(RegistryId::DimensionType, key.clone(), Value::new(1_u8), Lifecycle::Stable);

		assert!(set.get(RegistryId::DimensionType, &key).is_some());
		assert!(set.get(RegistryId::NoiseSettings, &key).is_none());
		assert_eq!(set.len(), 1);
		assert_eq!(set.revision(), 1);
	}
}
