//! Single keyed registry.
//!
//! # Invariants
//!
//! - A value and its lifecycle are stored as one [`Entry`] and swapped under a single
//!   write lock, so no reader observes a new value paired with an old lifecycle.
//! - Enumeration order is insertion order and survives overwrites of existing keys.

use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard};

use crate::core::{Key, Lifecycle, RegistryId, Value};

/// A stored value paired with its lifecycle.
#[derive(Debug, Clone)]
pub struct Entry {
	pub value: Value,
	pub lifecycle: Lifecycle,
}

impl Entry {
	pub fn new(value: Value, lifecycle: Lifecycle) -> Self {
		Self { value, lifecycle }
	}

	/// True if both entries share the value allocation and carry the same lifecycle.
	pub fn same(&self, other: &Entry) -> bool {
		self.value.same(&other.value) && self.lifecycle == other.lifecycle
	}
}

/// Mutable mapping from [`Key`] to [`Entry`] for one [`RegistryId`].
///
/// Writes go through `&self`; the store is shared by reference between the reload
/// controller and the access handles it gives out.
pub struct EntryStore {
	id: RegistryId,
	entries: RwLock<IndexMap<Key, Entry>>,
	revision: AtomicU64,
}

impl EntryStore {
	pub fn new(id: RegistryId) -> Self {
		Self {
			id,
			entries: RwLock::new(IndexMap::new()),
			revision: AtomicU64::new(0),
		}
	}

	/// Registry this store backs.
	pub fn id(&self) -> RegistryId {
		self.id
	}

	/// Current entry for `key`, cloned out of the lock.
	pub fn get(&self, key: &Key) -> Option<Entry> {
		self.entries.read().get(key).cloned()
	}

	/// Returns true if `key` has an entry.
	pub fn contains(&self, key: &Key) -> bool {
		self.entries.read().contains_key(key)
	}

	/// Lifecycle of the entry for `key`, without cloning its value.
	pub fn lifecycle_of(&self, key: &Key) -> Option<Lifecycle> {
		self.entries.read().get(key).map(|e| e.lifecycle)
	}

	/// Inserts or replaces the entry for `key`, returning the previous one.
	pub fn put(&self, key: Key, value: Value, lifecycle: Lifecycle) -> Option<Entry> {
		let prev = self.entries.write().insert(key, Entry::new(value, lifecycle));
		self.bump();
		prev
	}

	/// Replaces the value of an existing entry, keeping its lifecycle.
	///
	/// Returns the inherited lifecycle, or `None` without writing if `key` is
	/// unknown. Lookup and write happen under one lock.
	pub fn replace(&self, key: &Key, value: Value) -> Option<Lifecycle> {
		let mut entries = self.entries.write();
		let slot = entries.get_mut(key)?;
		let lifecycle = slot.lifecycle;
		*slot = Entry::new(value, lifecycle);
		drop(entries);
		self.bump();
		Some(lifecycle)
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Least stable lifecycle across all entries; stable when empty.
	pub fn lifecycle(&self) -> Lifecycle {
		self.entries
			.read()
			.values()
			.fold(Lifecycle::Stable, |acc, e| acc.combine(e.lifecycle))
	}

	/// Number of successful writes since creation.
	pub fn revision(&self) -> u64 {
		self.revision.load(Ordering::Acquire)
	}

	/// Locks the store for reading and returns an enumerable view.
	///
	/// Writing to this store while the view is alive deadlocks.
	pub fn read(&self) -> Entries<'_> {
		Entries {
			guard: self.entries.read(),
		}
	}

	fn bump(&self) {
		self.revision.fetch_add(1, Ordering::AcqRel);
	}
}

impl std::fmt::Debug for EntryStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EntryStore")
			.field("id", &self.id)
			.field("len", &self.len())
			.field("revision", &self.revision())
			.finish()
	}
}

/// Read-locked view over an [`EntryStore`].
pub struct Entries<'a> {
	guard: RwLockReadGuard<'a, IndexMap<Key, Entry>>,
}

impl Entries<'_> {
	/// Entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&Key, &Entry)> + '_ {
		self.guard.iter()
	}

	pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
		self.guard.keys()
	}

	pub fn len(&self) -> usize {
		self.guard.len()
	}

	pub fn is_empty(&self) -> bool {
		self.guard.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn key(s: &str) -> Key {
		Key::parse(s).unwrap()
	}

	#[test]
	fn put_then_get() {
		let store = EntryStore::new(RegistryId::Biome);
		assert!(store.get(&key("plains")).is_none());

		let v = Value::new(1_u8);
		assert!(store.put(key("plains"), v.clone(), Lifecycle::Experimental).is_none());

		let entry = store.get(&key("plains")).unwrap();
		assert!(entry.value.same(&v));
		assert_eq!(entry.lifecycle, Lifecycle::Experimental);
		assert_eq!(store.revision(), 1);
	}

	#[test]
	fn put_overwrites_value_and_lifecycle_together() {
		let store = EntryStore::new(RegistryId::Biome);
		store.put(key("plains"), Value::new(1_u8), Lifecycle::Stable);
		let prev = store
			.put(key("plains"), Value::new(2_u8), Lifecycle::Experimental)
			.unwrap();
		assert_eq!(prev.value.downcast_ref::<u8>(), Some(&1));
		assert_eq!(prev.lifecycle, Lifecycle::Stable);

		let now = store.get(&key("plains")).unwrap();
		assert_eq!(now.value.downcast_ref::<u8>(), Some(&2));
		assert_eq!(now.lifecycle, Lifecycle::Experimental);
	}

	#[test]
	fn replace_inherits_lifecycle_and_rejects_unknown() {
		let store = EntryStore::new(RegistryId::Biome);
		store.put(key("desert"), Value::new(1_u8), Lifecycle::Deprecated { since: 4 });

		assert_eq!(store.replace(&key("desert"), Value::new(9_u8)), Some(Lifecycle::Deprecated { since: 4 }));
		assert_eq!(store.get(&key("desert")).unwrap().value.downcast_ref::<u8>(), Some(&9));

		let before = store.revision();
		assert_eq!(store.replace(&key("forest"), Value::new(0_u8)), None);
		assert!(!store.contains(&key("forest")));
		assert_eq!(store.revision(), before);
	}

	#[test]
	fn enumeration_is_stable_across_overwrites() {
		let store = EntryStore::new(RegistryId::Biome);
		for name in ["c", "a", "b"] {
			store.put(key(name), Value::new(0_u8), Lifecycle::Stable);
		}
		let order = |s: &EntryStore| s.read().keys().map(Key::to_string).collect::<Vec<_>>();
		let first = order(&store);
		assert_eq!(first, order(&store));

		store.put(key("a"), Value::new(1_u8), Lifecycle::Stable);
		assert_eq!(first, order(&store));
		assert_eq!(first, ["core:c", "core:a", "core:b"]);
	}

	#[test]
	fn store_lifecycle_folds_entries() {
		let store = EntryStore::new(RegistryId::Biome);
		assert_eq!(store.lifecycle(), Lifecycle::Stable);
		store.put(key("a"), Value::new(0_u8), Lifecycle::Stable);
		store.put(key("b"), Value::new(0_u8), Lifecycle::Deprecated { since: 2 });
		assert_eq!(store.lifecycle(), Lifecycle::Deprecated { since: 2 });
		store.put(key("c"), Value::new(0_u8), Lifecycle::Experimental);
		assert_eq!(store.lifecycle(), Lifecycle::Experimental);
	}
}
