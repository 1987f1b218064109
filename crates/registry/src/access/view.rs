use std::any::Any;
use std::sync::Arc;

use super::Exclusions;
use crate::core::{Key, Lifecycle, RegistryId};
use crate::set::RegistrySet;
use crate::store::{Entry, EntryStore};

/// Read-only, identifier-keyed lookup over a finalized [`RegistrySet`].
///
/// This is what dependents see once a reload has committed.
#[derive(Clone, Copy)]
pub struct RegistryView<'a> {
	set: &'a RegistrySet,
	excluded: Exclusions,
}

impl<'a> RegistryView<'a> {
	pub fn new(set: &'a RegistrySet, excluded: Exclusions) -> Self {
		Self { set, excluded }
	}

	pub fn has_registry(&self, id: RegistryId) -> bool {
		!self.excluded.contains_id(id)
	}

	pub fn registry(&self, id: RegistryId) -> Option<StoreView<'a>> {
		self.has_registry(id).then(|| StoreView {
			store: self.set.store(id),
		})
	}

	pub fn get(&self, id: RegistryId, key: &Key) -> Option<Entry> {
		self.registry(id)?.get(key)
	}

	pub fn get_typed<T: Any + Send + Sync>(&self, id: RegistryId, key: &Key) -> Option<Arc<T>> {
		self.registry(id)?.get_typed(key)
	}
}

impl std::fmt::Debug for RegistryView<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RegistryView")
			.field("excluded", &self.excluded.ids().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

/// Read-only handle to one registry.
#[derive(Clone, Copy)]
pub struct StoreView<'a> {
	store: &'a EntryStore,
}

impl<'a> StoreView<'a> {
	pub fn id(&self) -> RegistryId {
		self.store.id()
	}

	pub fn get(&self, key: &Key) -> Option<Entry> {
		self.store.get(key)
	}

	pub fn get_typed<T: Any + Send + Sync>(&self, key: &Key) -> Option<Arc<T>> {
		self.store.get(key)?.value.downcast::<T>()
	}

	pub fn contains(&self, key: &Key) -> bool {
		self.store.contains(key)
	}

	pub fn len(&self) -> usize {
		self.store.len()
	}

	pub fn is_empty(&self) -> bool {
		self.store.is_empty()
	}

	/// Least stable lifecycle across the registry.
	pub fn lifecycle(&self) -> Lifecycle {
		self.store.lifecycle()
	}

	pub fn keys(&self) -> Vec<Key> {
		self.store.read().keys().cloned().collect()
	}

	/// Entries copied out in enumeration order.
	///
	/// No lock is held once this returns, so overriding entries while walking
	/// the result is safe.
	pub fn entries(&self) -> Vec<(Key, Entry)> {
		self.store
			.read()
			.iter()
			.map(|(k, e)| (k.clone(), e.clone()))
			.collect()
	}
}

impl std::fmt::Debug for StoreView<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("StoreView").field(&self.id()).finish()
	}
}
