//! Bounded read-and-override handles over a [`RegistrySet`].
//!
//! # Role
//!
//! A [`RegistryAccess`] is what collaborators receive while a reload is priming.
//! It is a capability, not a copy: it borrows the live set and carries only the
//! [`Exclusions`] fixed at construction. Excluded registries are invisible; lookups
//! against them behave exactly like lookups of unknown keys.
//!
//! Overrides only replace entries that already exist, and the replacement always
//! inherits the lifecycle of the entry it replaces.

mod view;


use std::any::Any;
use std::sync::Arc;

use tracing::debug;
pub use view::{RegistryView, StoreView};

use crate::core::{Key, RegistryId, RegistryIdSet, Value};
use crate::set::RegistrySet;
use crate::store::{Entry, EntryStore};

/// Registries hidden from an access handle, fixed when the handle is built.
pub type Exclusions = RegistryIdSet;

impl RegistryIdSet {
	pub const fn none() -> Self {
		Self::empty()
	}

	pub const fn only(id: RegistryId) -> Self {
		id.as_set()
	}

	/// Evaluates `pred` once per identifier and freezes the result.
	pub fn matching(pred: impl Fn(RegistryId) -> bool) -> Self {
		RegistryId::ALL.into_iter().filter(|&id| pred(id)).collect()
	}

	#[must_use]
	pub const fn with(self, id: RegistryId) -> Self {
		self.union(id.as_set())
	}
}

/// Read-and-override view of the registries not excluded.
#[derive(Clone, Copy)]
pub struct RegistryAccess<'a> {
	set: &'a RegistrySet,
	excluded: Exclusions,
}

impl<'a> RegistryAccess<'a> {
	pub fn new(set: &'a RegistrySet, excluded: Exclusions) -> Self {
		Self { set, excluded }
	}

	pub fn exclusions(&self) -> Exclusions {
		self.excluded
	}

	pub fn has_registry(&self, id: RegistryId) -> bool {
		!self.excluded.contains_id(id)
	}

	/// Visible registries in [`RegistryId::ALL`] order.
	pub fn registries(&self) -> impl Iterator<Item = RegistryId> + 'a {
		let excluded = self.excluded;
		RegistryId::ALL.into_iter().filter(move |&id| !excluded.contains_id(id))
	}

	/// Handle to one registry, or `None` if it is excluded.
	pub fn registry(&self, id: RegistryId) -> Option<StoreAccess<'a>> {
		self.has_registry(id).then(|| StoreAccess {
			store: self.set.store(id),
		})
	}

	/// Entry for `key`, or `None` if the registry is excluded or the key unknown.
	pub fn get(&self, id: RegistryId, key: &Key) -> Option<Entry> {
		self.registry(id)?.get(key)
	}

	pub fn get_typed<T: Any + Send + Sync>(&self, id: RegistryId, key: &Key) -> Option<Arc<T>> {
		self.registry(id)?.get_typed(key)
	}

	/// Replaces an existing entry, keeping its lifecycle.
	///
	/// Returns `false` and writes nothing if the registry is excluded or the key
	/// is unknown.
	pub fn override_entry(&self, id: RegistryId, key: &Key, value: Value) -> bool {
		self.registry(id).is_some_and(|r| r.override_entry(key, value))
	}

	/// Clones the current typed value, applies `edit` to the copy and overrides
	/// the entry with it. See [`StoreAccess::override_with`].
	pub fn override_with<T, F>(&self, id: RegistryId, key: &Key, edit: F) -> bool
	where
		T: Any + Clone + Send + Sync,
		F: FnOnce(&mut T),
	{
		self.registry(id).is_some_and(|r| r.override_with(key, edit))
	}

	/// Drops override rights, keeping the same exclusions.
	pub fn view(&self) -> RegistryView<'a> {
		RegistryView::new(self.set, self.excluded)
	}
}

impl std::fmt::Debug for RegistryAccess<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RegistryAccess")
			.field("excluded", &self.excluded.ids().collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

/// Read-and-override handle to one visible registry.
#[derive(Clone, Copy)]
pub struct StoreAccess<'a> {
	store: &'a EntryStore,
}

impl<'a> StoreAccess<'a> {
	/// Registry behind this handle.
	pub fn id(&self) -> RegistryId {
		self.store.id()
	}

	/// Current entry for `key`.
	pub fn get(&self, key: &Key) -> Option<Entry> {
		self.store.get(key)
	}

	/// Typed handle to the value for `key`; `None` if absent or not a `T`.
	pub fn get_typed<T: Any + Send + Sync>(&self, key: &Key) -> Option<Arc<T>> {
		self.store.get(key)?.value.downcast::<T>()
	}

	/// Returns true if `key` can be overridden.
	pub fn contains(&self, key: &Key) -> bool {
		self.store.contains(key)
	}

	/// Number of entries in the registry.
	pub fn len(&self) -> usize {
		self.store.len()
	}

	pub fn is_empty(&self) -> bool {
		self.store.is_empty()
	}

	/// Keys currently present, in enumeration order.
	pub fn keys(&self) -> Vec<Key> {
		self.store.read().keys().cloned().collect()
	}

	/// Replaces an existing entry, keeping its lifecycle. `false` if `key` is unknown.
	pub fn override_entry(&self, key: &Key, value: Value) -> bool {
		match self.store.replace(key, value) {
			Some(lifecycle) => {
				debug!(registry = %self.id(), %key, %lifecycle, "entry overridden");
				true
			}
			None => {
				debug!(registry = %self.id(), %key, "override rejected: unknown key");
				false
			}
		}
	}

	/// Copy-on-write override of a typed value.
	///
	/// Returns `false` without writing if `key` is unknown or its value is not a `T`.
	pub fn override_with<T, F>(&self, key: &Key, edit: F) -> bool
	where
		T: Any + Clone + Send + Sync,
		F: FnOnce(&mut T),
	{
		let Some(current) = self.get(key) else {
			return false;
		};
		let Some(mut copy) = current.value.downcast_ref::<T>().cloned() else {
			debug!(registry = %self.id(), %key, found = current.value.type_name(), "override rejected: type mismatch");
			return false;
		};
		edit(&mut copy);
		self.override_entry(key, Value::new(copy))
	}
}

impl std::fmt::Debug for StoreAccess<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("StoreAccess").field(&self.id()).finish()
	}
}
