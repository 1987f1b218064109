use tracing::warn;

use super::{ReloadController, ReloadError};
use crate::access::{Exclusions, RegistryAccess};
use crate::set::RegistrySet;
use crate::snapshot::RestoreStats;

/// Outcome of a committed reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadReport {
	/// Epoch of the snapshot disposed on commit.
	pub epoch: Option<u64>,
	/// Load listeners dispatched while priming.
	pub load_listeners: usize,
	/// Ready listeners dispatched after commit.
	pub ready_listeners: usize,
}

/// A reload in its priming phase.
///
/// Borrowing the controller mutably keeps cycles from overlapping, and every
/// [`RegistryAccess`] handed out borrows the cycle, so none outlives it. The cycle
/// must end in [`commit`](Self::commit) or [`rollback`](Self::rollback); if it is
/// dropped first, it rolls back.
#[must_use = "an unfinished reload cycle rolls back when dropped"]
pub struct ReloadCycle<'c> {
	controller: &'c mut ReloadController,
	primed: usize,
	finished: bool,
}

impl<'c> ReloadCycle<'c> {
	pub(super) fn new(controller: &'c mut ReloadController) -> Self {
		Self {
			controller,
			primed: 0,
			finished: false,
		}
	}

	/// Epoch of the snapshot backing this cycle.
	pub fn epoch(&self) -> Option<u64> {
		self.controller.snapshots.live().map(|s| s.epoch())
	}

	/// The live set, for the content loader to populate.
	pub fn registries(&self) -> &RegistrySet {
		&self.controller.set
	}

	/// Access handle using the configured default exclusions.
	pub fn access(&self) -> RegistryAccess<'_> {
		self.access_excluding(self.controller.default_exclusions)
	}

	pub fn access_excluding(&self, excluded: Exclusions) -> RegistryAccess<'_> {
		RegistryAccess::new(&self.controller.set, excluded)
	}

	/// Dispatches load listeners if the controller is marked for load events.
	///
	/// Returns how many ran. On error the cycle stays open; the caller decides
	/// to roll back (or drops the cycle, which does).
	pub fn prime(&mut self) -> Result<usize, ReloadError> {
		let dispatched = self.controller.dispatch_load()?;
		self.primed += dispatched;
		Ok(dispatched)
	}

	/// Keeps the current contents, disposes the snapshot and notifies ready listeners.
	pub fn commit(mut self) -> ReloadReport {
		self.finished = true;
		self.controller.commit(self.primed)
	}

	/// Restores the snapshot and disposes it.
	pub fn rollback(mut self) -> Option<RestoreStats> {
		self.finished = true;
		self.controller.rollback()
	}
}

impl Drop for ReloadCycle<'_> {
	fn drop(&mut self) {
		if !self.finished {
			warn!(epoch = ?self.epoch(), "reload cycle dropped without commit, rolling back");
			self.controller.rollback();
		}
	}
}

impl std::fmt::Debug for ReloadCycle<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ReloadCycle")
			.field("epoch", &self.epoch())
			.field("primed", &self.primed)
			.finish_non_exhaustive()
	}
}
