use tracing::{debug, info};

use super::{RestorePolicy, RestoreStats, Snapshot};
use crate::set::RegistrySet;

/// Holder of the single live [`Snapshot`] for one registry set.
#[derive(Debug, Default)]
pub struct SnapshotEngine {
	live: Option<Snapshot>,
	captures: u64,
}

impl SnapshotEngine {
	pub fn new() -> Self {
		Self::default()
	}

	/// Captures `set` unless a snapshot is already live.
	///
	/// A second call before [`dispose`](Self::dispose) returns the existing snapshot
	/// untouched, so the pre-reload baseline is never replaced by a mid-reload state.
	pub fn capture(&mut self, set: &RegistrySet) -> &Snapshot {
		if let Some(live) = &self.live {
			debug!(epoch = live.epoch(), "snapshot already live, capture skipped");
		}
		let captures = &mut self.captures;
		self.live.get_or_insert_with(|| {
			let snapshot = Snapshot::capture(set, *captures);
			*captures += 1;
			info!(epoch = snapshot.epoch(), entries = snapshot.len(), "captured registry snapshot");
			snapshot
		})
	}

	/// Restores `set` from the live snapshot, or does nothing if none is live.
	pub fn restore(&self, set: &RegistrySet, policy: RestorePolicy) -> Option<RestoreStats> {
		let snapshot = self.live.as_ref()?;
		let stats = snapshot.restore(set, policy);
		info!(
			epoch = snapshot.epoch(),
			restored = stats.restored,
			reinserted = stats.reinserted,
			skipped = stats.skipped,
			"restored registries from snapshot"
		);
		Some(stats)
	}

	/// Releases the live snapshot. Safe to call when none is live.
	pub fn dispose(&mut self) -> Option<Snapshot> {
		let disposed = self.live.take();
		if let Some(snapshot) = &disposed {
			debug!(epoch = snapshot.epoch(), "disposed registry snapshot");
		}
		disposed
	}

	pub fn is_live(&self) -> bool {
		self.live.is_some()
	}

	pub fn live(&self) -> Option<&Snapshot> {
		self.live.as_ref()
	}
}
