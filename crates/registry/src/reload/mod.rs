//! Reload orchestration.
//!
//! # Mental Model
//!
//! ```text
//! Idle --begin--> Priming --commit--> Idle        (snapshot disposed)
//!                    |
//!                    +----rollback--> Idle        (snapshot restored, then disposed)
//! ```
//!
//! [`ReloadController::begin`] captures a snapshot (unless one is already live) and
//! hands out a [`ReloadCycle`]. While the cycle is alive, content is loaded into
//! the set and load listeners override entries through [`RegistryAccess`]. The
//! cycle ends in exactly one of commit or rollback; dropping it unfinished rolls
//! back.
//!
//! # Load-event flag
//!
//! Listeners only run when the controller is marked for load events. The flag is
//! independent of commit and rollback: rollback clears it while restoring and puts
//! the previous value back afterwards.

mod cycle;
mod error;
mod listener;


pub use cycle::{ReloadCycle, ReloadReport};
pub use error::{BoxError, ReloadError};
pub use listener::{LoadListener, ReadyListener};
use listener::{LoadRegistration, ReadyRegistration};
use tracing::{debug, info, warn};

use crate::access::{Exclusions, RegistryAccess, RegistryView};
use crate::config::ReloadConfig;
use crate::set::RegistrySet;
use crate::snapshot::{RestorePolicy, RestoreStats, Snapshot, SnapshotEngine};

/// Phase of the reload state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadState {
	/// No live snapshot.
	Idle,
	/// Snapshot live; external overrides permitted.
	Priming,
}

/// Owner of a [`RegistrySet`] and of its reload lifecycle.
pub struct ReloadController {
	/// Live registries, mutated in place during a cycle.
	set: RegistrySet,
	/// Holder of the rollback snapshot; live exactly while priming.
	snapshots: SnapshotEngine,
	/// Whether listeners run on the next reload. Held false while rolling back.
	fire_load_event: bool,
	restore_policy: RestorePolicy,
	/// Exclusions for [`ReloadCycle::access`].
	default_exclusions: Exclusions,
	/// Run by `prime`, in registration order.
	load_listeners: Vec<LoadRegistration>,
	/// Run after commit, in registration order.
	ready_listeners: Vec<ReadyRegistration>,
}

impl ReloadController {
	pub fn new(config: &ReloadConfig) -> Self {
		Self::with_set(RegistrySet::new(), config)
	}

	/// Takes ownership of an already populated set.
	pub fn with_set(set: RegistrySet, config: &ReloadConfig) -> Self {
		Self {
			set,
			snapshots: SnapshotEngine::new(),
			fire_load_event: config.fire_load_event,
			restore_policy: config.restore,
			default_exclusions: config.exclusions(),
			load_listeners: Vec::new(),
			ready_listeners: Vec::new(),
		}
	}

	pub fn state(&self) -> ReloadState {
		if self.snapshots.is_live() {
			ReloadState::Priming
		} else {
			ReloadState::Idle
		}
	}

	/// Read-only view of the current registries.
	pub fn registries(&self) -> RegistryView<'_> {
		RegistryView::new(&self.set, Exclusions::none())
	}

	pub fn is_marked_for_load_event(&self) -> bool {
		self.fire_load_event
	}

	/// Sets whether the next reload dispatches listeners.
	pub fn mark_for_load_event(&mut self, ready: bool) -> &mut Self {
		self.fire_load_event = ready;
		self
	}

	/// Registers a listener run during priming, seeing every registry except `exclusions`.
	pub fn add_load_listener<L>(&mut self, name: impl Into<String>, exclusions: Exclusions, listener: L) -> &mut Self
	where
		L: LoadListener + 'static,
	{
		self.load_listeners.push(LoadRegistration {
			name: name.into(),
			exclusions,
			listener: Box::new(listener),
		});
		self
	}

	/// Registers a listener run after each committed reload.
	pub fn add_ready_listener<L>(&mut self, name: impl Into<String>, listener: L) -> &mut Self
	where
		L: ReadyListener + 'static,
	{
		self.ready_listeners.push(ReadyRegistration {
			name: name.into(),
			listener: Box::new(listener),
		});
		self
	}

	/// Starts a reload cycle, capturing a snapshot unless one is already live.
	pub fn begin(&mut self) -> ReloadCycle<'_> {
		self.create_snapshot();
		ReloadCycle::new(self)
	}

	/// Captures the registries unless a snapshot is already live.
	pub fn create_snapshot(&mut self) -> &Snapshot {
		self.snapshots.capture(&self.set)
	}

	/// Restores the registries from the live snapshot and disposes it.
	///
	/// Returns `None` without touching anything when idle.
	pub fn rollback(&mut self) -> Option<RestoreStats> {
		let fire = std::mem::replace(&mut self.fire_load_event, false);
		let stats = self.snapshots.restore(&self.set, self.restore_policy);
		self.snapshots.dispose();
		self.fire_load_event = fire;
		stats
	}

	/// Drops the live snapshot, keeping the current registry contents.
	pub fn dispose_snapshots(&mut self) -> bool {
		self.snapshots.dispose().is_some()
	}

	/// Runs a whole cycle: `load` fills the set, listeners prime it, then commit.
	///
	/// Any failure rolls back and is returned.
	pub fn reload<F, E>(&mut self, load: F) -> Result<ReloadReport, ReloadError>
	where
		F: FnOnce(&RegistrySet) -> Result<(), E>,
		E: Into<BoxError>,
	{
		let mut cycle = self.begin();
		if let Err(e) = load(cycle.registries()) {
			cycle.rollback();
			return Err(ReloadError::Load(e.into()));
		}
		if let Err(e) = cycle.prime() {
			cycle.rollback();
			return Err(e);
		}
		Ok(cycle.commit())
	}

	fn dispatch_load(&self) -> Result<usize, ReloadError> {
		if !self.fire_load_event {
			debug!(listeners = self.load_listeners.len(), "not marked for load event, skipping load listeners");
			return Ok(0);
		}
		for reg in &self.load_listeners {
			debug!(listener = %reg.name, "dispatching load listener");
			let access = RegistryAccess::new(&self.set, reg.exclusions);
			reg.listener.on_load(access).map_err(|source| {
				warn!(listener = %reg.name, error = %source, "load listener failed");
				ReloadError::Listener {
					listener: reg.name.clone(),
					source,
				}
			})?;
		}
		Ok(self.load_listeners.len())
	}

	fn commit(&mut self, load_listeners: usize) -> ReloadReport {
		let epoch = self.snapshots.dispose().map(|s| s.epoch());
		let ready_listeners = if self.fire_load_event {
			let view = RegistryView::new(&self.set, Exclusions::none());
			for reg in &self.ready_listeners {
				debug!(listener = %reg.name, "dispatching ready listener");
				reg.listener.on_ready(view);
			}
			self.ready_listeners.len()
		} else {
			0
		};
		info!(?epoch, entries = self.set.len(), "registry reload committed");
		ReloadReport {
			epoch,
			load_listeners,
			ready_listeners,
		}
	}
}

impl Default for ReloadController {
	fn default() -> Self {
		Self::new(&ReloadConfig::default())
	}
}

impl std::fmt::Debug for ReloadController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ReloadController")
			.field("state", &self.state())
			.field("fire_load_event", &self.fire_load_event)
			.field("restore_policy", &self.restore_policy)
			.field("load_listeners", &self.load_listeners.len())
			.field("ready_listeners", &self.ready_listeners.len())
			.finish_non_exhaustive()
	}
}
