//! Collaborators notified around a reload.

use super::error::BoxError;
use crate::access::{Exclusions, RegistryAccess, RegistryView};

/// Invoked while a reload is priming, with override rights over the visible registries.
///
/// Returning an error aborts the cycle and rolls every registry back.
pub trait LoadListener: Send + Sync {
	fn on_load(&self, access: RegistryAccess<'_>) -> Result<(), BoxError>;
}

impl<F> LoadListener for F
where
	F: Fn(RegistryAccess<'_>) -> Result<(), BoxError> + Send + Sync,
{
	fn on_load(&self, access: RegistryAccess<'_>) -> Result<(), BoxError> {
		self(access)
	}
}

/// Invoked once a reload has committed, with read-only access.
pub trait ReadyListener: Send + Sync {
	fn on_ready(&self, view: RegistryView<'_>);
}

impl<F> ReadyListener for F
where
	F: Fn(RegistryView<'_>) + Send + Sync,
{
	fn on_ready(&self, view: RegistryView<'_>) {
		self(view)
	}
}

pub(crate) struct LoadRegistration {
	pub(crate) name: String,
	pub(crate) exclusions: Exclusions,
	pub(crate) listener: Box<dyn LoadListener>,
}

pub(crate) struct ReadyRegistration {
	pub(crate) name: String,
	pub(crate) listener: Box<dyn ReadyListener>,
}
