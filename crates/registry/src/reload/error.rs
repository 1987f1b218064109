/// Error raised by a collaborator (content loader or listener).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a reload cycle was rolled back.
///
/// The controller does not interpret the cause; any failure takes the rollback path.
#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
	#[error("content load failed")]
	Load(#[source] BoxError),

	#[error("load listener {listener:?} failed")]
	Listener {
		listener: String,
		#[source]
		source: BoxError,
	},
}
