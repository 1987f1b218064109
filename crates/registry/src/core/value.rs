use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque, shared handle to a registry value.
///
/// The registry never looks inside a value. Identity is the identity of the shared
/// allocation: two handles are [`same`](Value::same) only when one was cloned from
/// the other. Values are replaced wholesale, never mutated in place, which is what
/// lets snapshot restore treat identity as equality.
#[derive(Clone)]
pub struct Value {
	inner: Arc<dyn Any + Send + Sync>,
	type_name: &'static str,
}

impl Value {
	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self::from_arc(Arc::new(value))
	}

	pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
		Self {
			inner: value,
			type_name: std::any::type_name::<T>(),
		}
	}

	/// Returns true if both handles point at the same allocation.
	#[inline]
	pub fn same(&self, other: &Value) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.inner.downcast_ref::<T>()
	}

	/// Returns a typed handle sharing this value's allocation.
	pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
		Arc::clone(&self.inner).downcast::<T>().ok()
	}

	pub fn is<T: Any>(&self) -> bool {
		self.inner.is::<T>()
	}

	pub fn type_name(&self) -> &'static str {
		self.type_name
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Value")
			.field("type", &self.type_name)
			.field("ptr", &Arc::as_ptr(&self.inner).cast::<()>())
			.finish()
	}
}
