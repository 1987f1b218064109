//! Shared registry vocabulary: keys, lifecycles, value handles and registry ids.

pub mod id;
pub mod key;
pub mod lifecycle;
pub mod value;

pub use id::{RegistryId, RegistryIdSet, UnknownRegistry};
pub use key::{DEFAULT_NAMESPACE, Key, KeyError};
pub use lifecycle::Lifecycle;
pub use value::Value;
