//! Storage contract and built-in backends for the persisted [`Session`].

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::Session};

/// Boxed future returned by [`SessionStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Durable client-side storage for the single active session.
///
/// Implementations persist the three entries produced by [`Session::to_entries`] and clear them
/// together.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Loads the current session, if one is stored.
	fn load(&self) -> StoreFuture<'_, Option<Session>>;

	/// Persists `session`, replacing any previous one.
	fn save(&self, session: Session) -> StoreFuture<'_, ()>;

	/// Removes every session entry.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
