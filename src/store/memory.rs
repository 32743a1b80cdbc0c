//! Thread-safe in-memory [`SessionStore`] for tests and short-lived processes.

// self
use crate::{
	_prelude::*,
	auth::Session,
	store::{SessionStore, StoreFuture},
};

type EntryMap = Arc<RwLock<BTreeMap<String, String>>>;

/// Keeps the session entries in-process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(EntryMap);
impl MemoryStore {
	/// Creates a store already holding `session`.
	pub fn with_session(session: &Session) -> Self {
		Self(Arc::new(RwLock::new(session.to_entries())))
	}

	/// Returns a copy of the raw stored entries.
	pub fn entries(&self) -> BTreeMap<String, String> {
		self.0.read().clone()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl SessionStore for MemoryStore {
	fn load(&self) -> StoreFuture<'_, Option<Session>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Session::from_entries(&map.read())) })
	}

	fn save(&self, session: Session) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().extend(session.to_entries());

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().clear();

			Ok(())
		})
	}
}
