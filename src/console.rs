//! Console facade: one handle that owns the transport, the session store, the service
//! descriptor, and the refresh coordinator shared by every request it sends.

pub mod auth;

mod couriers;
mod dispatch;
mod zones;

pub use auth::SessionStatus;

// self
use crate::{
	_prelude::*, coordinator::RefreshCoordinator, descriptor::ServiceDescriptor,
	http::HttpTransport, store::SessionStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Console specialized for the crate's default reqwest transport.
pub type ReqwestConsole = Console<ReqwestHttpClient>;

/// Async client for the courier dispatch admin backend.
///
/// Clones share the transport, the store, and the refresh coordinator, so a refresh started
/// through one clone is joined by requests issued through any other. Auth endpoints named by the
/// descriptor bypass the coordinator; every other request gets a fresh token attached before
/// dispatch and one transparent retry after a 401.
pub struct Console<C>
where
	C: ?Sized + HttpTransport,
{
	/// HTTP transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Session persistence.
	pub store: Arc<dyn SessionStore>,
	/// Endpoint layout and session lifetime.
	pub descriptor: ServiceDescriptor,
	/// Single-flight guard shared by all clones.
	pub coordinator: Arc<RefreshCoordinator>,
}
impl<C> Console<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a console that reuses the caller-provided transport.
	pub fn with_http_client(
		store: Arc<dyn SessionStore>,
		descriptor: ServiceDescriptor,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			store,
			descriptor,
			coordinator: Default::default(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl Console<ReqwestHttpClient> {
	/// Creates a console with its own reqwest transport.
	///
	/// Use [`ReqwestHttpClient::with_timeout`] together with [`Console::with_http_client`] when
	/// requests need a deadline.
	pub fn new(store: Arc<dyn SessionStore>, descriptor: ServiceDescriptor) -> Self {
		Self::with_http_client(store, descriptor, ReqwestHttpClient::default())
	}
}
impl<C> Clone for Console<C>
where
	C: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			store: self.store.clone(),
			descriptor: self.descriptor.clone(),
			coordinator: self.coordinator.clone(),
		}
	}
}
impl<C> Debug for Console<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Console")
			.field("descriptor", &self.descriptor)
			.field("coordinator", &self.coordinator)
			.finish()
	}
}
