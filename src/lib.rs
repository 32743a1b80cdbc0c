//! Async admin client for courier dispatch backends: zones, couriers, geo-queries, and a
//! single-flight token refresh coordinator that keeps concurrent requests on one refresh call.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod console;
pub mod coordinator;
pub mod descriptor;
pub mod error;
pub mod http;
pub mod model;
pub mod obs;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Session,
		console::Console,
		descriptor::ServiceDescriptor,
		http::ReqwestHttpClient,
		store::{MemoryStore, SessionStore},
	};

	/// Console type alias used by reqwest-backed integration tests.
	pub type ReqwestTestConsole = Console<ReqwestHttpClient>;

	/// Builds a descriptor whose auth and resource endpoints both live under `base`.
	pub fn test_descriptor(base: &str) -> ServiceDescriptor {
		let base = Url::parse(base).expect("Mock server base URL should parse.");

		ServiceDescriptor::from_bases(base.clone(), base)
			.expect("Mock server descriptor should build successfully.")
	}

	/// Constructs a [`Console`] backed by an in-memory store and the reqwest transport used
	/// across integration tests.
	pub fn build_reqwest_test_console(base: &str) -> (ReqwestTestConsole, Arc<MemoryStore>) {
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn SessionStore> = store_backend.clone();
		let console = Console::with_http_client(
			store,
			test_descriptor(base),
			ReqwestHttpClient::default(),
		);

		(console, store_backend)
	}

	/// Builds a session whose creation instant lies `age` in the past.
	pub fn session_aged(access: &str, refresh: &str, age: Duration) -> Session {
		Session::new(access, refresh, OffsetDateTime::now_utc() - age)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap, VecDeque},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
