#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use serde_json::json;
// self
use courier_admin::{
	_preludet::*,
	auth::{Credentials, Session},
	console::Console,
	coordinator::RefreshCoordinator,
	error::TransportError,
	http::{ApiRequest, ApiResponse, HttpTransport, Method, TransportFuture},
	model::PageRequest,
	store::{MemoryStore, SessionStore, StoreFuture},
};

#[derive(Clone, Debug, PartialEq)]
struct Recorded {
	method: Method,
	path: String,
	bearer: Option<String>,
	retried: bool,
}

/// Answers every request from a path table and records what it saw.
#[derive(Default)]
struct RecordingTransport {
	routes: Mutex<HashMap<String, ApiResponse>>,
	seen: Mutex<Vec<Recorded>>,
}
impl RecordingTransport {
	fn route(self, path: &str, response: ApiResponse) -> Self {
		self.routes.lock().insert(path.into(), response);

		self
	}

	fn seen(&self) -> Vec<Recorded> {
		self.seen.lock().clone()
	}
}
impl HttpTransport for RecordingTransport {
	fn execute<'a>(&'a self, request: &'a ApiRequest) -> TransportFuture<'a> {
		Box::pin(async move {
			self.seen.lock().push(Recorded {
				method: request.method,
				path: request.url.path().into(),
				bearer: request.bearer.as_ref().map(|token| token.expose().to_owned()),
				retried: request.retried,
			});

			self.routes.lock().get(request.url.path()).cloned().ok_or_else(|| {
				TransportError::network(std::io::Error::other("No route configured for the path."))
			})
		})
	}
}

/// Completes a refresh cycle of its own while the first load is in progress.
struct RacingStore {
	inner: MemoryStore,
	coordinator: Arc<RefreshCoordinator>,
	raced: Mutex<Option<Session>>,
}
impl SessionStore for RacingStore {
	fn load(&self) -> StoreFuture<'_, Option<Session>> {
		Box::pin(async move {
			let raced = self.raced.lock().take();

			if let Some(session) = raced {
				self.inner.save(session.clone()).await?;
				self.coordinator.run(None, || async move { Ok(session.access_token) }).await;
			}

			self.inner.load().await
		})
	}

	fn save(&self, session: Session) -> StoreFuture<'_, ()> {
		self.inner.save(session)
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		self.inner.clear()
	}
}

fn console_with(transport: RecordingTransport) -> (Console<RecordingTransport>, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::default());
	let console = Console::with_http_client(
		store.clone(),
		test_descriptor("http://backend.test"),
		transport,
	);

	(console, store)
}

fn pair(access: &str, refresh: &str) -> ApiResponse {
	ApiResponse::json(200, &json!({ "accessToken": access, "refreshToken": refresh }))
}

#[tokio::test]
async fn auth_requests_never_carry_a_bearer_token() {
	let transport = RecordingTransport::default()
		.route("/login", pair("login-access", "login-refresh"))
		.route("/register", pair("register-access", "register-refresh"));
	let (console, store) = console_with(transport);

	store
		.save(session_aged("expired-access", "expired-refresh", Duration::hours(1)))
		.await
		.expect("Failed to seed session into the memory store.");

	let credentials = Credentials::new("ops@example.com", "hunter2");

	console.register(&credentials).await.expect("Register should succeed.");
	console.login(&credentials).await.expect("Login should succeed.");

	let seen = console.http_client.seen();

	assert_eq!(seen.len(), 2);
	assert!(seen.iter().all(|request| request.bearer.is_none()));
	assert_eq!(console.coordinator.generation(), 0);
}

#[tokio::test]
async fn resource_requests_carry_the_stored_token() {
	let transport = RecordingTransport::default()
		.route("/zones", ApiResponse::json(200, &json!({ "zones": [], "total": 0 })));
	let (console, store) = console_with(transport);

	console.list_zones(PageRequest::default()).await.expect("Anonymous listing should succeed.");
	store
		.save(session_aged("current-access", "current-refresh", Duration::minutes(3)))
		.await
		.expect("Failed to seed session into the memory store.");
	console.list_zones(PageRequest::default()).await.expect("Signed-in listing should succeed.");

	let bearers =
		console.http_client.seen().into_iter().map(|request| request.bearer).collect::<Vec<_>>();

	assert_eq!(bearers, vec![None, Some("current-access".to_owned())]);
}

#[tokio::test]
async fn retried_request_is_marked_and_not_retried_again() {
	let transport = RecordingTransport::default()
		.route("/zones/1", ApiResponse::json(401, &json!({ "message": "Unauthorized" })))
		.route("/refresh-token", pair("second-access", "second-refresh"));
	let (console, store) = console_with(transport);

	store
		.save(session_aged("first-access", "first-refresh", Duration::minutes(3)))
		.await
		.expect("Failed to seed session into the memory store.");

	let err = console.get_zone(1).await.expect_err("Persistent 401 should be surfaced.");

	assert_eq!(err.status(), Some(401));
	assert_eq!(
		console.http_client.seen(),
		vec![
			Recorded {
				method: Method::Get,
				path: "/zones/1".into(),
				bearer: Some("first-access".into()),
				retried: false,
			},
			Recorded {
				method: Method::Post,
				path: "/refresh-token".into(),
				bearer: None,
				retried: false,
			},
			Recorded {
				method: Method::Get,
				path: "/zones/1".into(),
				bearer: Some("second-access".into()),
				retried: true,
			},
		]
	);
}

#[tokio::test]
async fn transport_failures_during_refresh_clear_the_session() {
	let (console, store) = console_with(RecordingTransport::default());

	store
		.save(session_aged("stale-access", "stale-refresh", Duration::minutes(30)))
		.await
		.expect("Failed to seed session into the memory store.");

	let err = console.get_courier(4).await.expect_err("Refresh without a route should fail.");

	assert!(matches!(err, Error::Refresh(_)));
	assert!(store.is_empty());
	assert_eq!(console.coordinator.metrics().failures(), 1);
}

#[tokio::test]
async fn token_from_a_cycle_finished_mid_load_is_refreshed_after_401() {
	let transport = RecordingTransport::default()
		.route("/zones/1", ApiResponse::json(401, &json!({ "message": "Unauthorized" })))
		.route("/refresh-token", pair("second-access", "second-refresh"));
	let coordinator = Arc::new(RefreshCoordinator::default());
	let raced = session_aged("raced-access", "raced-refresh", Duration::minutes(1));
	let store = Arc::new(RacingStore {
		inner: MemoryStore::default(),
		coordinator: coordinator.clone(),
		raced: Mutex::new(Some(raced)),
	});
	let console = Console {
		http_client: Arc::new(transport),
		store: store.clone(),
		descriptor: test_descriptor("http://backend.test"),
		coordinator,
	};
	let err = console.get_zone(1).await.expect_err("Persistent 401 should be surfaced.");

	assert_eq!(err.status(), Some(401));
	assert_eq!(
		console.http_client.seen(),
		vec![
			Recorded {
				method: Method::Get,
				path: "/zones/1".into(),
				bearer: Some("raced-access".into()),
				retried: false,
			},
			Recorded {
				method: Method::Post,
				path: "/refresh-token".into(),
				bearer: None,
				retried: false,
			},
			Recorded {
				method: Method::Get,
				path: "/zones/1".into(),
				bearer: Some("second-access".into()),
				retried: true,
			},
		]
	);
	assert_eq!(console.coordinator.generation(), 2);
	assert_eq!(console.coordinator.metrics().superseded(), 0);

	let stored = store
		.load()
		.await
		.expect("Failed to load session from the racing store.")
		.expect("Refreshed session should remain stored.");

	assert_eq!(stored.access_token.expose(), "second-access");
}
