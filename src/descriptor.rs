//! Service descriptor: where the auth and resource endpoints live and how sessions age.
//!
//! The descriptor is the console's configuration surface. It is validated once at build time so
//! request code can join paths without re-checking URLs.

/// Builder API for assembling service descriptors.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, auth::Session, descriptor::builder::validate_endpoint};

/// Default header carrying the refresh token when [`RefreshTransport::Header`] is selected.
pub const DEFAULT_REFRESH_HEADER: &str = "refresh-token";

/// How the refresh token reaches the refresh endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum RefreshTransport {
	#[default]
	/// `POST {"refreshToken": ...}`.
	Body,
	/// `GET` with the refresh token in the named header.
	Header {
		/// Header name.
		name: String,
	},
}
impl RefreshTransport {
	/// Header transport using [`DEFAULT_REFRESH_HEADER`].
	pub fn default_header() -> Self {
		Self::Header { name: DEFAULT_REFRESH_HEADER.into() }
	}
}

/// Authentication endpoints. Requests to these never pass through the refresh coordinator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthEndpoints {
	/// Login endpoint.
	pub login: Url,
	/// Registration endpoint.
	pub register: Url,
	/// Token refresh endpoint.
	pub refresh: Url,
}
impl AuthEndpoints {
	fn iter(&self) -> impl Iterator<Item = &Url> {
		[&self.login, &self.register, &self.refresh].into_iter()
	}
}

/// Immutable, validated service configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
	/// Authentication endpoints.
	pub auth: AuthEndpoints,
	/// Base URL under which `zones` and `delivery` resources live.
	pub resource_base: Url,
	/// Age after which a session's access token is refreshed before use.
	pub session_lifetime: Duration,
	/// Refresh token delivery mode.
	pub refresh_transport: RefreshTransport,
}
impl ServiceDescriptor {
	/// Creates a new builder.
	pub fn builder() -> ServiceDescriptorBuilder {
		ServiceDescriptorBuilder::default()
	}

	/// Derives the conventional layout: `/login`, `/register`, and `/refresh-token` under
	/// `auth_base`, resources under `resource_base`.
	pub fn from_bases(auth_base: Url, resource_base: Url) -> Result<Self, DescriptorError> {
		validate_endpoint("auth base", &auth_base)?;

		Self::builder()
			.login_endpoint(join_segments(&auth_base, ["login"]))
			.register_endpoint(join_segments(&auth_base, ["register"]))
			.refresh_endpoint(join_segments(&auth_base, ["refresh-token"]))
			.resource_base(resource_base)
			.build()
	}

	/// Returns `true` when `url` targets one of the auth endpoints.
	pub fn is_auth_endpoint(&self, url: &Url) -> bool {
		self.auth.iter().any(|endpoint| {
			url.scheme() == endpoint.scheme()
				&& url.host_str() == endpoint.host_str()
				&& url.port_or_known_default() == endpoint.port_or_known_default()
				&& path_within(url.path(), endpoint.path())
		})
	}

	/// Builds a resource URL by appending percent-encoded path segments to the resource base.
	pub fn resource_url<I, S>(&self, segments: I) -> Url
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		join_segments(&self.resource_base, segments)
	}
}

fn join_segments<I, S>(base: &Url, segments: I) -> Url
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut url = base.clone();

	// Validated descriptors never hold cannot-be-a-base URLs.
	if let Ok(mut path) = url.path_segments_mut() {
		path.pop_if_empty().extend(segments);
	}

	url
}

fn path_within(path: &str, prefix: &str) -> bool {
	let prefix = prefix.trim_end_matches('/');

	match path.strip_prefix(prefix) {
		Some(rest) => rest.is_empty() || rest.starts_with('/'),
		None => false,
	}
}

/// Default session lifetime used by new builders.
pub(crate) const DEFAULT_SESSION_LIFETIME: Duration = Session::DEFAULT_LIFETIME;
