// self
use crate::{
	_prelude::*,
	descriptor::{AuthEndpoints, DEFAULT_SESSION_LIFETIME, RefreshTransport, ServiceDescriptor},
};

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum DescriptorError {
	/// A required endpoint was not configured.
	#[error("Missing {endpoint} endpoint.")]
	MissingEndpoint {
		/// Which endpoint is missing.
		endpoint: &'static str,
	},
	/// Endpoints must use HTTP or HTTPS.
	#[error("The {endpoint} endpoint must use http or https: {url}.")]
	UnsupportedScheme {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoint cannot have path segments appended.
	#[error("The {endpoint} endpoint cannot be used as a base URL: {url}.")]
	NotABase {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Session lifetime must be positive.
	#[error("Session lifetime must be positive.")]
	NonPositiveLifetime,
	/// Refresh header name must be a non-empty HTTP token.
	#[error("Refresh header name `{name}` is not a valid HTTP header name.")]
	InvalidRefreshHeader {
		/// Rejected header name.
		name: String,
	},
}

/// Builder for [`ServiceDescriptor`] values.
#[derive(Debug)]
pub struct ServiceDescriptorBuilder {
	/// Login endpoint.
	pub login_endpoint: Option<Url>,
	/// Registration endpoint.
	pub register_endpoint: Option<Url>,
	/// Refresh endpoint.
	pub refresh_endpoint: Option<Url>,
	/// Resource base URL.
	pub resource_base: Option<Url>,
	/// Session lifetime.
	pub session_lifetime: Duration,
	/// Refresh token delivery mode.
	pub refresh_transport: RefreshTransport,
}
impl Default for ServiceDescriptorBuilder {
	fn default() -> Self {
		Self {
			login_endpoint: None,
			register_endpoint: None,
			refresh_endpoint: None,
			resource_base: None,
			session_lifetime: DEFAULT_SESSION_LIFETIME,
			refresh_transport: RefreshTransport::default(),
		}
	}
}
impl ServiceDescriptorBuilder {
	/// Sets the login endpoint.
	pub fn login_endpoint(mut self, url: Url) -> Self {
		self.login_endpoint = Some(url);

		self
	}

	/// Sets the registration endpoint.
	pub fn register_endpoint(mut self, url: Url) -> Self {
		self.register_endpoint = Some(url);

		self
	}

	/// Sets the refresh endpoint.
	pub fn refresh_endpoint(mut self, url: Url) -> Self {
		self.refresh_endpoint = Some(url);

		self
	}

	/// Sets the base URL for zone and courier resources.
	pub fn resource_base(mut self, url: Url) -> Self {
		self.resource_base = Some(url);

		self
	}

	/// Overrides the session lifetime (defaults to 15 minutes).
	pub fn session_lifetime(mut self, lifetime: Duration) -> Self {
		self.session_lifetime = lifetime;

		self
	}

	/// Overrides how the refresh token is sent.
	pub fn refresh_transport(mut self, transport: RefreshTransport) -> Self {
		self.refresh_transport = transport;

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ServiceDescriptor, DescriptorError> {
		let login =
			self.login_endpoint.ok_or(DescriptorError::MissingEndpoint { endpoint: "login" })?;
		let register = self
			.register_endpoint
			.ok_or(DescriptorError::MissingEndpoint { endpoint: "register" })?;
		let refresh =
			self.refresh_endpoint.ok_or(DescriptorError::MissingEndpoint { endpoint: "refresh" })?;
		let resource_base = self
			.resource_base
			.ok_or(DescriptorError::MissingEndpoint { endpoint: "resource base" })?;
		let descriptor = ServiceDescriptor {
			auth: AuthEndpoints { login, register, refresh },
			resource_base,
			session_lifetime: self.session_lifetime,
			refresh_transport: self.refresh_transport,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

impl ServiceDescriptor {
	/// Validates invariants for the descriptor.
	fn validate(&self) -> Result<(), DescriptorError> {
		if !self.session_lifetime.is_positive() {
			return Err(DescriptorError::NonPositiveLifetime);
		}

		validate_endpoint("login", &self.auth.login)?;
		validate_endpoint("register", &self.auth.register)?;
		validate_endpoint("refresh", &self.auth.refresh)?;
		validate_endpoint("resource base", &self.resource_base)?;

		if let RefreshTransport::Header { name } = &self.refresh_transport {
			validate_header_name(name)?;
		}

		Ok(())
	}
}

pub(crate) fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), DescriptorError> {
	if !matches!(url.scheme(), "http" | "https") {
		return Err(DescriptorError::UnsupportedScheme { endpoint: name, url: url.to_string() });
	}
	if url.cannot_be_a_base() {
		return Err(DescriptorError::NotABase { endpoint: name, url: url.to_string() });
	}

	Ok(())
}

fn validate_header_name(name: &str) -> Result<(), DescriptorError> {
	let valid = !name.is_empty()
		&& name.bytes().all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b));

	if valid { Ok(()) } else { Err(DescriptorError::InvalidRefreshHeader { name: name.into() }) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(raw: &str) -> Url {
		Url::parse(raw).expect("Fixture URL should parse.")
	}

	fn complete() -> ServiceDescriptorBuilder {
		ServiceDescriptor::builder()
			.login_endpoint(url("https://auth.example.com/login"))
			.register_endpoint(url("https://auth.example.com/register"))
			.refresh_endpoint(url("https://auth.example.com/refresh-token"))
			.resource_base(url("https://api.example.com"))
	}

	#[test]
	fn missing_endpoints_are_reported() {
		let err = ServiceDescriptor::builder()
			.login_endpoint(url("https://auth.example.com/login"))
			.build()
			.expect_err("Descriptor without a register endpoint should fail.");

		assert_eq!(err, DescriptorError::MissingEndpoint { endpoint: "register" });
	}

	#[test]
	fn rejects_non_http_schemes() {
		let err = complete()
			.resource_base(url("ftp://api.example.com"))
			.build()
			.expect_err("FTP resource base should be rejected.");

		assert!(matches!(err, DescriptorError::UnsupportedScheme { endpoint: "resource base", .. }));
	}

	#[test]
	fn rejects_non_positive_lifetime() {
		let err = complete()
			.session_lifetime(Duration::ZERO)
			.build()
			.expect_err("Zero lifetime should be rejected.");

		assert_eq!(err, DescriptorError::NonPositiveLifetime);
	}

	#[test]
	fn validates_refresh_header_names() {
		let err = complete()
			.refresh_transport(RefreshTransport::Header { name: "refresh token".into() })
			.build()
			.expect_err("Header names with spaces should be rejected.");

		assert!(matches!(err, DescriptorError::InvalidRefreshHeader { .. }));
		assert!(complete().refresh_transport(RefreshTransport::default_header()).build().is_ok());
	}
}
