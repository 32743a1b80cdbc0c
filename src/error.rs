//! Console-level error types shared across the coordinator, transports, and stores.

// self
use crate::_prelude::*;

/// Console-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical console error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Backend answered with an error status or an unreadable body.
	#[error(transparent)]
	Response(#[from] ResponseError),
	/// Input failed an existence check before any network call.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// Shared failure of a refresh cycle; every waiter of that cycle receives the same value.
	#[error(transparent)]
	Refresh(#[from] RefreshError),
	/// Access token payload could not be decoded.
	#[error(transparent)]
	Claims(#[from] crate::auth::ClaimsError),

	/// An explicit session refresh failed and the session was cleared.
	#[error("Session expired.")]
	SessionExpired {
		/// Failure of the refresh cycle.
		#[source]
		source: RefreshError,
	},
	/// Session is gone; callers should send the user back to the login entry point.
	#[error("Login required: {reason}.")]
	LoginRequired {
		/// Why the session could not be recovered.
		reason: String,
	},
}
impl Error {
	/// Returns the HTTP status attached to the error, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Response(ResponseError::Status { status, .. }) => Some(*status),
			Self::Response(ResponseError::Decode { status, .. }) => Some(*status),
			Self::Refresh(RefreshError::Rejected { status, .. })
			| Self::SessionExpired { source: RefreshError::Rejected { status, .. } } => Some(*status),
			_ => None,
		}
	}

	/// Returns `true` when the session was cleared and the caller must log in again.
	pub fn requires_login(&self) -> bool {
		matches!(self, Self::LoginRequired { .. } | Self::Refresh(_) | Self::SessionExpired { .. })
	}
}

/// Configuration and request-building failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Service descriptor failed validation.
	#[error(transparent)]
	InvalidDescriptor(#[from] crate::descriptor::DescriptorError),
	/// Endpoint path could not be joined onto a base URL.
	#[error("Endpoint URL is invalid.")]
	InvalidUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request payload could not be serialized.
	#[error("Request body could not be encoded as JSON.")]
	RequestEncode(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the backend.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Non-success responses and undecodable bodies.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// Backend returned a non-2xx status. `message` is the backend's own `message` field when
	/// present, otherwise the operation's fallback text.
	#[error("{message}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// User-facing message.
		message: String,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Backend responded with JSON that does not match the expected shape.
	#[error("Backend returned malformed JSON.")]
	Decode {
		/// Structured parsing failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
}

/// Existence checks performed before a request is sent.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A required field was empty.
	#[error("The {field} field is required.")]
	Missing {
		/// Field name.
		field: &'static str,
	},
	/// A numeric field was NaN or infinite.
	#[error("The {field} field must be a valid number.")]
	NotANumber {
		/// Field name.
		field: &'static str,
	},
}

/// Outcome shared with every waiter when a refresh cycle fails.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RefreshError {
	/// Refresh endpoint answered with an error status.
	#[error("Refresh endpoint rejected the session ({status}): {message}")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Backend- or console-supplied message.
		message: String,
	},
	/// Refresh failed before the backend could answer, or the answer was unusable.
	#[error("Refresh failed: {message}")]
	Failed {
		/// Rendered description of the underlying failure.
		message: String,
	},
	/// The refresh was abandoned before completing.
	#[error("Refresh was cancelled before it completed.")]
	Cancelled,
	/// No refresh token is stored.
	#[error("No refresh token is available.")]
	MissingRefreshToken,
}
impl From<&Error> for RefreshError {
	fn from(err: &Error) -> Self {
		match err {
			Error::Refresh(inner) | Error::SessionExpired { source: inner } => inner.clone(),
			Error::Response(ResponseError::Status { status, message, .. }) =>
				Self::Rejected { status: *status, message: message.clone() },
			other => Self::Failed { message: other.to_string() },
		}
	}
}
