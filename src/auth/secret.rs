//! Access tokens, refresh tokens, and passwords all travel as [`TokenSecret`] so none of them
//! can end up in a `Debug` dump of a session, a request, or a credential pair.

// self
use crate::_prelude::*;

/// Session or login secret. Serializes as the bare string the backend expects; formats as
/// `<redacted>`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a token or password.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw value, for request bodies and the session store only.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// `Authorization` header value attached to resource requests.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}

	/// Empty secrets never count as a stored refresh token.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
