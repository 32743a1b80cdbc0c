//! Read-only view over the JWT payload of an access token.
//!
//! The console never verifies signatures; the backend does. Claims are decoded only so callers can
//! show who is signed in.

// crates.io
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Map, Value};
// self
use crate::_prelude::*;

/// Failures raised while decoding an access token payload.
#[derive(Debug, ThisError)]
pub enum ClaimsError {
	/// Token does not have the `header.payload.signature` shape.
	#[error("Access token is not a JWT.")]
	Malformed,
	/// Payload segment is not valid base64url.
	#[error("Access token payload is not valid base64url.")]
	Encoding(#[from] base64::DecodeError),
	/// Payload segment is not a JSON object.
	#[error("Access token payload is not a JSON object.")]
	Json(#[from] serde_json::Error),
}

/// Claims carried by an access token.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenClaims(Map<String, Value>);
impl TokenClaims {
	/// Decodes the payload segment of `token`.
	pub fn decode(token: &str) -> Result<Self, ClaimsError> {
		let mut segments = token.split('.');
		let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
			(Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
			_ => return Err(ClaimsError::Malformed),
		};
		let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;

		Ok(Self(serde_json::from_slice(&bytes)?))
	}

	/// Returns a raw claim.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.0.get(name)
	}

	/// `sub` claim, when it is a string or number.
	pub fn subject(&self) -> Option<String> {
		match self.get("sub")? {
			Value::String(value) => Some(value.clone()),
			Value::Number(value) => Some(value.to_string()),
			_ => None,
		}
	}

	/// `email` claim.
	pub fn email(&self) -> Option<&str> {
		self.get("email").and_then(Value::as_str)
	}

	/// `exp` claim as an instant.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		let secs = self.get("exp").and_then(Value::as_i64)?;

		OffsetDateTime::from_unix_timestamp(secs).ok()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn token_with(payload: &str) -> String {
		format!("eyJhbGciOiJIUzI1NiJ9.{}.c2lnbmF0dXJl", URL_SAFE_NO_PAD.encode(payload))
	}

	#[test]
	fn decodes_payload_claims() {
		let token = token_with(r#"{"sub":42,"email":"ops@example.com","exp":1740823200}"#);
		let claims = TokenClaims::decode(&token).expect("Well-formed token should decode.");

		assert_eq!(claims.subject().as_deref(), Some("42"));
		assert_eq!(claims.email(), Some("ops@example.com"));
		assert_eq!(claims.expires_at().map(|at| at.unix_timestamp()), Some(1_740_823_200));
	}

	#[test]
	fn rejects_tokens_without_three_segments() {
		assert!(matches!(TokenClaims::decode("opaque-token"), Err(ClaimsError::Malformed)));
		assert!(matches!(TokenClaims::decode("a..c"), Err(ClaimsError::Malformed)));
	}

	#[test]
	fn rejects_non_json_payloads() {
		let token = token_with("not json");

		assert!(matches!(TokenClaims::decode(&token), Err(ClaimsError::Json(_))));
	}
}
