//! Login and registration payloads.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ValidationError};

/// Email/password pair accepted by the login and register endpoints.
#[derive(Clone, Serialize)]
pub struct Credentials {
	/// Account email.
	pub email: String,
	/// Account password.
	pub password: TokenSecret,
}
impl Credentials {
	/// Creates a credential pair.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: TokenSecret::new(password) }
	}

	/// Checks that both fields are present.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.email.trim().is_empty() {
			return Err(ValidationError::Missing { field: "email" });
		}
		if self.password.is_empty() {
			return Err(ValidationError::Missing { field: "password" });
		}

		Ok(())
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}
