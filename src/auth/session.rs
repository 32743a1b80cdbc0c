//! Persisted session record and its lifetime arithmetic.
//!
//! A [`Session`] is stored as three string entries ([`ACCESS_TOKEN_KEY`],
//! [`REFRESH_TOKEN_KEY`], [`CREATED_AT_KEY`]) so any key/value backend can hold it. The creation
//! instant is written as epoch milliseconds. Entries missing either token do not form a session;
//! entries whose timestamp is absent or unreadable load with the UNIX epoch as their creation
//! instant, which makes them immediately due for a refresh.

// self
use crate::{
	_prelude::*,
	auth::{ClaimsError, TokenClaims, TokenSecret},
};

/// Storage key holding the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key holding the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Storage key holding the creation instant in epoch milliseconds.
pub const CREATED_AT_KEY: &str = "token_created_at";

const NANOS_PER_MILLI: i128 = 1_000_000;

/// Access/refresh pair returned by the login, register, and refresh endpoints.
#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
	/// Bearer token attached to resource requests.
	pub access_token: TokenSecret,
	/// Token exchanged for a new pair once the access token ages out.
	pub refresh_token: TokenSecret,
}
impl Debug for TokenPair {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenPair")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &"<redacted>")
			.finish()
	}
}

/// Authenticated session persisted between requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Refresh token secret.
	pub refresh_token: TokenSecret,
	/// Instant the pair was obtained.
	pub created_at: OffsetDateTime,
}
impl Session {
	/// Fixed lifetime the backend grants an access token.
	pub const DEFAULT_LIFETIME: Duration = Duration::minutes(15);

	/// Creates a session from raw token strings.
	pub fn new(
		access_token: impl Into<String>,
		refresh_token: impl Into<String>,
		created_at: OffsetDateTime,
	) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: TokenSecret::new(refresh_token),
			created_at,
		}
	}

	/// Stamps a freshly issued pair with `created_at`.
	pub fn from_pair(pair: TokenPair, created_at: OffsetDateTime) -> Self {
		Self { access_token: pair.access_token, refresh_token: pair.refresh_token, created_at }
	}

	/// Rebuilds a session from its stored entries.
	pub fn from_entries(entries: &BTreeMap<String, String>) -> Option<Self> {
		let access = entries.get(ACCESS_TOKEN_KEY).filter(|v| !v.is_empty())?;
		let refresh = entries.get(REFRESH_TOKEN_KEY).filter(|v| !v.is_empty())?;
		let created_at = entries
			.get(CREATED_AT_KEY)
			.and_then(|raw| raw.trim().parse::<i64>().ok())
			.and_then(|millis| {
				OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * NANOS_PER_MILLI).ok()
			})
			.unwrap_or(OffsetDateTime::UNIX_EPOCH);

		Some(Self::new(access.as_str(), refresh.as_str(), created_at))
	}

	/// Renders the session as its three stored entries.
	pub fn to_entries(&self) -> BTreeMap<String, String> {
		BTreeMap::from([
			(ACCESS_TOKEN_KEY.to_owned(), self.access_token.expose().to_owned()),
			(REFRESH_TOKEN_KEY.to_owned(), self.refresh_token.expose().to_owned()),
			(CREATED_AT_KEY.to_owned(), self.created_at_millis().to_string()),
		])
	}

	/// Creation instant in epoch milliseconds.
	pub fn created_at_millis(&self) -> i64 {
		let millis = self.created_at.unix_timestamp_nanos() / NANOS_PER_MILLI;

		i64::try_from(millis).unwrap_or(i64::MAX)
	}

	/// Time elapsed since the session was created.
	pub fn age_at(&self, now: OffsetDateTime) -> Duration {
		now - self.created_at
	}

	/// Returns `true` once `lifetime` has elapsed since creation.
	pub fn is_expired_at(&self, now: OffsetDateTime, lifetime: Duration) -> bool {
		self.age_at(now) >= lifetime
	}

	/// Remaining lifetime, clamped to zero.
	pub fn remaining_at(&self, now: OffsetDateTime, lifetime: Duration) -> Duration {
		let remaining = lifetime - self.age_at(now);

		if remaining.is_negative() { Duration::ZERO } else { remaining }
	}

	/// Remaining lifetime in whole minutes, rounded down.
	pub fn remaining_minutes_at(&self, now: OffsetDateTime, lifetime: Duration) -> i64 {
		self.remaining_at(now, lifetime).whole_minutes()
	}

	/// Decodes the claims carried by the access token.
	pub fn claims(&self) -> Result<TokenClaims, ClaimsError> {
		TokenClaims::decode(self.access_token.expose())
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session")
			.field("access_token", &"<redacted>")
			.field("refresh_token", &"<redacted>")
			.field("created_at", &self.created_at)
			.finish()
	}
}
