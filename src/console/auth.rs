//! Login, registration, logout, and session checks.

// self
use crate::{
	_prelude::*,
	auth::{Credentials, Session, TokenClaims, TokenPair},
	console::Console,
	coordinator::Flight,
	http::{ApiRequest, HttpTransport},
	obs::{self, CallKind},
};

/// Snapshot of the stored session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionStatus {
	/// `true` when both tokens and a creation timestamp are stored.
	pub authenticated: bool,
	/// When the stored pair was issued.
	pub created_at: Option<OffsetDateTime>,
	/// Time left before the access token is refreshed on use.
	pub remaining: Duration,
}
impl SessionStatus {
	/// Remaining lifetime in whole minutes.
	pub fn remaining_minutes(&self) -> i64 {
		self.remaining.whole_minutes()
	}

	/// Returns `true` once the access token is due for a refresh.
	pub fn is_expired(&self) -> bool {
		self.authenticated && self.remaining.is_zero()
	}
}

impl<C> Console<C>
where
	C: ?Sized + HttpTransport,
{
	/// Signs in and stores the issued session.
	pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
		obs::observe(CallKind::Auth, "login", async {
			credentials.validate()?;

			self.authenticate(self.descriptor.auth.login.clone(), credentials, "Failed to sign in.")
				.await
		})
		.await
	}

	/// Creates an account and stores the issued session.
	pub async fn register(&self, credentials: &Credentials) -> Result<Session> {
		obs::observe(CallKind::Auth, "register", async {
			credentials.validate()?;

			self.authenticate(
				self.descriptor.auth.register.clone(),
				credentials,
				"Failed to register user.",
			)
			.await
		})
		.await
	}

	/// Forces a refresh through the coordinator and returns the stored result.
	///
	/// Joins a refresh that is already in flight instead of starting another one. On failure the
	/// session has been cleared and the error is [`Error::SessionExpired`].
	pub async fn refresh_session(&self) -> Result<Session> {
		obs::observe(CallKind::Auth, "refresh_session", async {
			self.coordinator
				.run(None, || self.refresh_stored())
				.await
				.into_outcome()
				.transpose()
				.map_err(|source| Error::SessionExpired { source })?;

			self.store.load().await?.ok_or_else(|| Error::LoginRequired {
				reason: "the refreshed session is gone".into(),
			})
		})
		.await
	}

	/// Drops the stored session.
	pub async fn logout(&self) -> Result<()> {
		obs::observe(CallKind::Auth, "logout", async { Ok(self.store.clear().await?) }).await
	}

	/// Returns `true` when an access token and its creation timestamp are stored.
	pub async fn is_authenticated(&self) -> Result<bool> {
		Ok(self.store.load().await?.is_some_and(|session| has_timestamp(&session)))
	}

	/// Route-guard check: refreshes an expired session and reports whether the caller may
	/// proceed. Yields `false` whenever [`Console::is_authenticated`] would. A failed refresh
	/// clears the session and yields `false`.
	pub async fn check_and_refresh(&self) -> Result<bool> {
		obs::observe(CallKind::Auth, "check_and_refresh", async {
			let observed = self.coordinator.generation();
			let Some(session) = self.store.load().await? else {
				return Ok(false);
			};

			if !has_timestamp(&session) {
				return Ok(false);
			}
			if !session.is_expired_at(OffsetDateTime::now_utc(), self.descriptor.session_lifetime) {
				return Ok(true);
			}

			match self.coordinator.run(Some(observed), || self.refresh_stored()).await {
				Flight::Led(outcome) | Flight::Joined(outcome) => Ok(outcome.is_ok()),
				Flight::Superseded => Ok(self.store.load().await?.is_some()),
			}
		})
		.await
	}

	/// Reports whether a session is stored and how long its access token stays usable.
	pub async fn session_status(&self) -> Result<SessionStatus> {
		let status = match self.store.load().await? {
			Some(session) if has_timestamp(&session) => SessionStatus {
				authenticated: true,
				created_at: Some(session.created_at),
				remaining: session
					.remaining_at(OffsetDateTime::now_utc(), self.descriptor.session_lifetime),
			},
			_ =>
				SessionStatus { authenticated: false, created_at: None, remaining: Duration::ZERO },
		};

		Ok(status)
	}

	/// Decodes the claims of the stored access token, if a session exists.
	pub async fn session_claims(&self) -> Result<Option<TokenClaims>> {
		match self.store.load().await? {
			Some(session) => Ok(Some(session.claims()?)),
			None => Ok(None),
		}
	}

	async fn authenticate(
		&self,
		endpoint: Url,
		credentials: &Credentials,
		fallback: &str,
	) -> Result<Session> {
		let request = ApiRequest::post(endpoint).json(credentials)?;
		let pair: TokenPair = self.send_json(request, fallback).await?;
		let session = Session::from_pair(pair, OffsetDateTime::now_utc());

		self.store.save(session.clone()).await?;

		Ok(session)
	}
}

// Sessions loaded without a readable timestamp carry the UNIX epoch.
fn has_timestamp(session: &Session) -> bool {
	session.created_at != OffsetDateTime::UNIX_EPOCH
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn status_reports_whole_minutes() {
		let status = SessionStatus {
			authenticated: true,
			created_at: Some(OffsetDateTime::UNIX_EPOCH),
			remaining: Duration::seconds(9 * 60 + 59),
		};

		assert_eq!(status.remaining_minutes(), 9);
		assert!(!status.is_expired());
	}
}
