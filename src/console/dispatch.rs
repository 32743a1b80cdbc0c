//! Request pipeline: token attach, dispatch, 401 fallback, and status classification.
//!
//! Every non-auth request reads the stored session first. An expired session is refreshed
//! through the [`RefreshCoordinator`](crate::coordinator::RefreshCoordinator) so concurrent
//! requests share one refresh call. A 401 on a request that has not been retried forces one more
//! refresh cycle (or reuses a newer token if a cycle finished after the request left) and sends
//! the request again with `retried` set; a second 401 goes back to the caller untouched.

// self
use crate::{
	_prelude::*,
	auth::{Session, TokenPair, TokenSecret},
	console::Console,
	coordinator::RefreshOutcome,
	descriptor::RefreshTransport,
	error::{RefreshError, ResponseError},
	http::{ApiRequest, ApiResponse, HttpTransport},
	obs::{self, CallKind},
};

const SESSION_EXPIRED: &str = "Session expired.";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody<'a> {
	refresh_token: &'a TokenSecret,
}

impl<C> Console<C>
where
	C: ?Sized + HttpTransport,
{
	/// Sends `request` and decodes a 2xx body as `T`.
	pub(crate) async fn send_json<T>(&self, request: ApiRequest, fallback: &str) -> Result<T>
	where
		T: DeserializeOwned,
	{
		Ok(self.send(request, fallback).await?.decode()?)
	}

	/// Sends `request`, turning non-2xx responses into [`ResponseError::Status`] with the
	/// backend's message or `fallback`.
	pub(crate) async fn send(&self, request: ApiRequest, fallback: &str) -> Result<ApiResponse> {
		let response = self.send_raw(request).await?;

		if response.is_success() { Ok(response) } else { Err(reject(&response, fallback)) }
	}

	/// Sends `request` through the pipeline and returns the response whatever its status.
	pub(crate) async fn send_raw(&self, mut request: ApiRequest) -> Result<ApiResponse> {
		if self.descriptor.is_auth_endpoint(&request.url) {
			return Ok(self.http_client.execute(&request).await?);
		}

		let (bearer, generation) = self.ensure_fresh_token().await?;

		request.bearer = bearer;

		let response = self.http_client.execute(&request).await?;

		if response.status == 401 && !request.retried {
			return self.retry_unauthorized(request, generation).await;
		}

		Ok(response)
	}

	/// Returns the access token to attach (refreshing an expired one) together with the
	/// coordinator generation that token belongs to.
	async fn ensure_fresh_token(&self) -> Result<(Option<TokenSecret>, u64)> {
		loop {
			let observed = self.coordinator.generation();
			let loaded = self.store.load().await?;

			// A cycle that finished during the load may have handed back its own token.
			if self.coordinator.generation() != observed {
				continue;
			}

			let Some(session) = loaded else {
				return Ok((None, observed));
			};

			if !session.is_expired_at(OffsetDateTime::now_utc(), self.descriptor.session_lifetime) {
				return Ok((Some(session.access_token), observed));
			}

			let flight = self.coordinator.run(Some(observed), || self.refresh_stored()).await;

			if let Some(outcome) = flight.into_outcome() {
				return Ok((Some(outcome?), self.coordinator.generation()));
			}
			// A cycle finished after `observed`; the store already holds its result.
		}
	}

	async fn retry_unauthorized(
		&self,
		mut request: ApiRequest,
		dispatched: u64,
	) -> Result<ApiResponse> {
		let stored = self.store.load().await?;

		if !stored.is_some_and(|session| !session.refresh_token.is_empty()) {
			self.store.clear().await?;

			return Err(Error::LoginRequired { reason: "no refresh token is stored".into() });
		}

		let flight = self.coordinator.run(Some(dispatched), || self.refresh_stored()).await;
		let token = match flight.into_outcome() {
			Some(outcome) => outcome?,
			None => {
				let stored =
					self.store.load().await?.map(|session| session.access_token).ok_or_else(
						|| Error::LoginRequired {
							reason: "the session was cleared by a concurrent refresh".into(),
						},
					)?;

				// The newer cycle stored the token that was just rejected.
				if request.bearer.as_ref() != Some(&stored) {
					stored
				} else {
					match self.coordinator.run(None, || self.refresh_stored()).await.into_outcome() {
						Some(outcome) => outcome?,
						None => stored,
					}
				}
			},
		};

		request.bearer = Some(token);
		request.retried = true;

		#[cfg(feature = "tracing")]
		tracing::debug!(
			method = %request.method,
			path = request.url.path(),
			"Retrying request after refresh."
		);

		Ok(self.http_client.execute(&request).await?)
	}

	/// Body of a refresh cycle led by this console. The session is saved or cleared before the
	/// outcome is handed to waiters.
	pub(crate) async fn refresh_stored(&self) -> RefreshOutcome {
		match obs::observe(CallKind::Refresh, "refresh", self.exchange_refresh_token()).await {
			Ok(session) => Ok(session.access_token),
			Err(err) => {
				if let Err(_clear_err) = self.store.clear().await {
					#[cfg(feature = "tracing")]
					tracing::warn!(
						error = %_clear_err,
						"Failed to clear the session after a refresh failure."
					);
				}

				Err(RefreshError::from(&err))
			},
		}
	}

	async fn exchange_refresh_token(&self) -> Result<Session> {
		let refresh_token = self
			.store
			.load()
			.await?
			.map(|session| session.refresh_token)
			.filter(|token| !token.is_empty())
			.ok_or(RefreshError::MissingRefreshToken)?;
		let url = self.descriptor.auth.refresh.clone();
		let request = match &self.descriptor.refresh_transport {
			RefreshTransport::Body =>
				ApiRequest::post(url).json(&RefreshBody { refresh_token: &refresh_token })?,
			RefreshTransport::Header { name } =>
				ApiRequest::get(url).header(name.as_str(), refresh_token.expose()),
		};
		let response = self.http_client.execute(&request).await?;

		if !response.is_success() {
			return Err(reject(&response, SESSION_EXPIRED));
		}

		let pair: TokenPair = response.decode()?;
		let session = Session::from_pair(pair, OffsetDateTime::now_utc());

		self.store.save(session.clone()).await?;

		Ok(session)
	}
}

/// Classifies a non-2xx response.
pub(crate) fn reject(response: &ApiResponse, fallback: &str) -> Error {
	if response.status == 403 {
		#[cfg(feature = "tracing")]
		tracing::warn!(status = response.status, "Access denied.");
	}

	ResponseError::Status {
		status: response.status,
		message: response.message().unwrap_or_else(|| fallback.to_owned()),
		retry_after: response.retry_after,
	}
	.into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn reject_prefers_backend_message() {
		let response = ApiResponse::json(404, &serde_json::json!({ "message": "Zone not found" }));

		assert_eq!(reject(&response, "Failed to load zone.").to_string(), "Zone not found");

		let bare = ApiResponse { status: 500, retry_after: None, body: Vec::new() };
		let err = reject(&bare, "Failed to load zone.");

		assert_eq!(err.to_string(), "Failed to load zone.");
		assert_eq!(err.status(), Some(500));
	}

	#[test]
	fn refresh_body_uses_camel_case() {
		let token = TokenSecret::new("refresh-1");

		assert_eq!(
			serde_json::to_value(RefreshBody { refresh_token: &token })
				.expect("Refresh body should serialize."),
			serde_json::json!({ "refreshToken": "refresh-1" })
		);
	}
}
