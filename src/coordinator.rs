//! Single-flight coordination of access token refreshes.
//!
//! [`RefreshCoordinator`] guarantees that at most one refresh call is in flight at any time. The
//! first caller that needs a refresh becomes the leader and runs the refresh future; callers that
//! arrive while it runs are queued as waiters and released in arrival order with a clone of the
//! leader's outcome, so they never issue a refresh of their own.
//!
//! The check-and-set of the `refreshing` flag happens inside one critical section of a
//! `parking_lot` mutex that is never held across an `.await`. A generation counter is bumped every
//! time a cycle completes; callers pass the generation they observed before reading the session so
//! a caller that raced with a just-finished refresh reuses its result instead of starting another.
//! If the leader's future is dropped mid-refresh, a drop guard releases every waiter with
//! [`RefreshError::Cancelled`] and reopens the coordinator.

mod metrics;

pub use metrics::RefreshMetrics;

// std
use std::mem;
// crates.io
use futures::channel::oneshot;
// self
use crate::{_prelude::*, auth::TokenSecret, error::RefreshError};

/// Result every participant of a refresh cycle observes.
pub type RefreshOutcome = Result<TokenSecret, RefreshError>;

/// How a caller took part in a refresh cycle.
#[derive(Debug)]
pub enum Flight {
	/// The caller ran the refresh itself.
	Led(RefreshOutcome),
	/// The caller waited on another caller's refresh.
	Joined(RefreshOutcome),
	/// A refresh completed after the caller observed its generation; re-read the session instead.
	Superseded,
}
impl Flight {
	/// Returns the shared outcome, or `None` for [`Flight::Superseded`].
	pub fn into_outcome(self) -> Option<RefreshOutcome> {
		match self {
			Self::Led(outcome) | Self::Joined(outcome) => Some(outcome),
			Self::Superseded => None,
		}
	}
}

#[derive(Debug, Default)]
struct CoordinatorState {
	refreshing: bool,
	generation: u64,
	waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

enum Role {
	Lead,
	Wait(oneshot::Receiver<RefreshOutcome>),
	Superseded,
}

/// Process-wide single-flight guard for token refreshes.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
	state: Mutex<CoordinatorState>,
	metrics: RefreshMetrics,
}
impl RefreshCoordinator {
	/// Number of completed refresh cycles.
	pub fn generation(&self) -> u64 {
		self.state.lock().generation
	}

	/// Returns `true` while a refresh is in flight.
	pub fn is_refreshing(&self) -> bool {
		self.state.lock().refreshing
	}

	/// Number of callers currently queued behind the in-flight refresh.
	pub fn waiting(&self) -> usize {
		self.state.lock().waiters.len()
	}

	/// Refresh counters.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.metrics
	}

	/// Runs `refresh` unless another refresh is already in flight, in which case the caller waits
	/// for that refresh's outcome.
	///
	/// `observed` is the generation the caller read before deciding a refresh was needed. When it
	/// no longer matches and nothing is in flight, the caller gets [`Flight::Superseded`]. Pass
	/// `None` to force a refresh regardless of completed cycles.
	///
	/// `refresh` must persist (or clear) the session before resolving: waiters are released only
	/// after it returns.
	pub async fn run<F, Fut>(&self, observed: Option<u64>, refresh: F) -> Flight
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = RefreshOutcome>,
	{
		let role = {
			let mut state = self.state.lock();

			if state.refreshing {
				let (tx, rx) = oneshot::channel();

				state.waiters.push_back(tx);

				Role::Wait(rx)
			} else if observed.is_some_and(|generation| generation != state.generation) {
				Role::Superseded
			} else {
				state.refreshing = true;

				Role::Lead
			}
		};

		match role {
			Role::Wait(rx) => {
				self.metrics.record_join();

				#[cfg(feature = "tracing")]
				tracing::debug!("Joined in-flight token refresh.");

				Flight::Joined(rx.await.unwrap_or(Err(RefreshError::Cancelled)))
			},
			Role::Superseded => {
				self.metrics.record_superseded();

				Flight::Superseded
			},
			Role::Lead => {
				self.metrics.record_attempt();

				#[cfg(feature = "tracing")]
				tracing::debug!("Starting token refresh.");

				let lease = FlightLease { coordinator: self, settled: false };
				let outcome = refresh().await;

				lease.settle(&outcome);

				Flight::Led(outcome)
			},
		}
	}

	fn release(&self, outcome: &RefreshOutcome) {
		let waiters = {
			let mut state = self.state.lock();

			state.refreshing = false;
			state.generation = state.generation.wrapping_add(1);

			mem::take(&mut state.waiters)
		};

		match outcome {
			Ok(_) => self.metrics.record_success(),
			Err(_err) => {
				self.metrics.record_failure();

				#[cfg(feature = "tracing")]
				tracing::warn!(error = %_err, waiters = waiters.len(), "Token refresh failed.");
			},
		}

		for waiter in waiters {
			// Receivers of abandoned callers are gone; skip them.
			let _ = waiter.send(outcome.clone());
		}
	}
}

/// Releases the coordinator even when the leading future is dropped before settling.
struct FlightLease<'a> {
	coordinator: &'a RefreshCoordinator,
	settled: bool,
}
impl FlightLease<'_> {
	fn settle(mut self, outcome: &RefreshOutcome) {
		self.settled = true;
		self.coordinator.release(outcome);
	}
}
impl Drop for FlightLease<'_> {
	fn drop(&mut self) {
		if !self.settled {
			self.coordinator.release(&Err(RefreshError::Cancelled));
		}
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// crates.io
	use futures::future;
	// self
	use super::*;

	fn token(value: &str) -> RefreshOutcome {
		Ok(TokenSecret::new(value))
	}

	#[tokio::test]
	async fn concurrent_callers_share_one_refresh() {
		let coordinator = RefreshCoordinator::default();
		let calls = AtomicUsize::new(0);
		let calls = &calls;
		let refresh = move || async move {
			calls.fetch_add(1, Ordering::SeqCst);
			tokio::task::yield_now().await;

			token("fresh")
		};
		let flights = future::join_all((0..5).map(|_| coordinator.run(Some(0), refresh))).await;

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(flights.iter().filter(|flight| matches!(flight, Flight::Led(_))).count(), 1);
		assert_eq!(flights.iter().filter(|flight| matches!(flight, Flight::Joined(_))).count(), 4);

		for flight in flights {
			let outcome = flight.into_outcome().expect("Every caller should observe the outcome.");

			assert_eq!(outcome.expect("Refresh should succeed.").expose(), "fresh");
		}

		assert_eq!(coordinator.generation(), 1);
		assert_eq!(coordinator.metrics().attempts(), 1);
		assert_eq!(coordinator.metrics().joined(), 4);
		assert!(!coordinator.is_refreshing());
	}

	#[tokio::test]
	async fn waiters_receive_the_leaders_failure() {
		let coordinator = RefreshCoordinator::default();
		let failure = RefreshError::Rejected { status: 401, message: "expired".into() };
		let shared = &failure;
		let refresh = move || async move {
			tokio::task::yield_now().await;

			Err(shared.clone())
		};
		let flights = future::join_all((0..3).map(|_| coordinator.run(None, refresh))).await;

		for flight in flights {
			let outcome = flight.into_outcome().expect("Every caller should observe the outcome.");

			assert_eq!(outcome.expect_err("Refresh should fail."), failure);
		}

		assert_eq!(coordinator.metrics().failures(), 1);
	}

	#[tokio::test]
	async fn stale_generation_is_superseded() {
		let coordinator = RefreshCoordinator::default();
		let first = coordinator.run(Some(0), || async { token("first") }).await;

		assert!(matches!(first, Flight::Led(Ok(_))));

		let late = coordinator
			.run(Some(0), || async { panic!("A superseded caller must not refresh.") })
			.await;

		assert!(matches!(late, Flight::Superseded));
		assert_eq!(coordinator.metrics().superseded(), 1);

		let forced = coordinator.run(None, || async { token("second") }).await;

		assert!(matches!(forced, Flight::Led(Ok(_))));
		assert_eq!(coordinator.generation(), 2);
	}

	#[tokio::test]
	async fn waiters_are_queued_and_released_in_arrival_order() {
		let coordinator = RefreshCoordinator::default();
		let (gate_tx, gate_rx) = oneshot::channel::<RefreshOutcome>();
		let mut leader = Box::pin(coordinator.run(None, move || async move {
			gate_rx.await.unwrap_or(Err(RefreshError::Cancelled))
		}));

		assert!(futures::poll!(leader.as_mut()).is_pending());

		let mut waiters = (0..3)
			.map(|_| {
				Box::pin(coordinator.run(None, || async {
					panic!("A waiter must not start its own refresh.")
				}))
			})
			.collect::<Vec<_>>();

		for waiter in &mut waiters {
			assert!(futures::poll!(waiter.as_mut()).is_pending());
		}

		assert_eq!(coordinator.waiting(), 3);

		// Abandoning the second caller closes exactly the second slot of the queue.
		drop(waiters.remove(1));

		let closed = coordinator
			.state
			.lock()
			.waiters
			.iter()
			.map(oneshot::Sender::is_canceled)
			.collect::<Vec<_>>();

		assert_eq!(closed, vec![false, true, false]);

		gate_tx.send(token("ordered")).expect("Leader should still be waiting on the gate.");

		assert!(matches!(leader.await, Flight::Led(Ok(_))));
		assert_eq!(coordinator.waiting(), 0);

		for waiter in waiters {
			let outcome = waiter.await.into_outcome().expect("Waiters should observe the outcome.");

			assert_eq!(outcome.expect("Refresh should succeed.").expose(), "ordered");
		}

		assert_eq!(coordinator.metrics().joined(), 3);
	}

	#[tokio::test]
	async fn dropped_leader_releases_waiters_with_cancellation() {
		let coordinator = RefreshCoordinator::default();
		let mut leader = Box::pin(coordinator.run(None, future::pending::<RefreshOutcome>));

		assert!(futures::poll!(leader.as_mut()).is_pending());
		assert!(coordinator.is_refreshing());

		let mut waiter = Box::pin(
			coordinator.run(None, || async { panic!("A waiter must not start its own refresh.") }),
		);

		assert!(futures::poll!(waiter.as_mut()).is_pending());
		assert_eq!(coordinator.waiting(), 1);

		drop(leader);

		assert!(!coordinator.is_refreshing());
		assert!(matches!(waiter.await, Flight::Joined(Err(RefreshError::Cancelled))));

		let next = coordinator.run(None, || async { token("after-cancel") }).await;

		assert!(matches!(next, Flight::Led(Ok(_))));
	}
}
