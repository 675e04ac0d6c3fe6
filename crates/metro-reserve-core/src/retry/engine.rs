//! Retry engine
//!
//! Drives the attempt loop: check the bound, make one transport call, decide,
//! wait, repeat. At most one transport call is in flight at any time and
//! attempt N is fully classified before attempt N+1 starts.

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::transport::Transport;
use crate::types::{Credential, ReservationRequest, ReservationResponse, RetryPolicy};

use super::observer::{AttemptObserver, NoOpObserver};
use super::outcome::{AttemptOutcome, RunResult, StopReason};
use super::strategy::Strategy;
use super::timing::{calculate_delay, sleep_or_cancel};

/// Builder for a [`RetryEngine`]
///
/// # Example
///
/// ```rust,no_run
/// use metro_reserve_core::retry::{RetryEngine, TracingObserver};
/// use metro_reserve_core::transport::Transport;
/// use metro_reserve_core::types::RetryPolicy;
/// use std::time::Duration;
///
/// fn build<T: Transport>(transport: T) -> metro_reserve_core::Result<()> {
///     let policy =
///         RetryPolicy::bounded_count(15, Duration::from_secs(1), Duration::from_secs(10))?;
///     let _engine = RetryEngine::builder(transport, policy)
///         .with_observer(TracingObserver::new("沙河站"))
///         .build();
///     Ok(())
/// }
/// ```
pub struct RetryEngineBuilder<T, O = NoOpObserver> {
    transport: T,
    policy: RetryPolicy,
    observer: O,
}

impl<T, O> RetryEngineBuilder<T, O> {
    /// Set the observer
    pub fn with_observer<O2>(self, observer: O2) -> RetryEngineBuilder<T, O2> {
        RetryEngineBuilder {
            transport: self.transport,
            policy: self.policy,
            observer,
        }
    }

    /// Build the engine
    pub fn build(self) -> RetryEngine<T, O> {
        RetryEngine {
            transport: self.transport,
            policy: self.policy,
            observer: self.observer,
        }
    }
}

/// Runs reservation attempts under a [`RetryPolicy`]
pub struct RetryEngine<T, O = NoOpObserver> {
    transport: T,
    policy: RetryPolicy,
    observer: O,
}

/// What the loop does after one attempt
enum Step {
    Confirmed(ReservationResponse),
    Continue(AttemptOutcome),
    Cancelled(AttemptOutcome),
}

impl<T> RetryEngine<T, NoOpObserver> {
    /// Start building an engine; the policy is already validated
    pub fn builder(transport: T, policy: RetryPolicy) -> RetryEngineBuilder<T, NoOpObserver> {
        RetryEngineBuilder {
            transport,
            policy,
            observer: NoOpObserver,
        }
    }
}

impl<T, O> RetryEngine<T, O>
where
    T: Transport,
    O: AttemptObserver,
{
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run until success or exhaustion, with no external cancellation
    pub async fn run(&self, request: &ReservationRequest, credential: &Credential) -> RunResult {
        self.run_until_cancelled(request, credential, &CancellationToken::new())
            .await
    }

    /// Run until success, exhaustion, or `cancel` fires
    ///
    /// Cancellation is observed before each attempt and during each wait; an
    /// attempt already in flight finishes first, bounded by the policy timeout.
    pub async fn run_until_cancelled(
        &self,
        request: &ReservationRequest,
        credential: &Credential,
        cancel: &CancellationToken,
    ) -> RunResult {
        let strategy = Strategy::from(self.policy.bound());
        let start = Instant::now();
        let mut attempts: u32 = 0;
        let mut last_outcome: Option<AttemptOutcome> = None;

        loop {
            if cancel.is_cancelled() {
                return self.cancelled(attempts, last_outcome, start);
            }

            if let Some(reason) = strategy.stop_before_attempt(attempts, start.elapsed()) {
                self.observer
                    .on_exhausted(attempts, reason, last_outcome.as_ref());
                return RunResult::Exhausted {
                    last_outcome,
                    reason,
                    attempts,
                    elapsed: start.elapsed(),
                };
            }

            attempts += 1;
            match self
                .step(&strategy, attempts, request, credential, cancel)
                .await
            {
                Step::Confirmed(response) => {
                    let elapsed = start.elapsed();
                    self.observer.on_success(attempts, &response, elapsed);
                    return RunResult::Success {
                        response,
                        attempts,
                        elapsed,
                    };
                }
                Step::Continue(outcome) => last_outcome = Some(outcome),
                Step::Cancelled(outcome) => {
                    return self.cancelled(attempts, Some(outcome), start);
                }
            }
        }
    }

    /// One attempt, its verdict, and the wait that follows a miss
    async fn step(
        &self,
        strategy: &Strategy,
        attempt: u32,
        request: &ReservationRequest,
        credential: &Credential,
        cancel: &CancellationToken,
    ) -> Step {
        self.observer
            .on_attempt_start(attempt, strategy.max_attempts());

        let outcome = self
            .transport
            .attempt(request, credential, self.policy.timeout())
            .await;

        let outcome = match outcome.into_confirmed() {
            Ok(response) => return Step::Confirmed(response),
            Err(outcome) => outcome,
        };

        if !strategy.waits_after(attempt) {
            self.observer.on_attempt_failed(attempt, &outcome, None);
            return Step::Continue(outcome);
        }

        let delay = calculate_delay(self.policy.interval(), self.policy.jitter());
        self.observer
            .on_attempt_failed(attempt, &outcome, Some(delay));

        if sleep_or_cancel(delay, cancel).await {
            Step::Continue(outcome)
        } else {
            Step::Cancelled(outcome)
        }
    }

    fn cancelled(
        &self,
        attempts: u32,
        last_outcome: Option<AttemptOutcome>,
        start: Instant,
    ) -> RunResult {
        self.observer.on_cancelled(attempts);
        RunResult::Exhausted {
            last_outcome,
            reason: StopReason::Cancelled,
            attempts,
            elapsed: start.elapsed(),
        }
    }
}
