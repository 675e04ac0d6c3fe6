//! Attempt observation and logging
//!
//! The engine never prints. It reports each step to an [`AttemptObserver`];
//! [`TracingObserver`] turns those events into structured logs.

use super::outcome::{AttemptOutcome, StopReason};
use crate::types::ReservationResponse;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Observer trait for engine events
///
/// # Example
///
/// ```rust
/// use metro_reserve_core::retry::{AttemptObserver, AttemptOutcome, StopReason};
/// use metro_reserve_core::types::ReservationResponse;
/// use std::time::Duration;
///
/// struct Beeper;
///
/// impl AttemptObserver for Beeper {
///     fn on_attempt_start(&self, _attempt: u32, _max_attempts: Option<u32>) {}
///     fn on_attempt_failed(&self, _: u32, _: &AttemptOutcome, _: Option<Duration>) {}
///     fn on_success(&self, _attempt: u32, _response: &ReservationResponse, _elapsed: Duration) {
///         print!("\x07");
///     }
///     fn on_exhausted(&self, _: u32, _: StopReason, _: Option<&AttemptOutcome>) {}
/// }
/// ```
pub trait AttemptObserver: Send + Sync {
    /// Called before each transport call
    ///
    /// `max_attempts` is `None` for duration-bounded runs.
    fn on_attempt_start(&self, attempt: u32, max_attempts: Option<u32>);

    /// Called after an unsuccessful attempt
    ///
    /// `next_delay` is the wait before the next attempt, or `None` when the
    /// engine will not wait (final attempt of a bounded-count run).
    fn on_attempt_failed(
        &self,
        attempt: u32,
        outcome: &AttemptOutcome,
        next_delay: Option<Duration>,
    );

    /// Called when a slot was granted
    fn on_success(&self, attempt: u32, response: &ReservationResponse, elapsed: Duration);

    /// Called when the bound was reached without a grant
    fn on_exhausted(
        &self,
        attempts: u32,
        reason: StopReason,
        last_outcome: Option<&AttemptOutcome>,
    );

    /// Called when the run stops because of external cancellation
    fn on_cancelled(&self, attempts: u32) {
        let _ = attempts;
    }
}

/// An observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl AttemptObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: Option<u32>) {}

    fn on_attempt_failed(&self, _: u32, _: &AttemptOutcome, _: Option<Duration>) {}

    fn on_success(&self, _attempt: u32, _response: &ReservationResponse, _elapsed: Duration) {}

    fn on_exhausted(&self, _: u32, _: StopReason, _: Option<&AttemptOutcome>) {}
}

/// An observer that logs engine events using the `tracing` crate
///
/// # Log Levels
///
/// - `on_attempt_start`: DEBUG
/// - `on_attempt_failed`: WARN
/// - `on_success`: INFO
/// - `on_exhausted`: ERROR
/// - `on_cancelled`: WARN
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Label attached to every event, e.g. the station name
    operation: String,
}

impl TracingObserver {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("reservation")
    }
}

impl AttemptObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_attempts: Option<u32>) {
        match max_attempts {
            Some(max) => tracing::debug!(
                operation = %self.operation,
                attempt,
                max_attempts = max,
                "starting attempt"
            ),
            None => tracing::debug!(operation = %self.operation, attempt, "starting attempt"),
        }
    }

    fn on_attempt_failed(
        &self,
        attempt: u32,
        outcome: &AttemptOutcome,
        next_delay: Option<Duration>,
    ) {
        let status = outcome.status.map(u64::from);
        match next_delay {
            Some(delay) => tracing::warn!(
                operation = %self.operation,
                attempt,
                classification = %outcome.classification,
                status,
                delay_ms = delay.as_millis() as u64,
                "attempt failed, will retry: {}",
                outcome
            ),
            None => tracing::warn!(
                operation = %self.operation,
                attempt,
                classification = %outcome.classification,
                status,
                "final attempt failed: {}",
                outcome
            ),
        }
    }

    fn on_success(&self, attempt: u32, response: &ReservationResponse, elapsed: Duration) {
        tracing::info!(
            operation = %self.operation,
            attempt,
            appointment_id = %response.appointment_id,
            station_entrance = %response.station_entrance,
            elapsed_ms = elapsed.as_millis() as u64,
            "reservation confirmed"
        );
    }

    fn on_exhausted(
        &self,
        attempts: u32,
        reason: StopReason,
        last_outcome: Option<&AttemptOutcome>,
    ) {
        match last_outcome {
            Some(outcome) => tracing::error!(
                operation = %self.operation,
                attempts,
                reason = %reason,
                "giving up: {}",
                outcome
            ),
            None => tracing::error!(
                operation = %self.operation,
                attempts,
                reason = %reason,
                "giving up"
            ),
        }
    }

    fn on_cancelled(&self, attempts: u32) {
        tracing::warn!(operation = %self.operation, attempts, "run cancelled");
    }
}

/// An observer that counts events and records each wait
///
/// Useful for tests and for post-run summaries.
#[derive(Debug, Default)]
pub struct StatsObserver {
    attempt_starts: AtomicU32,
    failures: AtomicU32,
    successes: AtomicU32,
    exhaustions: AtomicU32,
    cancellations: AtomicU32,
    delays: Mutex<Vec<Duration>>,
}

impl StatsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn exhaustions(&self) -> u32 {
        self.exhaustions.load(Ordering::SeqCst)
    }

    pub fn cancellations(&self) -> u32 {
        self.cancellations.load(Ordering::SeqCst)
    }

    /// Waits the engine announced, in order
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Sum of announced waits
    pub fn total_delay(&self) -> Duration {
        self.delays().iter().sum()
    }
}

impl AttemptObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: Option<u32>) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_attempt_failed(
        &self,
        _attempt: u32,
        _outcome: &AttemptOutcome,
        next_delay: Option<Duration>,
    ) {
        self.failures.fetch_add(1, Ordering::SeqCst);
        if let (Some(delay), Ok(mut delays)) = (next_delay, self.delays.lock()) {
            delays.push(delay);
        }
    }

    fn on_success(&self, _attempt: u32, _response: &ReservationResponse, _elapsed: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(
        &self,
        _attempts: u32,
        _reason: StopReason,
        _last_outcome: Option<&AttemptOutcome>,
    ) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }

    fn on_cancelled(&self, _attempts: u32) {
        self.cancellations.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: AttemptObserver + ?Sized> AttemptObserver for std::sync::Arc<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: Option<u32>) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_attempt_failed(
        &self,
        attempt: u32,
        outcome: &AttemptOutcome,
        next_delay: Option<Duration>,
    ) {
        (**self).on_attempt_failed(attempt, outcome, next_delay)
    }

    fn on_success(&self, attempt: u32, response: &ReservationResponse, elapsed: Duration) {
        (**self).on_success(attempt, response, elapsed)
    }

    fn on_exhausted(
        &self,
        attempts: u32,
        reason: StopReason,
        last_outcome: Option<&AttemptOutcome>,
    ) {
        (**self).on_exhausted(attempts, reason, last_outcome)
    }

    fn on_cancelled(&self, attempts: u32) {
        (**self).on_cancelled(attempts)
    }
}

impl<T: AttemptObserver + ?Sized> AttemptObserver for Box<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: Option<u32>) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_attempt_failed(
        &self,
        attempt: u32,
        outcome: &AttemptOutcome,
        next_delay: Option<Duration>,
    ) {
        (**self).on_attempt_failed(attempt, outcome, next_delay)
    }

    fn on_success(&self, attempt: u32, response: &ReservationResponse, elapsed: Duration) {
        (**self).on_success(attempt, response, elapsed)
    }

    fn on_exhausted(
        &self,
        attempts: u32,
        reason: StopReason,
        last_outcome: Option<&AttemptOutcome>,
    ) {
        (**self).on_exhausted(attempts, reason, last_outcome)
    }

    fn on_cancelled(&self, attempts: u32) {
        (**self).on_cancelled(attempts)
    }
}
