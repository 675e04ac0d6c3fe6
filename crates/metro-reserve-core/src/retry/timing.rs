//! Inter-attempt delay and the cancellable wait

use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Calculate the wait before the next attempt
///
/// The wait is the fixed `interval`. With `jitter`, up to 25% of the interval
/// is added at random so several clients started together drift apart.
///
/// # Example
///
/// ```rust
/// use metro_reserve_core::retry::calculate_delay;
/// use std::time::Duration;
///
/// let delay = calculate_delay(Duration::from_secs(1), false);
/// assert_eq!(delay, Duration::from_secs(1));
/// ```
pub fn calculate_delay(interval: Duration, jitter: bool) -> Duration {
    let base_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);

    if jitter && base_ms > 0 {
        let jitter_range = base_ms / 4;
        let jitter_value = rand::rng().random_range(0..=jitter_range);
        return interval + Duration::from_millis(jitter_value);
    }

    interval
}

/// Sleep for `delay` unless `cancel` fires first
///
/// Returns `true` when the full delay elapsed and `false` when cancelled.
pub async fn sleep_or_cancel(delay: Duration, cancel: &CancellationToken) -> bool {
    if delay.is_zero() {
        return !cancel.is_cancelled();
    }

    tokio::select! {
        biased;
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(delay) => true,
    }
}
