//! Retry policy for a reservation run
//!
//! A policy is either bounded by attempt count or by wall-clock duration.
//! Every field must be positive; the constructors reject anything else so an
//! invalid policy never reaches the engine.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which bound limits the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetryMode {
    /// Stop after a fixed number of attempts (default)
    #[default]
    BoundedCount,

    /// Keep trying until a wall-clock budget is spent
    BoundedDuration,
}

/// The stopping bound of a [`RetryPolicy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryBound {
    /// At most `max_attempts` transport calls
    BoundedCount { max_attempts: u32 },

    /// No new attempt once `budget` has elapsed since the run started
    BoundedDuration { budget: Duration },
}

impl RetryBound {
    pub fn mode(&self) -> RetryMode {
        match self {
            RetryBound::BoundedCount { .. } => RetryMode::BoundedCount,
            RetryBound::BoundedDuration { .. } => RetryMode::BoundedDuration,
        }
    }
}

impl fmt::Display for RetryBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryBound::BoundedCount { max_attempts } => {
                write!(f, "at most {} attempts", max_attempts)
            }
            RetryBound::BoundedDuration { budget } => {
                write!(f, "for up to {}", crate::utils::format_duration(*budget))
            }
        }
    }
}

/// Validated retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    bound: RetryBound,
    interval: Duration,
    timeout: Duration,
    jitter: bool,
}

impl RetryPolicy {
    /// Policy that stops after `max_attempts` attempts
    ///
    /// # Example
    ///
    /// ```rust
    /// use metro_reserve_core::types::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let (interval, timeout) = (Duration::from_secs(1), Duration::from_secs(10));
    /// let policy = RetryPolicy::bounded_count(15, interval, timeout).unwrap();
    /// assert!(RetryPolicy::bounded_count(0, interval, timeout).is_err());
    /// # let _ = policy;
    /// ```
    pub fn bounded_count(max_attempts: u32, interval: Duration, timeout: Duration) -> Result<Self> {
        Self::new(RetryBound::BoundedCount { max_attempts }, interval, timeout)
    }

    /// Policy that stops once `budget` has elapsed
    pub fn bounded_duration(
        budget: Duration,
        interval: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        Self::new(RetryBound::BoundedDuration { budget }, interval, timeout)
    }

    /// Build and validate a policy from its parts
    pub fn new(bound: RetryBound, interval: Duration, timeout: Duration) -> Result<Self> {
        let policy = Self {
            bound,
            interval,
            timeout,
            jitter: false,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Add up to 25% random variation to each inter-attempt wait
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Check every field is positive
    pub fn validate(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(Error::invalid_policy("interval must be positive"));
        }
        if self.timeout.is_zero() {
            return Err(Error::invalid_policy("timeout must be positive"));
        }
        match self.bound {
            RetryBound::BoundedCount { max_attempts: 0 } => {
                Err(Error::invalid_policy("max attempts must be positive"))
            }
            RetryBound::BoundedDuration { budget } if budget.is_zero() => {
                Err(Error::invalid_policy("duration budget must be positive"))
            }
            _ => Ok(()),
        }
    }

    pub fn bound(&self) -> RetryBound {
        self.bound
    }

    pub fn mode(&self) -> RetryMode {
        self.bound.mode()
    }

    /// Wait between unsuccessful attempts
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Upper bound on a single attempt
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn jitter(&self) -> bool {
        self.jitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn test_bounded_count_valid() {
        let policy = RetryPolicy::bounded_count(3, SEC, 10 * SEC).unwrap();
        assert_eq!(policy.bound(), RetryBound::BoundedCount { max_attempts: 3 });
        assert_eq!(policy.mode(), RetryMode::BoundedCount);
        assert_eq!(policy.interval(), SEC);
        assert_eq!(policy.timeout(), 10 * SEC);
        assert!(!policy.jitter());
    }

    #[test]
    fn test_bounded_duration_valid() {
        let policy = RetryPolicy::bounded_duration(120 * SEC, SEC, 10 * SEC)
            .unwrap()
            .with_jitter(true);
        assert_eq!(policy.mode(), RetryMode::BoundedDuration);
        assert!(policy.jitter());
    }

    #[test]
    fn test_zero_values_rejected() {
        assert!(RetryPolicy::bounded_count(0, SEC, SEC).is_err());
        assert!(RetryPolicy::bounded_count(1, Duration::ZERO, SEC).is_err());
        assert!(RetryPolicy::bounded_count(1, SEC, Duration::ZERO).is_err());
        assert!(RetryPolicy::bounded_duration(Duration::ZERO, SEC, SEC).is_err());
    }

    #[test]
    fn test_rejection_is_invalid_policy() {
        let err = RetryPolicy::bounded_count(0, SEC, SEC).unwrap_err();
        assert!(matches!(err, Error::InvalidPolicy { .. }));
        assert!(err.to_string().contains("max attempts"));
    }

    #[test]
    fn test_bound_display() {
        assert_eq!(
            RetryBound::BoundedCount { max_attempts: 15 }.to_string(),
            "at most 15 attempts"
        );
        assert_eq!(
            RetryBound::BoundedDuration {
                budget: 120 * SEC
            }
            .to_string(),
            "for up to 2m"
        );
    }

    #[test]
    fn test_mode_serde_is_kebab_case() {
        let yaml = serde_yaml_ng::to_string(&RetryMode::BoundedDuration).unwrap();
        assert_eq!(yaml.trim(), "bounded-duration");
    }
}
