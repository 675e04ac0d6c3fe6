//! Stop conditions for the attempt loop
//!
//! Both strategies share one loop in the engine. A strategy only answers two
//! questions: may another attempt start, and should the engine wait after an
//! unsuccessful attempt.

use super::outcome::StopReason;
use crate::types::RetryBound;
use std::time::Duration;

/// Loop strategy derived from a policy bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Stop once `max_attempts` calls have been made
    BoundedCount { max_attempts: u32 },

    /// Stop once more than `budget` has elapsed
    BoundedDuration { budget: Duration },
}

impl From<RetryBound> for Strategy {
    fn from(bound: RetryBound) -> Self {
        match bound {
            RetryBound::BoundedCount { max_attempts } => Strategy::BoundedCount { max_attempts },
            RetryBound::BoundedDuration { budget } => Strategy::BoundedDuration { budget },
        }
    }
}

impl Strategy {
    /// Checked before every attempt
    ///
    /// `attempts_made` counts completed attempts; `elapsed` runs from loop entry.
    pub fn stop_before_attempt(&self, attempts_made: u32, elapsed: Duration) -> Option<StopReason> {
        match *self {
            Strategy::BoundedCount { max_attempts } if attempts_made >= max_attempts => {
                Some(StopReason::MaxAttemptsReached)
            }
            Strategy::BoundedDuration { budget } if elapsed > budget => {
                Some(StopReason::BudgetExceeded)
            }
            _ => None,
        }
    }

    /// Whether to sleep after unsuccessful attempt number `attempt` (1-indexed)
    ///
    /// Bounded-count skips the wait after its final attempt. Bounded-duration
    /// cannot know which attempt is final, so it always waits.
    pub fn waits_after(&self, attempt: u32) -> bool {
        match *self {
            Strategy::BoundedCount { max_attempts } => attempt < max_attempts,
            Strategy::BoundedDuration { .. } => true,
        }
    }

    /// Attempt limit, when the strategy has one
    pub fn max_attempts(&self) -> Option<u32> {
        match *self {
            Strategy::BoundedCount { max_attempts } => Some(max_attempts),
            Strategy::BoundedDuration { .. } => None,
        }
    }
}
