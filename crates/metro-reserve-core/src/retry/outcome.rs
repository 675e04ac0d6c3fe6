//! Attempt outcomes and run results
//!
//! A failed attempt is a value, not an error: the transport folds network,
//! protocol and parse problems into an [`AttemptOutcome`] and the engine keeps
//! the most recent one for reporting.

use crate::types::ReservationResponse;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Verdict assigned to one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    /// A slot was granted
    Success,

    /// Network error, non-2xx status, or a reply without a granted slot
    Failure,

    /// A reply arrived but its body did not have the expected shape
    Ambiguous,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Classification::Success => "success",
            Classification::Failure => "failure",
            Classification::Ambiguous => "ambiguous",
        };
        f.write_str(s)
    }
}

/// Result of one transport call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptOutcome {
    pub classification: Classification,

    /// HTTP status, absent when no response was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,

    /// Parsed body, when the body had the expected shape
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ReservationResponse>,

    /// Transport or parse error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Raw body text, kept for diagnostics when it is not a confirmation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_body: Option<String>,

    /// Wall time of the transport call
    #[serde(rename = "latency_ms", serialize_with = "serialize_millis")]
    pub latency: Duration,
}

fn serialize_millis<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
}

impl AttemptOutcome {
    /// A reply that granted a slot
    pub fn success(status: u16, response: ReservationResponse) -> Self {
        Self {
            classification: Classification::Success,
            status: Some(status),
            response: Some(response),
            error: None,
            raw_body: None,
            latency: Duration::ZERO,
        }
    }

    /// A 2xx reply that parsed but carried no appointment
    pub fn not_granted(
        status: u16,
        response: ReservationResponse,
        raw_body: impl Into<String>,
    ) -> Self {
        Self {
            classification: Classification::Failure,
            status: Some(status),
            response: Some(response),
            error: None,
            raw_body: Some(raw_body.into()),
            latency: Duration::ZERO,
        }
    }

    /// A non-2xx reply; `response` is set if the body still parsed
    pub fn http_status(
        status: u16,
        response: Option<ReservationResponse>,
        raw_body: impl Into<String>,
    ) -> Self {
        Self {
            classification: Classification::Failure,
            status: Some(status),
            response,
            error: Some(format!("non-success status code: {}", status)),
            raw_body: Some(raw_body.into()),
            latency: Duration::ZERO,
        }
    }

    /// A reply whose body could not be parsed
    pub fn ambiguous(
        status: u16,
        raw_body: impl Into<String>,
        parse_error: impl fmt::Display,
    ) -> Self {
        Self {
            classification: Classification::Ambiguous,
            status: Some(status),
            response: None,
            error: Some(format!("failed to parse response: {}", parse_error)),
            raw_body: Some(raw_body.into()),
            latency: Duration::ZERO,
        }
    }

    /// No usable reply: connect failure, timeout, body read error
    pub fn transport_error(error: impl fmt::Display) -> Self {
        Self {
            classification: Classification::Failure,
            status: None,
            response: None,
            error: Some(error.to_string()),
            raw_body: None,
            latency: Duration::ZERO,
        }
    }

    /// Record how long the call took
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn is_success(&self) -> bool {
        self.classification == Classification::Success
    }

    /// The confirmed reservation, or the outcome itself when it is not one
    pub fn into_confirmed(self) -> Result<ReservationResponse, Self> {
        match self {
            Self {
                classification: Classification::Success,
                response: Some(response),
                ..
            } => Ok(response),
            other => Err(other),
        }
    }
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.classification)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }
        if let Some(error) = &self.error {
            write!(f, ": {}", error)?;
        }
        match (&self.response, &self.raw_body) {
            (Some(response), _) if !response.message.is_empty() => {
                write!(f, " - {}", response.message)
            }
            (None, Some(raw)) if self.classification == Classification::Ambiguous => {
                write!(f, " - raw body: {}", raw)
            }
            _ => Ok(()),
        }
    }
}

/// Why a run ended without a confirmed reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    /// Bounded-count policy used every attempt
    MaxAttemptsReached,

    /// Bounded-duration policy ran past its budget
    BudgetExceeded,

    /// External cancellation (Ctrl-C, shutdown)
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::MaxAttemptsReached => "max attempts reached",
            StopReason::BudgetExceeded => "duration budget exceeded",
            StopReason::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Terminal value of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunResult {
    /// A slot was granted on attempt `attempts`
    Success {
        response: ReservationResponse,
        attempts: u32,
        elapsed: Duration,
    },

    /// The bound was hit, or the run was cancelled, without a grant
    Exhausted {
        /// Most recent attempt; `None` only if cancelled before the first one
        last_outcome: Option<AttemptOutcome>,
        reason: StopReason,
        attempts: u32,
        elapsed: Duration,
    },
}

impl RunResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RunResult::Success { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            RunResult::Success { attempts, .. } | RunResult::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            RunResult::Success { elapsed, .. } | RunResult::Exhausted { elapsed, .. } => *elapsed,
        }
    }

    /// The granted reservation, if any
    pub fn response(&self) -> Option<&ReservationResponse> {
        match self {
            RunResult::Success { response, .. } => Some(response),
            RunResult::Exhausted { .. } => None,
        }
    }

    /// The last attempt's outcome on exhaustion
    pub fn last_outcome(&self) -> Option<&AttemptOutcome> {
        match self {
            RunResult::Success { .. } => None,
            RunResult::Exhausted { last_outcome, .. } => last_outcome.as_ref(),
        }
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        match self {
            RunResult::Success { .. } => None,
            RunResult::Exhausted { reason, .. } => Some(*reason),
        }
    }
}
