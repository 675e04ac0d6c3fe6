//! Runtime configuration types
//!
//! These types define the operational parameters of a run: where to send
//! requests, how long to wait, and what to reserve. They are resolved once at
//! startup and passed by reference afterwards.

use super::duration::HumanDuration;
use super::policy::{RetryBound, RetryMode, RetryPolicy};
use super::reservation::ReservationRequest;
use crate::error::Result;
use crate::utils::{enter_date_from_offset, parse_enter_date};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Complete runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuntimeConfig {
    /// Endpoint and HTTP settings
    #[serde(default)]
    pub network: NetworkConfig,

    /// Retry bounds and pacing
    #[serde(default)]
    pub retry: RetryConfig,

    /// What to reserve when the CLI does not say otherwise
    #[serde(default)]
    pub reservation: ReservationDefaults,
}

/// Endpoint and HTTP configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkConfig {
    /// Reservation endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Per-attempt timeout
    #[serde(default = "default_timeout")]
    pub timeout: HumanDuration,

    /// Optional User-Agent header; the service accepts requests without one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout: default_timeout(),
            user_agent: None,
        }
    }
}

fn default_endpoint() -> String {
    "https://webapi.mybti.cn/Appointment/CreateAppointment".to_string()
}
fn default_timeout() -> HumanDuration {
    HumanDuration::from_secs(10)
}

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Default mode when the CLI does not pick one
    #[serde(default)]
    pub mode: RetryMode,

    /// Wait between unsuccessful attempts
    #[serde(default = "default_interval")]
    pub interval: HumanDuration,

    /// Attempt limit in bounded-count mode
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wall-clock budget in bounded-duration mode
    #[serde(default = "default_loop_duration")]
    pub loop_duration: HumanDuration,

    /// Randomise waits by up to 25%
    #[serde(default)]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            mode: RetryMode::default(),
            interval: default_interval(),
            max_attempts: default_max_attempts(),
            loop_duration: default_loop_duration(),
            jitter: false,
        }
    }
}

fn default_interval() -> HumanDuration {
    HumanDuration::from_secs(1)
}
fn default_max_attempts() -> u32 {
    15
}
fn default_loop_duration() -> HumanDuration {
    HumanDuration::from_secs(120)
}

/// Reservation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReservationDefaults {
    /// Metro line name
    #[serde(default = "default_line")]
    pub line: String,

    /// Station name
    #[serde(default = "default_station")]
    pub station: String,

    /// Requested entry window
    #[serde(default = "default_time_slot")]
    pub time_slot: String,

    /// Reference window sent alongside the requested one
    #[serde(default = "default_snapshot_time_slot")]
    pub snapshot_time_slot: String,

    /// Snapshot week offset
    #[serde(default)]
    pub snapshot_week_offset: i32,

    /// Days from today; 1 books tomorrow
    #[serde(default = "default_date_offset")]
    pub date_offset: u32,
}

impl Default for ReservationDefaults {
    fn default() -> Self {
        Self {
            line: default_line(),
            station: default_station(),
            time_slot: default_time_slot(),
            snapshot_time_slot: default_snapshot_time_slot(),
            snapshot_week_offset: 0,
            date_offset: default_date_offset(),
        }
    }
}

fn default_line() -> String {
    "昌平线".to_string()
}
fn default_station() -> String {
    "沙河站".to_string()
}
fn default_time_slot() -> String {
    "0820-0830".to_string()
}
fn default_snapshot_time_slot() -> String {
    "0630-0930".to_string()
}
fn default_date_offset() -> u32 {
    1
}

impl RuntimeConfig {
    /// Build the validated retry policy for `mode`
    pub fn retry_policy(&self, mode: RetryMode) -> Result<RetryPolicy> {
        let bound = match mode {
            RetryMode::BoundedCount => RetryBound::BoundedCount {
                max_attempts: self.retry.max_attempts,
            },
            RetryMode::BoundedDuration => RetryBound::BoundedDuration {
                budget: self.retry.loop_duration.as_duration(),
            },
        };
        Ok(RetryPolicy::new(
            bound,
            self.retry.interval.as_duration(),
            self.network.timeout.as_duration(),
        )?
        .with_jitter(self.retry.jitter))
    }

    /// Build the reservation request
    ///
    /// `explicit_date` (`YYYYMMDD`) wins over the configured day offset.
    pub fn reservation_request(
        &self,
        today: NaiveDate,
        explicit_date: Option<&str>,
    ) -> Result<ReservationRequest> {
        let defaults = &self.reservation;
        let enter_date = match explicit_date {
            Some(date) => parse_enter_date(date)?,
            None => enter_date_from_offset(today, defaults.date_offset)?,
        };

        Ok(ReservationRequest::new(
            defaults.line.clone(),
            defaults.station.clone(),
            enter_date,
            defaults.time_slot.clone(),
            defaults.snapshot_time_slot.clone(),
        )
        .with_snapshot_week_offset(defaults.snapshot_week_offset))
    }
}
