//! Book command

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use camino::Utf8Path;
use metro_reserve_client::HttpTransport;
use metro_reserve_core::config::ConfigLoader;
use metro_reserve_core::retry::{
    AttemptOutcome, RetryEngine, RunResult, StopReason, TracingObserver,
};
use metro_reserve_core::types::{
    Credential, ReservationRequest, ReservationResponse, RetryMode, RetryPolicy, RuntimeConfig,
};
use metro_reserve_core::utils::format_duration;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::cli::BookArgs;
use crate::output;

/// Exit status when a strict run ends without a booking
const EXIT_NOT_BOOKED: u8 = 2;

pub async fn run(args: BookArgs, config_path: Option<&Utf8Path>) -> Result<ExitCode> {
    let loader = ConfigLoader::new()?;
    let mut config = loader
        .load_runtime_config(config_path)
        .context("Failed to load configuration")?;
    args.apply_overrides(&mut config);

    let credential = Credential::new(args.token.clone().unwrap_or_default())?;
    let today = chrono::Local::now().date_naive();
    let request = config
        .reservation_request(today, args.date.as_deref())
        .context("Invalid reservation date")?;
    let policy = config
        .retry_policy(args.mode(&config))
        .context("Invalid retry settings")?;

    let transport = HttpTransport::new(&config.network).context("Failed to create HTTP client")?;

    if !args.json {
        print_plan(&request, &policy, &config);
    }

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received, stopping after the current attempt");
            trigger.cancel();
        }
    });

    let engine = RetryEngine::builder(transport, policy)
        .with_observer(TracingObserver::new(request.station_name.clone()))
        .build();
    let result = engine.run_until_cancelled(&request, &credential, &cancel).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&BookReport::from(&result))?);
    } else {
        print_result(&result);
    }

    Ok(ExitCode::from(exit_status(&result, args.strict)))
}

impl BookArgs {
    /// Layer command-line flags over the resolved configuration
    pub fn apply_overrides(&self, config: &mut RuntimeConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.network.endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout {
            config.network.timeout = timeout;
        }
        if let Some(sleep) = self.sleep {
            config.retry.interval = sleep;
        }
        if let Some(max_retry) = self.max_retry {
            config.retry.max_attempts = max_retry;
        }
        if let Some(loop_duration) = self.loop_duration {
            config.retry.loop_duration = loop_duration;
        }
        if self.jitter {
            config.retry.jitter = true;
        }
        if let Some(line) = &self.line {
            config.reservation.line = line.clone();
        }
        if let Some(station) = &self.station {
            config.reservation.station = station.clone();
        }
        if let Some(time_slot) = &self.time_slot {
            config.reservation.time_slot = time_slot.clone();
        }
        if let Some(snapshot) = &self.snapshot_time_slot {
            config.reservation.snapshot_time_slot = snapshot.clone();
        }
        if let Some(offset) = self.date_offset {
            config.reservation.date_offset = offset;
        }
    }

    /// `--loop` forces bounded-duration; otherwise the configured mode applies
    pub fn mode(&self, config: &RuntimeConfig) -> RetryMode {
        if self.loop_mode {
            RetryMode::BoundedDuration
        } else {
            config.retry.mode
        }
    }
}

fn exit_status(result: &RunResult, strict: bool) -> u8 {
    if result.is_success() || !strict {
        0
    } else {
        EXIT_NOT_BOOKED
    }
}

fn print_plan(request: &ReservationRequest, policy: &RetryPolicy, config: &RuntimeConfig) {
    output::header("Reservation");
    output::kv("Line", &request.line_name);
    output::kv("Station", &request.station_name);
    output::kv("Date", &request.enter_date);
    output::kv("Time slot", &request.time_slot);
    output::kv(
        "Retry",
        &format!(
            "{}, every {}",
            policy.bound(),
            format_duration(policy.interval())
        ),
    );
    output::kv("Endpoint", &config.network.endpoint);
    println!();
}

fn print_result(result: &RunResult) {
    match result {
        RunResult::Success {
            response,
            attempts,
            elapsed,
        } => {
            output::success(&format!(
                "Reservation confirmed on attempt {} after {}",
                attempts,
                format_duration(*elapsed)
            ));
            output::kv("Appointment", &response.appointment_id);
            output::kv("Entrance", &response.station_entrance);
            output::kv("Balance", &response.balance.to_string());
        }
        RunResult::Exhausted {
            last_outcome,
            reason: StopReason::Cancelled,
            attempts,
            ..
        } => {
            output::warning(&format!("Cancelled after {} attempt(s)", attempts));
            if let Some(outcome) = last_outcome {
                output::kv("Last attempt", &outcome.to_string());
            }
        }
        RunResult::Exhausted {
            last_outcome,
            reason,
            attempts,
            elapsed,
        } => {
            output::error(&format!(
                "No slot booked: {} after {} attempt(s) in {}",
                reason,
                attempts,
                format_duration(*elapsed)
            ));
            if let Some(outcome) = last_outcome {
                output::kv("Last attempt", &outcome.to_string());
            }
        }
    }
}

/// Machine-readable summary printed with `--json`
#[derive(Debug, Serialize)]
struct BookReport<'a> {
    booked: bool,
    attempts: u32,
    elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response: Option<&'a ReservationResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_reason: Option<StopReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_outcome: Option<&'a AttemptOutcome>,
}

impl<'a> From<&'a RunResult> for BookReport<'a> {
    fn from(result: &'a RunResult) -> Self {
        Self {
            booked: result.is_success(),
            attempts: result.attempts(),
            elapsed_ms: millis(result.elapsed()),
            response: result.response(),
            stop_reason: result.stop_reason(),
            last_outcome: result.last_outcome(),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use metro_reserve_core::types::HumanDuration;

    fn exhausted(reason: StopReason) -> RunResult {
        RunResult::Exhausted {
            last_outcome: Some(AttemptOutcome::transport_error("connection refused")),
            reason,
            attempts: 3,
            elapsed: Duration::from_millis(2004),
        }
    }

    #[test]
    fn test_no_flags_keep_config() {
        let mut config = RuntimeConfig::default();
        BookArgs::default().apply_overrides(&mut config);
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let args = BookArgs {
            sleep: Some(HumanDuration::from_millis(250)),
            max_retry: Some(4),
            loop_duration: Some(HumanDuration::from_secs(30)),
            timeout: Some(HumanDuration::from_secs(3)),
            line: Some("13号线".to_string()),
            station: Some("回龙观站".to_string()),
            time_slot: Some("0730-0740".to_string()),
            snapshot_time_slot: Some("0700-0900".to_string()),
            date_offset: Some(2),
            endpoint: Some("http://localhost:9999/book".to_string()),
            jitter: true,
            ..Default::default()
        };
        let mut config = RuntimeConfig::default();
        args.apply_overrides(&mut config);

        assert_eq!(config.retry.interval.as_duration(), Duration::from_millis(250));
        assert_eq!(config.retry.max_attempts, 4);
        assert_eq!(config.retry.loop_duration.as_duration(), Duration::from_secs(30));
        assert_eq!(config.network.timeout.as_duration(), Duration::from_secs(3));
        assert_eq!(config.network.endpoint, "http://localhost:9999/book");
        assert!(config.retry.jitter);
        assert_eq!(config.reservation.line, "13号线");
        assert_eq!(config.reservation.station, "回龙观站");
        assert_eq!(config.reservation.time_slot, "0730-0740");
        assert_eq!(config.reservation.snapshot_time_slot, "0700-0900");
        assert_eq!(config.reservation.date_offset, 2);
    }

    #[test]
    fn test_loop_flag_selects_duration_mode() {
        let config = RuntimeConfig::default();
        let args = BookArgs {
            loop_mode: true,
            ..Default::default()
        };

        assert_eq!(args.mode(&config), RetryMode::BoundedDuration);
        assert_eq!(BookArgs::default().mode(&config), RetryMode::BoundedCount);
    }

    #[test]
    fn test_exit_codes() {
        let booked = RunResult::Success {
            response: ReservationResponse::default(),
            attempts: 1,
            elapsed: Duration::ZERO,
        };

        assert_eq!(exit_status(&booked, true), 0);
        assert_eq!(exit_status(&exhausted(StopReason::MaxAttemptsReached), false), 0);
        assert_eq!(exit_status(&exhausted(StopReason::BudgetExceeded), true), 2);
        assert_eq!(exit_status(&exhausted(StopReason::Cancelled), true), 2);
    }

    #[test]
    fn test_report_for_exhaustion() {
        let result = exhausted(StopReason::MaxAttemptsReached);
        let json = serde_json::to_value(BookReport::from(&result)).unwrap();

        assert_eq!(json["booked"], false);
        assert_eq!(json["attempts"], 3);
        assert_eq!(json["elapsed_ms"], 2004);
        assert_eq!(json["stop_reason"], "max-attempts-reached");
        assert_eq!(json["last_outcome"]["error"], "connection refused");
        assert!(json.get("response").is_none());
    }
}
