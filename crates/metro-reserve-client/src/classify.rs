//! Response classification
//!
//! Pure mapping from `(status, body)` to an [`AttemptOutcome`], kept apart from
//! the network code so every branch is testable without a server.

use metro_reserve_core::retry::AttemptOutcome;
use metro_reserve_core::types::ReservationResponse;

/// Classify one HTTP reply
///
/// The status is checked first: any non-2xx reply is a failure, carrying the
/// parsed payload if the body happens to parse. A 2xx body that does not
/// parse is ambiguous. A parsed 2xx body succeeds only when it names both an
/// appointment and an entrance.
///
/// # Example
///
/// ```rust
/// use metro_reserve_client::classify_response;
///
/// let outcome = classify_response(200, r#"{"appointmentId":"A1","stationEntrance":"B口"}"#);
/// assert!(outcome.is_success());
/// ```
pub fn classify_response(status: u16, body: &str) -> AttemptOutcome {
    let parsed = serde_json::from_str::<ReservationResponse>(body);

    if !(200..300).contains(&status) {
        return AttemptOutcome::http_status(status, parsed.ok(), body);
    }

    match parsed {
        Err(e) => AttemptOutcome::ambiguous(status, body, e),
        Ok(response) if response.is_confirmed() => AttemptOutcome::success(status, response),
        Ok(response) => AttemptOutcome::not_granted(status, response, body),
    }
}
