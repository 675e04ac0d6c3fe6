//! Mock server helpers for transport tests
//!
//! Sets up wiremock endpoints that answer like the reservation service.

use std::time::Duration;

use metro_reserve_core::types::{Credential, NetworkConfig, ReservationRequest};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const RESERVATION_PATH: &str = "/Appointment/CreateAppointment";
pub const TEST_TOKEN: &str = "test-token-123";

/// Network config pointing at the mock server
pub fn network_config(server: &MockServer) -> NetworkConfig {
    NetworkConfig {
        endpoint: format!("{}{}", server.uri(), RESERVATION_PATH),
        ..Default::default()
    }
}

pub fn test_request() -> ReservationRequest {
    ReservationRequest::new("昌平线", "沙河站", "20250102", "0820-0830", "0630-0930")
}

pub fn test_credential() -> Credential {
    Credential::new(TEST_TOKEN).unwrap()
}

/// Body of a granted reservation
pub fn granted_body() -> Value {
    json!({
        "balance": 2,
        "appointmentId": "A123",
        "stationEntrance": "Gate2"
    })
}

/// Body of a "no slots" reply
pub fn not_granted_body() -> Value {
    json!({
        "balance": 0,
        "appointmentId": "",
        "stationEntrance": "",
        "message": "暂无可预约名额"
    })
}

/// Answer every reservation POST with `template`
pub async fn mock_reply(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(RESERVATION_PATH))
        .respond_with(template)
        .mount(server)
        .await;
}

/// Answer with `body` as JSON
pub async fn mock_json_reply(server: &MockServer, status: u16, body: Value) {
    mock_reply(server, ResponseTemplate::new(status).set_body_json(body)).await;
}

/// Answer "no slots" `misses` times, then grant
pub async fn mock_granted_after(server: &MockServer, misses: u64) {
    Mock::given(method("POST"))
        .and(path(RESERVATION_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(not_granted_body()))
        .up_to_n_times(misses)
        .mount(server)
        .await;

    mock_json_reply(server, 200, granted_body()).await;
}

/// Answer only after `delay`
pub async fn mock_slow_reply(server: &MockServer, delay: Duration) {
    mock_reply(
        server,
        ResponseTemplate::new(200)
            .set_body_json(granted_body())
            .set_delay(delay),
    )
    .await;
}
