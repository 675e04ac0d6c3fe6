//! Reservation request and response bodies

use serde::{Deserialize, Serialize};

/// Body of a `CreateAppointment` call
///
/// Built once per run and resent unchanged on every attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    /// Metro line, e.g. "昌平线"
    pub line_name: String,

    /// Week offset of the snapshot window, always 0 for the current week
    pub snapshot_week_offset: i32,

    /// Station to enter at
    pub station_name: String,

    /// Calendar date of entry, `YYYYMMDD`
    pub enter_date: String,

    /// Wider reference window used by the service to disambiguate slots
    pub snapshot_time_slot: String,

    /// Requested entry window, e.g. "0820-0830"
    pub time_slot: String,
}

impl ReservationRequest {
    /// Create a request for the current snapshot week
    pub fn new(
        line_name: impl Into<String>,
        station_name: impl Into<String>,
        enter_date: impl Into<String>,
        time_slot: impl Into<String>,
        snapshot_time_slot: impl Into<String>,
    ) -> Self {
        Self {
            line_name: line_name.into(),
            snapshot_week_offset: 0,
            station_name: station_name.into(),
            enter_date: enter_date.into(),
            snapshot_time_slot: snapshot_time_slot.into(),
            time_slot: time_slot.into(),
        }
    }

    /// Override the snapshot week offset
    pub fn with_snapshot_week_offset(mut self, offset: i32) -> Self {
        self.snapshot_week_offset = offset;
        self
    }
}

/// Body returned by the reservation endpoint
///
/// Every field defaults when absent; the service omits fields freely on
/// "not available" replies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReservationResponse {
    /// Remaining booking balance
    pub balance: i64,

    /// Appointment identifier, empty unless a slot was granted
    pub appointment_id: String,

    /// Granted entrance, e.g. "A2口"
    pub station_entrance: String,

    /// Free-form service message
    pub message: String,
}

impl ReservationResponse {
    /// A slot was granted: both identifiers are present
    pub fn is_confirmed(&self) -> bool {
        !self.appointment_id.is_empty() && !self.station_entrance.is_empty()
    }
}
