//! Transport trait: one reservation attempt

use crate::retry::AttemptOutcome;
use crate::types::{Credential, ReservationRequest};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Performs exactly one request/response cycle against the reservation service
///
/// Implementations must not fail: network, status and parse problems are
/// reported through the returned [`AttemptOutcome`]. They hold no per-run
/// state, so the same transport can serve any number of attempts.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` once, bounded by `timeout`, and classify the reply
    async fn attempt(
        &self,
        request: &ReservationRequest,
        credential: &Credential,
        timeout: Duration,
    ) -> AttemptOutcome;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn attempt(
        &self,
        request: &ReservationRequest,
        credential: &Credential,
        timeout: Duration,
    ) -> AttemptOutcome {
        (**self).attempt(request, credential, timeout).await
    }
}
