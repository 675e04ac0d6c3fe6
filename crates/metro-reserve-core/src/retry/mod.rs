//! Attempt orchestration for the reservation call
//!
//! One loop serves both retry modes. Each iteration checks the bound, makes a
//! single [`Transport`](crate::transport::Transport) call, classifies it, and
//! either returns or waits the configured interval.
//!
//! # Features
//!
//! - Bounded-count and bounded-duration strategies over a shared loop
//! - Cooperative cancellation through a `CancellationToken`
//! - Observable attempts via the `AttemptObserver` trait
//! - Optional jitter on the fixed interval
//!
//! # Example
//!
//! ```rust,no_run
//! use metro_reserve_core::retry::{RetryEngine, RunResult};
//! use metro_reserve_core::transport::Transport;
//! use metro_reserve_core::types::{Credential, ReservationRequest, RetryPolicy};
//! use std::time::Duration;
//!
//! async fn book<T: Transport>(
//!     transport: T,
//!     request: ReservationRequest,
//! ) -> metro_reserve_core::Result<()> {
//!     let policy = RetryPolicy::bounded_duration(
//!         Duration::from_secs(120),
//!         Duration::from_secs(1),
//!         Duration::from_secs(10),
//!     )?;
//!     let engine = RetryEngine::builder(transport, policy).build();
//!     let credential = Credential::new("token")?;
//!
//!     if let RunResult::Success { response, .. } = engine.run(&request, &credential).await {
//!         println!("booked: {}", response.appointment_id);
//!     }
//!     Ok(())
//! }
//! ```

mod engine;
mod observer;
mod outcome;
mod strategy;
mod timing;

pub use engine::{RetryEngine, RetryEngineBuilder};
pub use observer::{AttemptObserver, NoOpObserver, StatsObserver, TracingObserver};
pub use outcome::{AttemptOutcome, Classification, RunResult, StopReason};
pub use strategy::Strategy;
pub use timing::{calculate_delay, sleep_or_cancel};
