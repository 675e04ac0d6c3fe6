//! Type definitions for metro-reserve

mod credential;
mod duration;
mod policy;
mod reservation;
mod runtime_config;

pub use credential::Credential;
pub use duration::HumanDuration;
pub use policy::{RetryBound, RetryMode, RetryPolicy};
pub use reservation::{ReservationRequest, ReservationResponse};
pub use runtime_config::{NetworkConfig, ReservationDefaults, RetryConfig, RuntimeConfig};
