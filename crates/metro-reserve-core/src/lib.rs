//! # metro-reserve-core
//!
//! Core library for the metro-reserve CLI providing:
//! - Runtime configuration loading (embedded defaults, file, environment)
//! - Reservation request/response types and retry policies
//! - The `Transport` seam for a single reservation attempt
//! - The retry engine that drives attempts to success or exhaustion

pub mod config;
pub mod error;
pub mod retry;
pub mod transport;
pub mod types;
pub mod utils;

pub use config::ConfigLoader;
pub use error::{Error, Result};
pub use utils::get_home_dir;
