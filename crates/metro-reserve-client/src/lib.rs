//! HTTP transport for metro-reserve
//!
//! Implements [`metro_reserve_core::transport::Transport`] over `reqwest`:
//! one JSON POST per attempt with the browser-emulation headers the
//! reservation service expects, classified by [`classify_response`].

pub mod classify;
pub mod error;
pub mod http;

pub use classify::classify_response;
pub use error::{ClientError, Result};
pub use http::HttpTransport;
