//! Common test infrastructure for metro-reserve-client tests
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::*;
//! ```

// Not every test file uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_server;

pub use mock_server::*;
