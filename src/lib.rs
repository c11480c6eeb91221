//! Internal library crate for ie.
//!
//! The shipped application is the `ie` binary (`src/main.rs`).
//!
//! This library exists to share code between the binary and the integration tests. It is
//! not considered a library for external use.

pub mod app;
pub mod config;
pub mod core;
pub mod error;
pub mod ui;
pub mod utils;

pub use error::{IeError, Result};
