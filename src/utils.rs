//! Miscellaneous utilities for ie.
//!
//! - [cli]: command-line parsing, help and `--init`.
//! - [helpers]: color parsing and home-relative path display.
//! - [logging]: the opt-in `tracing` file log.

pub mod cli;
pub mod helpers;
pub mod logging;

pub use helpers::{parse_color, shorten_home_path};
pub use logging::init_logging;
