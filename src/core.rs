//! Core runtime logic for ie.
//!
//! The non-UI engine pieces used by the session:
//! - [fm]: directory snapshots, entry metadata and ordering.
//! - [formatter]: mode strings, sizes, times and safe display of names.
//! - [fileops]: recursive delete and rename.
//! - [proc]: running a program in the foreground with the UI suspended.
//! - [terminal]: terminal setup/teardown and the crossterm/ratatui event loop.

pub mod fileops;
pub mod fm;
pub mod formatter;
pub mod proc;
pub mod terminal;

pub use fm::{Entry, EntryKind, EntryMeta, snapshot};
pub use formatter::{format_file_size, format_file_time, format_mode, sanitize_name};
pub use proc::ChildCommand;
