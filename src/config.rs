//! Configuration for ie.
//!
//! - [load]: locating, parsing and generating `ie.toml` ([Config], [RawConfig]).
//! - [general]: prompt defaults and message timings.
//! - [display]: listing columns and popup borders.
//! - [theme]: colours of every row class and widget.
//! - [input]: key bindings, including two-key prefix sequences.

pub mod display;
pub mod general;
pub mod input;
pub mod load;
pub mod theme;

pub use display::{BorderShape, Display};
pub use general::{General, InternalGeneral};
pub use input::Keys;
pub use load::{Config, RawConfig};
pub use theme::{ColorPair, Theme, WidgetTheme};
