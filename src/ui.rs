//! Terminal UI for ie.
//!
//! - [render]: the per-frame entry point and screen layout.
//! - [panes]: the long-listing rows.
//! - [widgets]: popups drawn over the listing.

pub mod panes;
pub mod render;
pub mod widgets;

pub use render::render;
