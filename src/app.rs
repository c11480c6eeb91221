//! Application/session logic for ie.
//!
//! - [state]: the [Session] controller and [KeypressResult].
//! - [handlers]: per-mode key handling on [Session].
//! - [actions]: modal state and the prompt line editor ([ActionContext], [ActionMode]).
//! - [keymap]: key bindings and the two-key prefix recogniser.
//! - [buffer], [stack]: directory views and the ordered set of them.
//! - [selection], [viewport], [search]: cursor and marks, scrolling, regex search.

pub mod actions;
pub mod buffer;
pub mod handlers;
pub mod keymap;
pub mod search;
pub mod selection;
pub mod stack;
pub mod state;
pub mod viewport;

pub use actions::{ActionContext, ActionMode, InputMode};
pub use buffer::{Buffer, Reload};
pub use keymap::{Action, KeyPrefix, Keymap, PrefixCommand};
pub use search::Direction;
pub use stack::BufferStack;
pub use state::{KeypressResult, MessageKind, Session, StatusMessage};
