//! Session state and main controller module for ie.
//!
//! [Session] owns everything a running ie instance needs: the configuration and keymap,
//! the stack of buffers, the modal [ActionContext], the prefix-sequence recogniser and
//! the transient status line message. The terminal loop drives it one key at a time
//! through [Session::handle_keypress]; it can equally be driven headless in tests.

use crate::app::actions::{ActionContext, ActionMode};
use crate::app::buffer::{Buffer, Reload};
use crate::app::keymap::{KeyPrefix, Keymap};
use crate::app::stack::BufferStack;
use crate::app::viewport::DEFAULT_SCREEN_HEIGHT;
use crate::config::Config;
use crate::core::proc::ChildCommand;
use crate::error::{IeError, Result};

use crossterm::event::{KeyEvent, KeyEventKind};

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::{Duration, Instant};

/// Result of processing one keypress.
#[derive(Debug, PartialEq, Eq)]
pub enum KeypressResult {
    /// The key had no effect.
    Continue,
    /// The key was handled.
    Consumed,
    Quit,
    /// Suspend the UI and run this program in the foreground.
    RunChild(ChildCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// Transient message shown on the status line until `expires`.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    text: String,
    kind: MessageKind,
    expires: Instant,
}

impl StatusMessage {
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    #[inline]
    pub fn expires(&self) -> Instant {
        self.expires
    }
}

pub struct Session<'a> {
    pub(super) config: &'a Config,
    pub(super) keymap: Keymap,
    pub(super) stack: BufferStack,
    pub(super) actions: ActionContext,
    pub(super) prefix: KeyPrefix,
    pub(super) status: Option<StatusMessage>,
    pub(super) screen_height: u16,
}

impl<'a> Session<'a> {
    /// Starts a session with one buffer on `path`. The listing is read on the first
    /// [Session::synchronize].
    pub fn new(config: &'a Config, path: PathBuf) -> Self {
        Self {
            config,
            keymap: Keymap::from_config(config),
            stack: BufferStack::new(path),
            actions: ActionContext::default(),
            prefix: KeyPrefix::default(),
            status: None,
            screen_height: DEFAULT_SCREEN_HEIGHT,
        }
    }

    // Getters / accessors

    #[inline]
    pub fn config(&self) -> &Config {
        self.config
    }

    #[inline]
    pub fn stack(&self) -> &BufferStack {
        &self.stack
    }

    #[inline]
    pub fn buffer(&self) -> &Buffer {
        self.stack.active()
    }

    #[inline]
    pub(crate) fn buffer_mut(&mut self) -> &mut Buffer {
        self.stack.active_mut()
    }

    #[inline]
    pub fn actions(&self) -> &ActionContext {
        &self.actions
    }

    #[inline]
    pub fn mode(&self) -> &ActionMode {
        self.actions.mode()
    }

    #[inline]
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    #[inline]
    pub fn prefix_pending(&self) -> bool {
        self.prefix.is_pending()
    }

    // Frame lifecycle

    /// Consumes the active buffer's pending reload. Returns whether anything changed.
    ///
    /// A failed reload is reported on the status line; the buffer keeps its last listing.
    pub fn synchronize(&mut self) -> bool {
        let height = self.screen_height;
        let buffer = self.stack.active_mut();
        buffer.set_screen_height(height);
        match buffer.synchronize() {
            Ok(changed) => changed,
            Err(e) => {
                self.report(e);
                true
            }
        }
    }

    /// Drops the status message once it has expired. Returns whether a redraw is needed.
    pub fn tick(&mut self) -> bool {
        if self
            .status
            .as_ref()
            .is_some_and(|m| Instant::now() >= m.expires)
        {
            self.status = None;
            return true;
        }
        false
    }

    /// When the loop has to wake up without input, if ever.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.status.as_ref().map(StatusMessage::expires)
    }

    /// Records the terminal height; the listing viewport is everything but two rows.
    pub fn set_screen_height(&mut self, height: u16) {
        self.screen_height = height;
        self.stack.active_mut().set_screen_height(height);
    }

    // Messages

    pub fn notify(&mut self, text: impl Into<String>, duration: Duration) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind: MessageKind::Info,
            expires: Instant::now() + duration,
        });
    }

    /// Shows a recoverable error on the status line.
    pub fn report(&mut self, err: IeError) {
        tracing::warn!(error = %err, "operation failed");
        self.status = Some(StatusMessage {
            text: err.to_string(),
            kind: MessageKind::Error,
            expires: Instant::now() + self.config.general().message_duration(),
        });
    }

    // Input

    /// Routes one key to the handler of the current mode.
    pub fn handle_keypress(&mut self, key: KeyEvent) -> KeypressResult {
        if key.kind != KeyEventKind::Press {
            return KeypressResult::Continue;
        }

        match self.actions.mode() {
            ActionMode::Normal => self.handle_normal_mode(key),
            ActionMode::Input { .. } => self.handle_input_mode(key),
            ActionMode::ConfirmDelete { .. } => self.handle_confirm_delete(key),
            ActionMode::ChooseBuffer { .. } => self.handle_chooser(key),
            ActionMode::Viewer { .. } => self.handle_viewer(key),
        }
    }

    /// Reports how a child run through [KeypressResult::RunChild] ended and re-reads the
    /// directory, which the program may have changed.
    pub fn child_finished(&mut self, result: Result<ExitStatus>) {
        match result {
            Ok(status) if status.success() => {}
            Ok(status) => {
                let duration = self.config.general().message_duration();
                self.notify(format!("Program exited with {status}"), duration);
            }
            Err(e) => self.report(e),
        }
        self.buffer_mut()
            .request_reload(Reload::InPlace { focus: None });
    }
}
