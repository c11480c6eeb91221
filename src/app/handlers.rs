//! Input action handler methods for ie.
//!
//! Implements the [Session] methods behind every mode: normal browsing with its prefix
//! sequences, the line prompts, the delete confirmation, the buffer chooser and the
//! file viewer.

use crate::app::actions::{ActionMode, InputMode};
use crate::app::buffer::Reload;
use crate::app::keymap::{Action, FileAction, NavAction, PrefixCommand, PrefixOutcome, SystemAction};
use crate::app::search::Direction;
use crate::app::state::{KeypressResult, Session};
use crate::core::fileops;
use crate::core::fm::{self, PARENT_REF};
use crate::core::proc::ChildCommand;

use crossterm::event::{KeyCode::*, KeyEvent, KeyModifiers};

use std::ffi::OsStr;

impl<'a> Session<'a> {
    // Normal mode

    pub(super) fn handle_normal_mode(&mut self, key: KeyEvent) -> KeypressResult {
        match self.prefix.feed(&key, &self.keymap) {
            PrefixOutcome::Pass => {}
            PrefixOutcome::Started | PrefixOutcome::Cancelled => return KeypressResult::Consumed,
            PrefixOutcome::Unknown => {
                let duration = self.config.general().unknown_sequence_duration();
                self.notify("Unknown Sequence", duration);
                return KeypressResult::Consumed;
            }
            PrefixOutcome::Command(cmd) => return self.handle_prefix_command(cmd),
        }

        match self.keymap.lookup(&key) {
            Some(Action::Nav(action)) => self.handle_nav_action(action),
            Some(Action::File(action)) => self.handle_file_action(action),
            Some(Action::System(SystemAction::Quit)) => KeypressResult::Quit,
            None => KeypressResult::Continue,
        }
    }

    fn handle_nav_action(&mut self, action: NavAction) -> KeypressResult {
        let buffer = self.buffer_mut();
        match action {
            NavAction::GoUp => buffer.move_up(),
            NavAction::GoDown => buffer.move_down(),
            NavAction::GoToTop => buffer.jump_first(),
            NavAction::GoToBottom => buffer.jump_last(),
            NavAction::ToggleMarker => {
                buffer.toggle_mark();
            }
            NavAction::Mark => buffer.mark_from_cursor(true),
            NavAction::Unmark => buffer.mark_from_cursor(false),
            NavAction::Search => self.actions.enter_input(InputMode::Search),
            NavAction::SearchNext => return self.repeat_search(Direction::Forward),
            NavAction::SearchPrev => return self.repeat_search(Direction::Backward),
        }
        KeypressResult::Consumed
    }

    fn handle_file_action(&mut self, action: FileAction) -> KeypressResult {
        match action {
            FileAction::Open => self.open_selected(),
            FileAction::Delete => self.prompt_delete(),
            FileAction::Rename => self.prompt_rename(),
        }
    }

    fn handle_prefix_command(&mut self, cmd: PrefixCommand) -> KeypressResult {
        match cmd {
            PrefixCommand::OpenParent => self.open_entry(OsStr::new(PARENT_REF), false),
            PrefixCommand::NewBuffer => {
                let path = self.buffer().path().to_path_buf();
                self.stack.push(path);
                KeypressResult::Consumed
            }
            PrefixCommand::ChooseBuffer => {
                let selected = self.stack.active_index();
                self.actions
                    .enter_mode(ActionMode::ChooseBuffer { selected });
                KeypressResult::Consumed
            }
            PrefixCommand::Rename => self.prompt_rename(),
        }
    }

    // Activation

    fn open_selected(&mut self) -> KeypressResult {
        let buffer = self.buffer();
        let Some(entry) = buffer.selected_entry() else {
            return KeypressResult::Continue;
        };
        let name = entry.name().to_os_string();
        let executable = if entry.is_symlink() {
            fm::is_executable_path(&buffer.path().join(&name))
        } else {
            entry.is_executable()
        };
        self.open_entry(&name, executable)
    }

    /// Enters a directory, prompts for arguments to an executable or views a file.
    fn open_entry(&mut self, name: &OsStr, executable: bool) -> KeypressResult {
        let target = self.buffer().path().join(name);

        if fm::is_directory(&target) {
            match fm::resolve_dir(&target) {
                Ok(dir) => self.buffer_mut().set_path(dir),
                Err(e) => self.report(e),
            }
        } else if executable {
            self.actions.enter_input(InputMode::Arguments);
        } else {
            match fm::read_lines(&target) {
                Ok(lines) => self.actions.enter_mode(ActionMode::Viewer {
                    title: name.to_string_lossy().into_owned(),
                    lines,
                    scroll: 0,
                }),
                Err(e) => self.report(e),
            }
        }
        KeypressResult::Consumed
    }

    // Prompts

    fn prompt_delete(&mut self) -> KeypressResult {
        let targets = self.buffer().action_targets();
        if targets.is_empty() {
            return KeypressResult::Continue;
        }
        self.actions
            .enter_mode(ActionMode::ConfirmDelete { targets });
        KeypressResult::Consumed
    }

    fn prompt_rename(&mut self) -> KeypressResult {
        match self.buffer().selected_entry() {
            Some(entry) if !entry.is_dot_ref() => {
                self.actions.enter_input(InputMode::Rename);
                KeypressResult::Consumed
            }
            _ => KeypressResult::Continue,
        }
    }

    fn repeat_search(&mut self, direction: Direction) -> KeypressResult {
        let buffer = self.buffer_mut();
        if buffer.last_query().is_none() {
            return KeypressResult::Continue;
        }
        if buffer.search(direction) {
            KeypressResult::Consumed
        } else {
            KeypressResult::Continue
        }
    }

    // Input mode

    pub(super) fn handle_input_mode(&mut self, key: KeyEvent) -> KeypressResult {
        let ActionMode::Input { mode, .. } = self.actions.mode() else {
            return KeypressResult::Continue;
        };
        let mode = *mode;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            Enter => {
                let line = self.actions.exit_mode();
                return self.submit_input(mode, line);
            }
            Esc => {
                self.actions.exit_mode();
            }
            Char('c' | 'g') if ctrl => {
                self.actions.exit_mode();
            }
            Char('u') if ctrl => self.actions.action_kill_to_start(),
            Char('a') if ctrl => self.actions.action_cursor_home(),
            Char('e') if ctrl => self.actions.action_cursor_end(),
            Char(_) if ctrl => {}
            Char(c) => self.actions.action_insert_at_cursor(c),
            Left => self.actions.action_move_cursor_left(),
            Right => self.actions.action_move_cursor_right(),
            Home => self.actions.action_cursor_home(),
            End => self.actions.action_cursor_end(),
            Backspace => self.actions.action_backspace_at_cursor(),
            Delete => self.actions.action_delete_at_cursor(),
            _ => {}
        }
        KeypressResult::Consumed
    }

    fn submit_input(&mut self, mode: InputMode, line: String) -> KeypressResult {
        match mode {
            InputMode::Rename => self.rename_selected(&line),
            InputMode::Search => {
                if line.is_empty() {
                    return KeypressResult::Consumed;
                }
                let buffer = self.buffer_mut();
                match buffer.set_query(&line) {
                    Ok(()) => {
                        buffer.search(Direction::Forward);
                    }
                    Err(e) => self.report(e),
                }
            }
            InputMode::Arguments => {
                let buffer = self.buffer();
                if let Some(entry) = buffer.selected_entry() {
                    let cmd = ChildCommand::new(buffer.path(), entry.name(), &line);
                    return KeypressResult::RunChild(cmd);
                }
            }
        }
        KeypressResult::Consumed
    }

    /// Renames the cursor entry to `new_name`. Empty input does nothing at all.
    fn rename_selected(&mut self, new_name: &str) {
        if new_name.is_empty() {
            return;
        }
        let buffer = self.buffer();
        let Some(entry) = buffer.selected_entry().filter(|e| !e.is_dot_ref()) else {
            return;
        };
        let old_name = entry.name_str().into_owned();
        let dir = buffer.path().to_path_buf();

        match fileops::rename_entry(&dir, &old_name, new_name) {
            Ok(_) => self.buffer_mut().request_reload(Reload::InPlace {
                focus: Some(new_name.into()),
            }),
            Err(e) => self.report(e),
        }
    }

    // Delete confirmation

    pub(super) fn handle_confirm_delete(&mut self, key: KeyEvent) -> KeypressResult {
        let answer = match key.code {
            Char('y' | 'Y') => true,
            Char('n' | 'N') | Esc => false,
            Enter => self.config.general().confirm_default(),
            _ => return KeypressResult::Consumed,
        };

        let ActionMode::ConfirmDelete { targets } = std::mem::replace(
            self.actions.mode_mut(),
            ActionMode::Normal,
        ) else {
            return KeypressResult::Continue;
        };

        if answer {
            self.delete_targets(&targets);
        }
        KeypressResult::Consumed
    }

    fn delete_targets(&mut self, targets: &[String]) {
        let dir = self.buffer().path().to_path_buf();
        let result = fileops::remove_all(&dir, targets);

        let buffer = self.buffer_mut();
        buffer.clear_marks();
        buffer.request_reload(Reload::InPlace { focus: None });

        match result {
            Ok(count) => {
                let duration = self.config.general().message_duration();
                let noun = if count == 1 { "entry" } else { "entries" };
                self.notify(format!("Deleted {count} {noun}"), duration);
            }
            Err(e) => self.report(e),
        }
    }

    // Buffer chooser

    pub(super) fn handle_chooser(&mut self, key: KeyEvent) -> KeypressResult {
        let count = self.stack.len();
        let ActionMode::ChooseBuffer { selected } = self.actions.mode_mut() else {
            return KeypressResult::Continue;
        };

        match key.code {
            Up | Char('k') => *selected = selected.saturating_sub(1),
            Down | Char('j') => *selected = (*selected + 1).min(count - 1),
            Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                if idx < count {
                    *selected = idx;
                }
            }
            Enter => {
                let idx = *selected;
                self.actions.exit_mode();
                self.stack.switch(idx);
            }
            Esc | Char('q') => {
                self.actions.exit_mode();
            }
            _ => {}
        }
        KeypressResult::Consumed
    }

    // Viewer

    pub(super) fn handle_viewer(&mut self, key: KeyEvent) -> KeypressResult {
        let page = self.buffer().viewport().visible_rows().saturating_sub(2).max(1);
        let ActionMode::Viewer { lines, scroll, .. } = self.actions.mode_mut() else {
            return KeypressResult::Continue;
        };
        let last = lines.len().saturating_sub(1);

        match key.code {
            Down | Char('j') | Enter => *scroll = (*scroll + 1).min(last),
            Up | Char('k') => *scroll = scroll.saturating_sub(1),
            PageDown | Char(' ') => *scroll = (*scroll + page).min(last),
            PageUp | Char('b') => *scroll = scroll.saturating_sub(page),
            Home | Char('g') => *scroll = 0,
            End | Char('G') => *scroll = last,
            Esc | Char('q') => {
                self.actions.exit_mode();
            }
            _ => {}
        }
        KeypressResult::Consumed
    }
}
