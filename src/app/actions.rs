//! Action context and input mode logic for ie.
//!
//! [ActionContext] tracks which modal state the session is in (a prompt, the delete
//! confirmation, the buffer chooser or the file viewer) and owns the line editor used
//! by the prompts.

/// Describes the current mode for action handling/input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionMode {
    Normal,
    /// A one-line prompt is open.
    Input { mode: InputMode, prompt: String },
    /// Yes/no confirmation for deleting `targets`.
    ConfirmDelete { targets: Vec<String> },
    /// The buffer chooser popup, with the highlighted row.
    ChooseBuffer { selected: usize },
    /// Read-only pager over a file's lines.
    Viewer {
        title: String,
        lines: Vec<String>,
        scroll: usize,
    },
}

/// What a submitted prompt line is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputMode {
    Rename,
    Search,
    Arguments,
}

impl InputMode {
    pub fn prompt(self) -> &'static str {
        match self {
            InputMode::Rename => "Rename: ",
            InputMode::Search => "Query: ",
            InputMode::Arguments => "Arguments: ",
        }
    }
}

/// Current modal state plus the prompt's line editor.
#[derive(Debug)]
pub struct ActionContext {
    mode: ActionMode,
    input_buffer: String,
    input_cursor_pos: usize,
}

impl ActionContext {
    // Getters / accessors

    pub fn mode(&self) -> &ActionMode {
        &self.mode
    }

    pub fn mode_mut(&mut self) -> &mut ActionMode {
        &mut self.mode
    }

    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    pub fn input_cursor_pos(&self) -> usize {
        self.input_cursor_pos
    }

    // Mode functions

    pub fn is_normal(&self) -> bool {
        matches!(self.mode, ActionMode::Normal)
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, ActionMode::Input { .. })
    }

    pub fn enter_mode(&mut self, mode: ActionMode) {
        self.mode = mode;
        self.input_buffer.clear();
        self.input_cursor_pos = 0;
    }

    pub fn enter_input(&mut self, mode: InputMode) {
        self.enter_mode(ActionMode::Input {
            mode,
            prompt: mode.prompt().to_string(),
        });
    }

    /// Returns to normal mode, handing back the edited line.
    pub fn exit_mode(&mut self) -> String {
        self.mode = ActionMode::Normal;
        self.input_cursor_pos = 0;
        std::mem::take(&mut self.input_buffer)
    }

    // Line editing

    pub fn action_move_cursor_left(&mut self) {
        if let Some((previous, _)) = self.input_buffer[..self.input_cursor_pos]
            .char_indices()
            .next_back()
        {
            self.input_cursor_pos = previous;
        }
    }

    pub fn action_move_cursor_right(&mut self) {
        if let Some(ch) = self.input_buffer[self.input_cursor_pos..].chars().next() {
            self.input_cursor_pos += ch.len_utf8();
        }
    }

    pub fn action_insert_at_cursor(&mut self, ch: char) {
        self.input_buffer.insert(self.input_cursor_pos, ch);
        self.input_cursor_pos += ch.len_utf8();
    }

    /// Deletes the character before the cursor.
    pub fn action_backspace_at_cursor(&mut self) {
        if let Some((previous, _)) = self.input_buffer[..self.input_cursor_pos]
            .char_indices()
            .next_back()
        {
            self.input_buffer.remove(previous);
            self.input_cursor_pos = previous;
        }
    }

    /// Deletes the character under the cursor.
    pub fn action_delete_at_cursor(&mut self) {
        if self.input_cursor_pos < self.input_buffer.len() {
            self.input_buffer.remove(self.input_cursor_pos);
        }
    }

    pub fn action_cursor_home(&mut self) {
        self.input_cursor_pos = 0;
    }

    pub fn action_cursor_end(&mut self) {
        self.input_cursor_pos = self.input_buffer.len();
    }

    /// Clears everything before the cursor, like readline's C-u.
    pub fn action_kill_to_start(&mut self) {
        self.input_buffer.drain(..self.input_cursor_pos);
        self.input_cursor_pos = 0;
    }
}

impl Default for ActionContext {
    fn default() -> Self {
        Self {
            mode: ActionMode::Normal,
            input_buffer: String::new(),
            input_cursor_pos: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> ActionContext {
        let mut ctx = ActionContext::default();
        ctx.enter_input(InputMode::Rename);
        text.chars().for_each(|c| ctx.action_insert_at_cursor(c));
        ctx
    }

    #[test]
    fn editing_handles_multibyte_chars() {
        let mut ctx = typed("añb");
        ctx.action_move_cursor_left();
        ctx.action_backspace_at_cursor();
        assert_eq!(ctx.input_buffer(), "ab");
        assert_eq!(ctx.input_cursor_pos(), 1);

        ctx.action_move_cursor_right();
        ctx.action_insert_at_cursor('é');
        assert_eq!(ctx.input_buffer(), "abé");
    }

    #[test]
    fn home_end_and_delete() {
        let mut ctx = typed("xyz");
        ctx.action_cursor_home();
        ctx.action_delete_at_cursor();
        assert_eq!(ctx.input_buffer(), "yz");
        ctx.action_cursor_end();
        ctx.action_delete_at_cursor();
        assert_eq!(ctx.input_buffer(), "yz");
    }

    #[test]
    fn kill_to_start() {
        let mut ctx = typed("hello world");
        ctx.action_move_cursor_left();
        ctx.action_kill_to_start();
        assert_eq!(ctx.input_buffer(), "d");
    }

    #[test]
    fn exit_returns_line_and_resets() {
        let mut ctx = typed("new.txt");
        assert!(ctx.is_input_mode());
        assert_eq!(ctx.exit_mode(), "new.txt");
        assert!(ctx.is_normal());
        assert_eq!(ctx.input_buffer(), "");
    }
}
