//! Child process execution for ie.
//!
//! Activating an executable entry suspends the UI, runs the program in the foreground
//! with the buffer directory as working directory and waits for one keypress before
//! handing the terminal back to the listing.

use crate::error::{IeError, Result};

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use std::ffi::{OsStr, OsString};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// A program to run on behalf of the user: argv is `[name, args...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildCommand {
    program: PathBuf,
    name: OsString,
    args: Vec<String>,
    cwd: PathBuf,
}

impl ChildCommand {
    /// Builds the command for entry `name` in `dir`, splitting `arg_line` on whitespace.
    pub fn new(dir: &Path, name: &OsStr, arg_line: &str) -> Self {
        Self {
            program: dir.join(name),
            name: name.to_os_string(),
            args: arg_line.split_whitespace().map(str::to_owned).collect(),
            cwd: dir.to_path_buf(),
        }
    }

    #[inline]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[inline]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[inline]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.cwd);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(&self.name);
        }
        cmd
    }

    /// Runs the command to completion with inherited stdio.
    pub fn run(&self) -> Result<ExitStatus> {
        self.command().status().map_err(|source| IeError::Spawn {
            program: self.program.clone(),
            source,
        })
    }
}

/// Leaves raw mode and the alternate screen, runs `cmd`, waits for a keypress and restores.
///
/// The terminal is restored even when the program fails to spawn; the spawn error is
/// returned afterwards.
pub fn run_suspended(cmd: &ChildCommand) -> Result<ExitStatus> {
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, Show)?;

    tracing::info!(program = %cmd.program().display(), args = ?cmd.args(), "running child");
    let status = cmd.run();
    match &status {
        Ok(s) => tracing::info!(status = %s, "child exited"),
        Err(e) => tracing::warn!(error = %e, "child failed"),
    }

    if let Err(e) = &status {
        writeln!(stdout, "\n{e}")?;
    }
    write!(stdout, "\nPress any key to continue...")?;
    stdout.flush()?;

    enable_raw_mode()?;
    wait_for_key()?;
    execute!(stdout, EnterAlternateScreen, Hide)?;
    status
}

/// Blocks until a key is pressed.
pub fn wait_for_key() -> io::Result<()> {
    loop {
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            return Ok(());
        }
    }
}
