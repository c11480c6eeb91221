//! Terminal setup and event loop for ie.
//!
//! Handles raw mode and the alternate screen, redraws, and feeds key and resize events
//! to the [Session]. The terminal is restored by [TerminalGuard] on every way out of the
//! loop, and by [install_panic_hook] if ie panics.

use crate::app::{KeypressResult, Session};
use crate::core::proc;
use crate::error::IeError;
use crate::ui;

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};

use std::io::{self, Stdout};
use std::time::Instant;

/// Raw mode and the alternate screen, held for as long as the guard lives.
pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show);
    }
}

/// Restores the terminal before the default panic message is printed.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        default_hook(info);
    }));
}

/// Enters the alternate screen and runs the session until it quits.
///
/// Returns an error only when the terminal itself fails.
pub fn run_terminal(session: &mut Session) -> io::Result<()> {
    let mut guard = TerminalGuard::enter()?;
    event_loop(guard.terminal(), session)
}

/// Draws, waits for one event and dispatches it. Returns on quit.
fn event_loop<B: Backend>(terminal: &mut Terminal<B>, session: &mut Session) -> io::Result<()>
where
    io::Error: From<<B as Backend>::Error>,
{
    loop {
        session.tick();
        session.synchronize();
        terminal.draw(|f| ui::render(f, session))?;

        // Block unless a status message is waiting to expire.
        if let Some(deadline) = session.next_deadline() {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                continue;
            }
        }

        match event::read()? {
            Event::Key(key) => match session.handle_keypress(key) {
                KeypressResult::Quit => break,
                KeypressResult::RunChild(cmd) => {
                    match proc::run_suspended(&cmd) {
                        Err(IeError::Terminal(e)) => return Err(e),
                        result => session.child_finished(result),
                    }
                    terminal.clear()?;
                }
                KeypressResult::Continue | KeypressResult::Consumed => {}
            },
            // Redrawn at the top of the loop.
            Event::Resize(_, _) => {}
            _ => {}
        }
    }
    Ok(())
}
