//! main.rs
//! Entry point for ie

use ie_tui::app::Session;
use ie_tui::config::Config;
use ie_tui::core::{fm, terminal};
use ie_tui::utils::cli::{CliAction, handle_args};
use ie_tui::utils::init_logging;

use std::process::ExitCode;

fn main() -> ExitCode {
    let path = match handle_args() {
        CliAction::Run(path) => path,
        CliAction::Exit(code) => return ExitCode::from(code as u8),
    };

    if let Err(e) = init_logging() {
        eprintln!("ie: logging disabled: {e}");
    }

    let start = match fm::resolve_dir(&path) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("ie: {e}");
            return ExitCode::FAILURE;
        }
    };

    let config = Config::load();
    let mut session = Session::new(&config, start);

    terminal::install_panic_hook();
    match terminal::run_terminal(&mut session) {
        Ok(()) => {
            tracing::info!("quit");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "terminal failure");
            eprintln!("ie: terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}
