//! Command-line argument parsing and help for ie.
//!
//! `ie [PATH]` opens PATH (default: the current directory). The only flags are help,
//! version and `--init`; every other dash argument is refused.

use crate::config::Config;

use std::path::PathBuf;

/// What `main` should do after the arguments are read.
#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    /// Start the explorer on this path (not yet resolved).
    Run(PathBuf),
    /// Quit right away with this exit status.
    Exit(i32),
}

/// Parsed form of the command line, before any side effects.
#[derive(Debug, PartialEq, Eq)]
pub enum CliRequest {
    Run(Option<String>),
    Help,
    Version,
    Init,
    Unknown(String),
    TooMany,
}

pub fn parse_args<I>(args: I) -> CliRequest
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().skip(1);
    let Some(first) = args.next() else {
        return CliRequest::Run(None);
    };
    if args.next().is_some() {
        return CliRequest::TooMany;
    }

    match first.as_str() {
        "-h" | "--help" => CliRequest::Help,
        "-V" | "--version" => CliRequest::Version,
        "--init" => CliRequest::Init,
        arg if arg.starts_with('-') && arg.len() > 1 => CliRequest::Unknown(first),
        _ => CliRequest::Run(Some(first)),
    }
}

/// Reads `std::env::args`, performs help/version/init, and tells `main` how to go on.
pub fn handle_args() -> CliAction {
    match parse_args(std::env::args()) {
        CliRequest::Run(None) => CliAction::Run(PathBuf::from(".")),
        CliRequest::Run(Some(path)) => CliAction::Run(PathBuf::from(path)),
        CliRequest::Help => {
            print_help();
            CliAction::Exit(0)
        }
        CliRequest::Version => {
            println!("ie {}", env!("CARGO_PKG_VERSION"));
            CliAction::Exit(0)
        }
        CliRequest::Init => match Config::generate_default(&Config::default_path()) {
            Ok(()) => CliAction::Exit(0),
            Err(e) => {
                eprintln!("ie: {e}");
                CliAction::Exit(1)
            }
        },
        CliRequest::Unknown(arg) => {
            eprintln!("ie: {arg}: options are unimplemented");
            eprintln!("Usage: ie [PATH]");
            CliAction::Exit(1)
        }
        CliRequest::TooMany => {
            eprintln!("ie: only one path may be given");
            eprintln!("Usage: ie [PATH]");
            CliAction::Exit(1)
        }
    }
}

fn print_help() {
    println!(
        r#"ie - an interactive long-listing explorer for the terminal

USAGE:
  ie [PATH]

PATH:
  Directory to open (defaults to the current directory)

OPTIONS:
      --init              Write the default configuration file
  -h, --help              Print help information
  -V, --version           Print the installed version of ie

KEYS (defaults):
  j/k, Down/Up            Move the cursor
  g / G                   First / last entry
  Enter                   Enter directory, run executable, or view file
  Space                   Toggle mark
  m / u                   Mark / unmark (on "." marks / unmarks everything)
  d / r                   Delete / rename
  / n N                   Regex search, next, previous
  C-x Enter               Parent directory
  C-x c / C-x b           New buffer / choose buffer
  q                       Quit

ENVIRONMENT:
  IE_CONFIG               Override the config file path
  IE_LOG                  Enable logging with this filter (e.g. "debug")
  IE_LOG_FILE             Log file path (defaults to the cache directory)
"#
    );
}
