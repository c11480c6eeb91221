//! Error types for ie.
//!
//! Every failure the session can run into while browsing is a variant of [IeError].
//! Only [IeError::Terminal] is fatal; everything else is reported on the status line
//! and the session carries on with its previous state.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IeError {
    #[error("could not list {}: {source}", path.display())]
    ListDir { path: PathBuf, source: io::Error },

    #[error("cannot enter {}: {source}", path.display())]
    CannotEnter { path: PathBuf, source: io::Error },

    #[error("failed to remove {}: {source}", path.display())]
    Remove { path: PathBuf, source: io::Error },

    #[error("failed to rename `{}` to `{}`: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("`{}` already exists", to.display())]
    RenameTarget { to: PathBuf },

    #[error("failed to run {}: {source}", program.display())]
    Spawn { program: PathBuf, source: io::Error },

    #[error("cannot view {}: {source}", path.display())]
    View { path: PathBuf, source: io::Error },

    #[error("bad search pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

pub type Result<T, E = IeError> = std::result::Result<T, E>;
