//! Error taxonomy for a single hashcheck run.

use std::io;
use std::path::PathBuf;

/// Exit status used for every terminal failure.
pub(crate) const EXIT_FAILURE: u8 = 1;

/// Terminal failures surfaced to the user before exit.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CheckError {
    #[error("{0}")]
    Argument(String),

    #[error("the file '{}' does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to hash '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CheckError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CheckError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn exit_code(&self) -> u8 {
        match self {
            CheckError::Argument(_) | CheckError::NotFound { .. } | CheckError::Io { .. } => {
                EXIT_FAILURE
            }
        }
    }
}
