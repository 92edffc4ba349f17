//! Typed errors for loading recipes and running sessions.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal recipe load failures. Per-line problems are warnings, not errors.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read recipe file {}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("recipe file {} is not valid YAML", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no valid steps found in {}", path.display())]
    NoValidSteps { path: PathBuf },
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("input closed before the session finished")]
    InputClosed,

    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
