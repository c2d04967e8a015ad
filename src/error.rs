//! error
//!
//! Top-level error for a workflow invocation.
//!
//! Every failure a user can see is one of these. Each renders as a single
//! `ERROR:` line; the exit code is the same for all of them.

use thiserror::Error;

use crate::cli::args::UsageError;
use crate::core::config::ConfigError;
use crate::engine::{ExecuteError, PreconditionError};

/// Why an invocation failed.
#[derive(Debug, Error)]
pub enum Error {
    /// The command line could not be understood.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// A precondition of the requested action does not hold.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// A git command failed or could not be run.
    #[error(transparent)]
    Execute(#[from] ExecuteError),

    /// A configuration file is unreadable or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
