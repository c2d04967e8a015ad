//! git::interface
//!
//! The git collaborator: a small capability interface plus its process-backed
//! implementation.
//!
//! # Architecture
//!
//! Every workflow command runs `git` as a child process rather than through
//! `git2`, because the user may ask to see the exact command text and its raw
//! output. [`GitTool`] is the seam: the engine only ever sees
//! [`GitCommand`] values going in and [`CommandOutput`] values coming out.
//!
//! `git2` is used for exactly one read: discovering the repository (and its
//! `.git` directory) so repository configuration can be located.
//!
//! # Error Handling
//!
//! A git command that runs and exits non-zero is *not* a [`GitError`]; it is
//! an ordinary [`CommandOutput`] with a non-zero exit code, and the caller
//! decides what that means. [`GitError`] is reserved for failing to run git at
//! all and for discovery failures.
//!
//! # Example
//!
//! ```no_run
//! use git_rflow::git::{GitCli, GitCommand, GitTool};
//!
//! let mut git = GitCli::new(".");
//! let output = git.run(&GitCommand::Status).unwrap();
//! println!("{} -> exit {}", GitCommand::Status, output.exit_code);
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::core::types::BranchName;

/// Errors from the git collaborator.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git executable could not be started.
    #[error("failed to run '{command}': {source}")]
    Spawn {
        /// The command line that was attempted
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,
}

/// Information about a Git repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    /// Path to .git directory
    pub git_dir: PathBuf,
    /// Path to working directory
    pub work_dir: PathBuf,
}

/// Discover the repository containing `path`.
///
/// Uses `git2::Repository::discover`, so `path` can be any directory within
/// the working tree.
///
/// # Errors
///
/// - [`GitError::NotARepo`] if no repository is found
/// - [`GitError::BareRepo`] if the repository has no working directory
pub fn discover(path: &Path) -> Result<RepoInfo, GitError> {
    let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
        path: path.to_path_buf(),
    })?;

    let work_dir = repo.workdir().ok_or(GitError::BareRepo)?.to_path_buf();

    Ok(RepoInfo {
        git_dir: repo.path().to_path_buf(),
        work_dir,
    })
}

/// The git invocations the workflow engine knows how to issue.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GitCommand {
    /// `git status --porcelain`: one line per changed path, empty when clean.
    Status,
    /// `git status --porcelain --branch`: as above, preceded by a `## ` header
    /// describing the current branch and its upstream.
    StatusBranch,
    /// `git checkout -b <branch>`: create `branch` at HEAD and switch to it.
    CreateBranch(BranchName),
}

impl GitCommand {
    /// Arguments passed to the `git` executable.
    pub fn args(&self) -> Vec<&str> {
        match self {
            GitCommand::Status => vec!["status", "--porcelain"],
            GitCommand::StatusBranch => vec!["status", "--porcelain", "--branch"],
            GitCommand::CreateBranch(branch) => vec!["checkout", "-b", branch.as_str()],
        }
    }

    /// Whether running this command can change the repository.
    pub fn is_mutating(&self) -> bool {
        matches!(self, GitCommand::CreateBranch(_))
    }
}

impl fmt::Display for GitCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "git {}", self.args().join(" "))
    }
}

/// The structured result of one git invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code; `-1` when the process was killed by a signal.
    pub exit_code: i32,
    /// Captured stdout followed by captured stderr.
    pub text: String,
}

impl CommandOutput {
    /// A successful result with the given output.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            text: text.into(),
        }
    }

    /// A failed result with the given exit code and output.
    pub fn failure(exit_code: i32, text: impl Into<String>) -> Self {
        Self {
            exit_code,
            text: text.into(),
        }
    }

    /// Whether the command exited with status zero.
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Capability interface over the wrapped version-control tool.
///
/// Implementations run one command to completion before returning.
pub trait GitTool {
    /// Run `command` and capture its output.
    ///
    /// # Errors
    ///
    /// Returns [`GitError`] only if the command could not be run at all. A
    /// command that ran and failed is reported through
    /// [`CommandOutput::exit_code`].
    fn run(&mut self, command: &GitCommand) -> Result<CommandOutput, GitError>;
}

/// [`GitTool`] backed by the `git` executable on `PATH`.
#[derive(Debug, Clone)]
pub struct GitCli {
    cwd: PathBuf,
}

impl GitCli {
    /// Run git commands from `cwd`.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

impl GitTool for GitCli {
    fn run(&mut self, command: &GitCommand) -> Result<CommandOutput, GitError> {
        let output = Command::new("git")
            .args(command.args())
            .current_dir(&self.cwd)
            .output()
            .map_err(|source| GitError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            text,
        })
    }
}
