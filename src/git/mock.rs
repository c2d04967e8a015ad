//! git::mock
//!
//! Scripted git implementation for deterministic testing.
//!
//! # Design
//!
//! `MockGit` answers each [`GitCommand`] with a scripted [`CommandOutput`]
//! and records every command it was asked to run, in order. Unscripted
//! commands behave like git would in a healthy repository for branch
//! creation, and like git outside a repository for status queries.
//!
//! # Example
//!
//! ```
//! use git_rflow::git::mock::MockGit;
//! use git_rflow::git::{GitCommand, GitTool};
//!
//! let mut git = MockGit::healthy("master");
//! let output = git.run(&GitCommand::Status).unwrap();
//!
//! assert!(output.succeeded());
//! assert_eq!(git.calls(), &[GitCommand::Status]);
//! ```

use super::interface::{CommandOutput, GitCommand, GitError, GitTool};

/// Mock git for testing.
#[derive(Debug, Clone, Default)]
pub struct MockGit {
    responses: Vec<(GitCommand, CommandOutput)>,
    calls: Vec<GitCommand>,
    fail_to_spawn: bool,
}

impl MockGit {
    /// A mock with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clean repository on `branch`, in sync with `origin/<branch>`.
    pub fn healthy(branch: &str) -> Self {
        Self::new()
            .respond(GitCommand::Status, CommandOutput::success(""))
            .respond(
                GitCommand::StatusBranch,
                CommandOutput::success(format!("## {branch}...origin/{branch}\n")),
            )
    }

    /// Script the response for `command`, replacing any earlier one.
    pub fn respond(mut self, command: GitCommand, output: CommandOutput) -> Self {
        self.responses.retain(|(c, _)| c != &command);
        self.responses.push((command, output));
        self
    }

    /// Make every command fail as if git were not installed.
    pub fn unavailable(mut self) -> Self {
        self.fail_to_spawn = true;
        self
    }

    /// Commands run so far, in order.
    pub fn calls(&self) -> &[GitCommand] {
        &self.calls
    }

    fn fallback(command: &GitCommand) -> CommandOutput {
        match command {
            GitCommand::CreateBranch(branch) => {
                CommandOutput::success(format!("Switched to a new branch '{branch}'\n"))
            }
            GitCommand::Status | GitCommand::StatusBranch => CommandOutput::failure(
                128,
                "fatal: not a git repository (or any of the parent directories): .git\n",
            ),
        }
    }
}

impl GitTool for MockGit {
    fn run(&mut self, command: &GitCommand) -> Result<CommandOutput, GitError> {
        self.calls.push(command.clone());

        if self.fail_to_spawn {
            return Err(GitError::Spawn {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "git not found"),
            });
        }

        Ok(self
            .responses
            .iter()
            .find(|(c, _)| c == command)
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| Self::fallback(command)))
    }
}
