//! engine::exec
//!
//! The single doorway from the engine to git.
//!
//! # Architecture
//!
//! Every git command the engine issues, read-only status queries included,
//! runs through [`Executor::run`]. That is what makes the narration order
//! hold: the command text is echoed immediately before the command runs and
//! its output immediately after, in invocation order.
//!
//! # Executor Contract
//!
//! The executor:
//! 1. Runs one command to completion before issuing the next
//! 2. Records `{command, output}` for every command it runs
//! 3. Stops a plan at the first command that exits non-zero
//! 4. Never rolls back: the repository is left as the partial sequence left it
//!
//! # Example
//!
//! ```
//! use git_rflow::core::types::BranchName;
//! use git_rflow::engine::exec::Executor;
//! use git_rflow::engine::plan::{Plan, PlanStep};
//! use git_rflow::git::mock::MockGit;
//! use git_rflow::ui::output::Reporter;
//!
//! let mut git = MockGit::healthy("master");
//! let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
//! let mut reporter = Reporter::new(&mut out, &mut err);
//! let mut executor = Executor::new(&mut git, &mut reporter);
//!
//! let branch = BranchName::new("feature1").unwrap();
//! let plan = Plan::new("feature start").step(PlanStep::CreateBranch { branch });
//! let outputs = executor.execute(&plan).unwrap();
//!
//! assert_eq!(outputs[0].text, "Switched to a new branch 'feature1'\n");
//! ```

use thiserror::Error;

use super::plan::Plan;
use crate::git::{CommandOutput, GitCommand, GitError, GitTool};
use crate::ui::output::{Reporter, Summary};

/// Errors from running git commands.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// A git command ran and exited non-zero.
    #[error("Command '{command}' failed with exit code {exit_code}.")]
    CommandFailed {
        command: String,
        exit_code: i32,
        output: String,
    },

    /// Git could not be run at all.
    #[error(transparent)]
    Git(#[from] GitError),
}

/// One git command and what it printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRecord {
    pub command: String,
    pub output: String,
}

/// The outcome of a successful workflow action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    /// Every git command run for the action, in order.
    pub records: Vec<CommandRecord>,
    pub summary: Summary,
}

/// Runs git commands with narration, recording each one.
pub struct Executor<'r, 'a> {
    git: &'r mut dyn GitTool,
    reporter: &'r mut Reporter<'a>,
    records: Vec<CommandRecord>,
}

impl<'r, 'a> Executor<'r, 'a> {
    pub fn new(git: &'r mut dyn GitTool, reporter: &'r mut Reporter<'a>) -> Self {
        Self {
            git,
            reporter,
            records: Vec::new(),
        }
    }

    /// Run a read-only query, echoing its output under `-o`.
    ///
    /// # Errors
    ///
    /// [`ExecuteError::CommandFailed`] if the query exits non-zero.
    pub fn query(&mut self, command: &GitCommand) -> Result<CommandOutput, ExecuteError> {
        debug_assert!(!command.is_mutating(), "'{command}' is not a query");
        self.run(command, true)
    }

    /// Run every step of `plan` in order, returning each step's output.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step. Steps already run are not undone.
    pub fn execute(&mut self, plan: &Plan) -> Result<Vec<CommandOutput>, ExecuteError> {
        self.reporter
            .debug(format_args!("executing plan '{}' ({} steps)", plan.name, plan.steps.len()));

        plan.steps
            .iter()
            .map(|step| self.run(&step.command(), !step.confirms_in_summary()))
            .collect()
    }

    /// Run one command.
    ///
    /// The output of a failed command is always surfaced on stderr, unless it
    /// was already echoed.
    pub fn run(
        &mut self,
        command: &GitCommand,
        echo_output: bool,
    ) -> Result<CommandOutput, ExecuteError> {
        self.reporter.command(command);
        let output = self.git.run(command)?;
        self.reporter
            .debug(format_args!("'{}' exited with {}", command, output.exit_code));

        let echoed = echo_output && self.reporter.narration().print_output;
        if echo_output {
            self.reporter.output(&output.text);
        }

        self.records.push(CommandRecord {
            command: command.to_string(),
            output: output.text.clone(),
        });

        if !output.succeeded() {
            if !echoed {
                self.reporter.tool_output(&output.text);
            }
            return Err(ExecuteError::CommandFailed {
                command: command.to_string(),
                exit_code: output.exit_code,
                output: output.text,
            });
        }

        Ok(output)
    }

    /// Commands run so far.
    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    /// The reporter narration goes through.
    pub fn reporter(&mut self) -> &mut Reporter<'a> {
        &mut *self.reporter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BranchName;
    use crate::engine::plan::PlanStep;
    use crate::git::mock::MockGit;
    use crate::ui::output::Narration;

    fn create(name: &str) -> PlanStep {
        PlanStep::CreateBranch {
            branch: BranchName::new(name).unwrap(),
        }
    }

    #[test]
    fn records_every_command() {
        let mut git = MockGit::healthy("master");
        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        let mut reporter = Reporter::new(&mut out, &mut err);
        let mut executor = Executor::new(&mut git, &mut reporter);

        executor.query(&GitCommand::Status).unwrap();
        executor
            .execute(&Plan::new("test").step(create("feature1")))
            .unwrap();

        let commands: Vec<_> = executor.records().iter().map(|r| r.command.as_str()).collect();
        assert_eq!(commands, ["git status --porcelain", "git checkout -b feature1"]);
    }

    #[test]
    fn failing_step_stops_the_plan() {
        let first = BranchName::new("one").unwrap();
        let mut git = MockGit::new().respond(
            GitCommand::CreateBranch(first),
            CommandOutput::failure(128, "fatal: a branch named 'one' already exists\n"),
        );
        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        {
            let mut reporter = Reporter::new(&mut out, &mut err);
            let mut executor = Executor::new(&mut git, &mut reporter);

            let plan = Plan::new("test").step(create("one")).step(create("two"));
            let result = executor.execute(&plan);

            match result {
                Err(ExecuteError::CommandFailed {
                    command, exit_code, ..
                }) => {
                    assert_eq!(command, "git checkout -b one");
                    assert_eq!(exit_code, 128);
                }
                other => panic!("expected CommandFailed, got {other:?}"),
            }
        }
        assert_eq!(git.calls().len(), 1);
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "fatal: a branch named 'one' already exists\n"
        );
    }

    #[test]
    fn failed_query_output_is_not_repeated_when_echoed() {
        let mut git = MockGit::new();
        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        {
            let mut reporter = Reporter::new(&mut out, &mut err);
            reporter.set_narration(Narration::from_flags(false, true, false));
            let mut executor = Executor::new(&mut git, &mut reporter);
            assert!(executor.query(&GitCommand::Status).is_err());
        }
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("fatal: not a git repository"));
        assert_eq!(String::from_utf8(err).unwrap(), "");
    }

    #[test]
    fn summary_confirmation_is_not_echoed() {
        let mut git = MockGit::new();
        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        {
            let mut reporter = Reporter::new(&mut out, &mut err);
            reporter.set_narration(Narration::from_flags(true, true, false));
            let mut executor = Executor::new(&mut git, &mut reporter);
            executor
                .execute(&Plan::new("test").step(create("feature1")))
                .unwrap();
        }
        assert_eq!(String::from_utf8(out).unwrap(), "git checkout -b feature1\n");
    }

    #[test]
    fn spawn_failure_is_a_git_error() {
        let mut git = MockGit::new().unavailable();
        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        let mut reporter = Reporter::new(&mut out, &mut err);
        let mut executor = Executor::new(&mut git, &mut reporter);

        let err = executor.query(&GitCommand::Status).unwrap_err();
        assert!(matches!(err, ExecuteError::Git(GitError::Spawn { .. })));
    }
}
