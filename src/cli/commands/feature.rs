//! cli::commands::feature
//!
//! Feature branch workflow.
//!
//! # Start
//!
//! `feature start <name>` creates `<prefix><name>` from the current branch
//! and switches to it. The repository must be clean, its upstream must still
//! exist, and nothing may be waiting to be pushed.

use crate::cli::args::UsageError;
use crate::core::types::BranchName;
use crate::engine::gate::requirements;
use crate::engine::{gate, ActionResult, Context, Executor, GateResult, Plan, PlanStep};
use crate::error::Error;
use crate::ui::output::Summary;

/// Start a feature branch named `name`.
///
/// # Errors
///
/// - [`UsageError::InvalidBranchName`] if the configured prefix makes the
///   name invalid
/// - [`crate::engine::PreconditionError`] for the first failed precondition
/// - [`crate::engine::ExecuteError`] if a git command fails
pub fn start(
    ctx: &Context,
    name: &BranchName,
    exec: &mut Executor<'_, '_>,
) -> Result<ActionResult, Error> {
    let branch = name
        .with_prefix(&ctx.feature_prefix)
        .map_err(|e| UsageError::invalid_branch_name(&format!("{}{name}", ctx.feature_prefix), e))?;

    let state = match gate(requirements::FEATURE_START, exec)? {
        GateResult::Ready(state) => state,
        GateResult::Blocked(failure) => return Err(failure.into()),
    };
    let base = state.branch.base_name().to_string();

    let plan = Plan::new("feature start").step(PlanStep::CreateBranch {
        branch: branch.clone(),
    });
    let outputs = exec.execute(&plan)?;

    let confirmation = outputs
        .first()
        .map(|output| output.text.trim())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Switched to a new branch '{branch}'"));

    let summary = Summary {
        confirmation,
        actions: vec![
            format!("A new branch '{branch}' was created, based on '{base}'"),
            format!("You are now on branch '{branch}'"),
        ],
        guidance: format!(
            "Now, start committing on your feature. When done, use:\n\n     \
             git flow feature finish {name}"
        ),
    };

    Ok(ActionResult {
        records: exec.records().to_vec(),
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ExecuteError, PreconditionError};
    use crate::git::mock::MockGit;
    use crate::git::{CommandOutput, GitCommand};
    use crate::ui::output::Reporter;

    fn run_start(git: &mut MockGit, prefix: &str, name: &str) -> Result<ActionResult, Error> {
        let ctx = Context {
            feature_prefix: prefix.to_string(),
            ..Context::default()
        };
        let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
        let mut reporter = Reporter::new(&mut out, &mut err);
        let mut exec = Executor::new(git, &mut reporter);
        start(&ctx, &BranchName::new(name).unwrap(), &mut exec)
    }

    #[test]
    fn creates_branch_from_current() {
        let mut git = MockGit::healthy("develop");
        let result = run_start(&mut git, "", "feature1").unwrap();

        assert_eq!(
            result.summary.confirmation,
            "Switched to a new branch 'feature1'"
        );
        assert_eq!(
            result.summary.actions,
            [
                "A new branch 'feature1' was created, based on 'develop'",
                "You are now on branch 'feature1'",
            ]
        );
        assert!(result
            .summary
            .guidance
            .ends_with("git flow feature finish feature1"));

        let commands: Vec<_> = result.records.iter().map(|r| r.command.as_str()).collect();
        assert_eq!(
            commands,
            [
                "git status --porcelain",
                "git status --porcelain --branch",
                "git checkout -b feature1",
            ]
        );
    }

    #[test]
    fn prefix_applies_to_branch_but_not_guidance() {
        let mut git = MockGit::healthy("master");
        let result = run_start(&mut git, "feature/", "login").unwrap();

        assert_eq!(
            git.calls().last(),
            Some(&GitCommand::CreateBranch(
                BranchName::new("feature/login").unwrap()
            ))
        );
        assert_eq!(
            result.summary.actions[1],
            "You are now on branch 'feature/login'"
        );
        assert!(result
            .summary
            .guidance
            .ends_with("git flow feature finish login"));
    }

    #[test]
    fn empty_checkout_output_gets_generated_confirmation() {
        let branch = BranchName::new("quiet").unwrap();
        let mut git = MockGit::healthy("master")
            .respond(GitCommand::CreateBranch(branch), CommandOutput::success(""));
        let result = run_start(&mut git, "", "quiet").unwrap();
        assert_eq!(result.summary.confirmation, "Switched to a new branch 'quiet'");
    }

    #[test]
    fn dirty_tree_blocks_before_anything_mutates() {
        let mut git = MockGit::healthy("master")
            .respond(GitCommand::Status, CommandOutput::success(" M file\n"));
        let err = run_start(&mut git, "", "feature1").unwrap_err();

        assert!(matches!(
            err,
            Error::Precondition(PreconditionError::NotClean)
        ));
        assert_eq!(git.calls(), &[GitCommand::Status]);
    }

    #[test]
    fn unpushed_commits_block() {
        let mut git = MockGit::healthy("master").respond(
            GitCommand::StatusBranch,
            CommandOutput::success("## master...origin/master [ahead 1]\n"),
        );
        let err = run_start(&mut git, "", "feature1").unwrap_err();
        assert!(matches!(
            err,
            Error::Precondition(PreconditionError::Unpushed)
        ));
    }

    #[test]
    fn existing_branch_is_a_command_failure() {
        let branch = BranchName::new("feature1").unwrap();
        let mut git = MockGit::healthy("master").respond(
            GitCommand::CreateBranch(branch),
            CommandOutput::failure(
                128,
                "fatal: a branch named 'feature1' already exists\n",
            ),
        );
        let err = run_start(&mut git, "", "feature1").unwrap_err();

        match err {
            Error::Execute(ExecuteError::CommandFailed {
                command, exit_code, ..
            }) => {
                assert_eq!(command, "git checkout -b feature1");
                assert_eq!(exit_code, 128);
            }
            other => panic!("expected command failure, got {other:?}"),
        }
    }

    #[test]
    fn prefix_that_breaks_the_name_is_a_usage_error() {
        let mut git = MockGit::healthy("master");
        let err = run_start(&mut git, "feat.", "lock").unwrap_err();
        assert!(matches!(err, Error::Usage(UsageError::InvalidBranchName { .. })));
        assert!(git.calls().is_empty());
    }
}
