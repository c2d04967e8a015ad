//! engine::gate
//!
//! Repository preconditions checked before any mutating action.
//!
//! # Architecture
//!
//! A requirement set is an ordered slice of [`Precondition`] entries, each a
//! predicate over the repository state paired with the error it raises.
//! [`gate`] evaluates the entries in order and stops at the first one that
//! does not hold, so a later check never runs once an earlier one failed.
//!
//! Repository state is read lazily through a [`StatusCache`], which runs each
//! status query at most once per gate run. The clean check only needs
//! `git status --porcelain`; the gone and unpushed checks share one
//! `git status --porcelain --branch`.
//!
//! # Invariants
//!
//! - Gating never runs a mutating git command
//! - Gating never produces `Ready` when a precondition does not hold
//! - Nothing is cached across invocations
//!
//! # Example
//!
//! ```
//! use git_rflow::engine::exec::Executor;
//! use git_rflow::engine::gate::{gate, requirements, GateResult, PreconditionError};
//! use git_rflow::git::mock::MockGit;
//! use git_rflow::git::{CommandOutput, GitCommand};
//! use git_rflow::ui::output::Reporter;
//!
//! let mut git = MockGit::healthy("master")
//!     .respond(GitCommand::Status, CommandOutput::success("?? dirty\n"));
//! let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
//! let mut reporter = Reporter::new(&mut out, &mut err);
//! let mut executor = Executor::new(&mut git, &mut reporter);
//!
//! let result = gate(requirements::FEATURE_START, &mut executor).unwrap();
//! assert_eq!(result, GateResult::Blocked(PreconditionError::NotClean));
//! ```

use thiserror::Error;

use super::exec::{ExecuteError, Executor};
use crate::git::status::{self, BranchStatus};
use crate::git::GitCommand;

/// A precondition that did not hold.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("Local repo is not clean. Please fix and retry.")]
    NotClean,

    #[error("Local repo is \"gone\". Please fix and retry.")]
    Gone,

    #[error("Local repo has unpushed changes. Please fix and retry.")]
    Unpushed,
}

/// Snapshot of the repository, as seen by a gate run that passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryState {
    pub is_clean: bool,
    /// The upstream tracking ref no longer exists.
    pub is_gone: bool,
    /// Local commits are missing from the upstream.
    pub has_unpushed: bool,
    /// Current branch and upstream relation.
    pub branch: BranchStatus,
}

/// Lazily queried repository state for one gate run.
#[derive(Debug, Default)]
pub struct StatusCache {
    clean: Option<bool>,
    branch: Option<BranchStatus>,
}

impl StatusCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the working tree has no changes, untracked files included.
    pub fn is_clean(&mut self, exec: &mut Executor<'_, '_>) -> Result<bool, ExecuteError> {
        if let Some(clean) = self.clean {
            return Ok(clean);
        }
        let output = exec.query(&GitCommand::Status)?;
        let clean = status::is_clean(&output.text);
        self.clean = Some(clean);
        Ok(clean)
    }

    /// The current branch and its relation to its upstream.
    pub fn branch(&mut self, exec: &mut Executor<'_, '_>) -> Result<&BranchStatus, ExecuteError> {
        if self.branch.is_none() {
            let output = exec.query(&GitCommand::StatusBranch)?;
            self.branch = Some(BranchStatus::parse(&output.text));
        }
        Ok(self.branch.get_or_insert_with(BranchStatus::default))
    }

    /// Complete the snapshot, querying whatever the checks did not need.
    pub fn into_state(
        mut self,
        exec: &mut Executor<'_, '_>,
    ) -> Result<RepositoryState, ExecuteError> {
        let is_clean = self.is_clean(exec)?;
        let branch = self.branch(exec)?.clone();
        Ok(RepositoryState {
            is_clean,
            is_gone: branch.gone,
            has_unpushed: branch.has_unpushed(),
            branch,
        })
    }
}

/// A predicate over the repository state.
pub type Predicate = fn(&mut StatusCache, &mut Executor<'_, '_>) -> Result<bool, ExecuteError>;

/// One entry of a requirement set.
#[derive(Debug, Clone, Copy)]
pub struct Precondition {
    /// Short name used in debug traces.
    pub name: &'static str,
    /// Returns true when the precondition holds.
    pub holds: Predicate,
    /// Raised when it does not.
    pub failure: PreconditionError,
}

fn working_tree_clean(
    cache: &mut StatusCache,
    exec: &mut Executor<'_, '_>,
) -> Result<bool, ExecuteError> {
    cache.is_clean(exec)
}

fn upstream_present(
    cache: &mut StatusCache,
    exec: &mut Executor<'_, '_>,
) -> Result<bool, ExecuteError> {
    Ok(!cache.branch(exec)?.gone)
}

fn nothing_unpushed(
    cache: &mut StatusCache,
    exec: &mut Executor<'_, '_>,
) -> Result<bool, ExecuteError> {
    Ok(!cache.branch(exec)?.has_unpushed())
}

/// Predefined preconditions and requirement sets.
pub mod requirements {
    use super::*;

    pub const CLEAN: Precondition = Precondition {
        name: "clean",
        holds: working_tree_clean,
        failure: PreconditionError::NotClean,
    };

    pub const NOT_GONE: Precondition = Precondition {
        name: "gone",
        holds: upstream_present,
        failure: PreconditionError::Gone,
    };

    pub const PUSHED: Precondition = Precondition {
        name: "unpushed",
        holds: nothing_unpushed,
        failure: PreconditionError::Unpushed,
    };

    /// Requirements for starting a feature branch.
    ///
    /// Ordered from most to least fundamental: a dirty tree is reported
    /// before anything about the upstream.
    pub const FEATURE_START: &[Precondition] = &[CLEAN, NOT_GONE, PUSHED];
}

/// Result of gating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateResult {
    /// Every precondition holds.
    Ready(RepositoryState),
    /// The first precondition that did not hold.
    Blocked(PreconditionError),
}

/// Evaluate `preconditions` in order, stopping at the first failure.
///
/// # Errors
///
/// Returns [`ExecuteError`] if a status query could not be run or exited
/// non-zero.
pub fn gate(
    preconditions: &[Precondition],
    exec: &mut Executor<'_, '_>,
) -> Result<GateResult, ExecuteError> {
    let mut cache = StatusCache::new();

    for precondition in preconditions {
        let holds = (precondition.holds)(&mut cache, exec)?;
        exec.reporter().debug(format_args!(
            "precondition '{}': {}",
            precondition.name,
            if holds { "ok" } else { "failed" }
        ));
        if !holds {
            return Ok(GateResult::Blocked(precondition.failure));
        }
    }

    Ok(GateResult::Ready(cache.into_state(exec)?))
}
