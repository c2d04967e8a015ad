//! engine::plan
//!
//! Ordered, previewable descriptions of what a workflow action will do.
//!
//! A plan is built before anything runs, so the mutating sequence for an
//! action is fixed once the gate has passed. Steps run strictly in order and
//! each depends on the ones before it.

use crate::core::types::BranchName;
use crate::git::GitCommand;

/// A single mutating step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    /// Create `branch` at HEAD and switch to it.
    CreateBranch { branch: BranchName },
}

impl PlanStep {
    /// The git command that carries out this step.
    pub fn command(&self) -> GitCommand {
        match self {
            PlanStep::CreateBranch { branch } => GitCommand::CreateBranch(branch.clone()),
        }
    }

    /// Whether the step's output is the confirmation line of the summary.
    ///
    /// Such output is rendered once, in the summary, instead of also being
    /// echoed under `--print-git-output`.
    pub fn confirms_in_summary(&self) -> bool {
        matches!(self, PlanStep::CreateBranch { .. })
    }
}

/// The ordered steps of one workflow action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Workflow command the plan was built for, e.g. `feature start`.
    pub name: String,
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Append a step.
    pub fn step(mut self, step: PlanStep) -> Self {
        self.steps.push(step);
        self
    }
}
