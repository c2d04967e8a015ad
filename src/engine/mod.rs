//! engine
//!
//! Orchestrates every workflow action: Gate -> Plan -> Execute.
//!
//! # Architecture
//!
//! 1. **Gate**: Evaluate the action's ordered preconditions against fresh
//!    repository state; stop at the first failure
//! 2. **Plan**: Fix the ordered sequence of mutating git commands
//! 3. **Execute**: Run the plan through the executor, stopping at the first
//!    failing command
//!
//! All git commands, queries included, go through [`exec::Executor`], which
//! narrates them according to the [`Context`].
//!
//! # Invariants
//!
//! - No mutating command runs unless the gate returned `Ready`
//! - Commands run sequentially, each to completion
//! - Failures are never retried or rolled back

pub mod exec;
pub mod gate;
pub mod plan;

pub use exec::{ActionResult, CommandRecord, ExecuteError, Executor};
pub use gate::{gate, GateResult, Precondition, PreconditionError, RepositoryState};
pub use plan::{Plan, PlanStep};

use crate::ui::output::Narration;

/// Execution context for workflow actions.
///
/// Resolved once per invocation from command-line options layered over
/// configuration, then passed by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    /// Echo git commands before they run.
    pub print_commands: bool,
    /// Echo git output after each command.
    pub print_output: bool,
    /// Debug tracing enabled.
    pub debug: bool,
    /// Prepended to new feature branch names.
    pub feature_prefix: String,
}

impl Context {
    /// The narration settings this context asks for.
    pub fn narration(&self) -> Narration {
        Narration::from_flags(self.print_commands, self.print_output, self.debug)
    }
}
