//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **only doorway** to Git. Workflow commands are issued
//! through the [`GitTool`] trait, so the engine can be driven against the
//! real `git` executable ([`GitCli`]) or a scripted stand-in
//! ([`mock::MockGit`]). No other module imports `git2` or spawns `git`.
//!
//! # Responsibilities
//!
//! - Repository discovery (`git2`)
//! - Running git commands with captured output
//! - Parsing porcelain status output
//!
//! # Invariants
//!
//! - One command runs to completion before the next is issued
//! - Non-zero exit codes are data, not errors

mod interface;
pub mod mock;
pub mod status;

pub use interface::{discover, CommandOutput, GitCli, GitCommand, GitError, GitTool, RepoInfo};
pub use status::BranchStatus;
