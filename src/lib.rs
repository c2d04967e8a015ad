//! git-rflow - guarded, guided branch workflows on top of git
//!
//! git-rflow wraps the branch workflows of git-flow behind one command line.
//! Before it changes anything it checks that the repository is in a state
//! where the workflow makes sense, and afterwards it tells the user what
//! happened and what to do next.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (tokenizes args, dispatches to engine)
//! - [`engine`] - Orchestrates Gate → Plan → Execute for every workflow action
//! - [`core`] - Domain types and configuration
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - Narration, summaries and error rendering
//! - [`error`] - Crate-wide error taxonomy
//!
//! # Correctness Invariants
//!
//! git-rflow maintains the following invariants:
//!
//! 1. No git command runs before the command line is fully understood
//! 2. No mutating git command runs unless every precondition holds
//! 3. Git commands run one at a time, in order, each to completion
//! 4. Every failure is reported once, on stderr, with a non-zero exit code

pub mod cli;
pub mod core;
pub mod engine;
pub mod error;
pub mod git;
pub mod ui;
