//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Narration, summaries, errors and debug traces
//!
//! # Design
//!
//! All output goes through this module so that the ordering guarantees of
//! `--print-git-commands` and `--print-git-output` hold in one place.

pub mod output;
