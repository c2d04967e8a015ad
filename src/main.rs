//! git-rflow binary entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    git_rflow::cli::run()
}
