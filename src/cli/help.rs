//! cli::help
//!
//! Usage and version text.

use super::args::GlobalOption;
use super::commands::CommandType;

/// Program name as shown to users.
pub const PROGRAM: &str = "git-rflow";

/// Width of the left column in option and command tables.
const COLUMN: usize = 28;

/// The `--version` line.
pub fn version_line() -> String {
    format!("{PROGRAM}, version {}", env!("CARGO_PKG_VERSION"))
}

/// The full `--help` text.
pub fn usage() -> String {
    let mut text = String::new();
    text.push_str("Usage:\n");
    text.push_str(&format!(
        "    {PROGRAM} [global options] <command> <subcommand> [arguments...]\n"
    ));

    text.push_str("\nCommands:\n");
    for command_type in CommandType::ALL {
        for subcommand in command_type.subcommands() {
            let mut synopsis = format!("{} {}", command_type.name(), subcommand.name());
            for argument in subcommand.arguments() {
                synopsis.push_str(&format!(" <{argument}>"));
            }
            text.push_str(&row(&synopsis, subcommand.description()));
        }
    }

    text.push_str("\nGlobal options:\n");
    for option in GlobalOption::ALL {
        let aliases = format!("-{}, --{}", option.short(), option.long());
        text.push_str(&row(&aliases, option.description()));
    }
    text.push_str(&row("--", "Ignore all following options"));
    text
}

fn row(left: &str, right: &str) -> String {
    format!("    {:<width$}{}\n", left, right, width = COLUMN)
}
