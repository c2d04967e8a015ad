//! cli
//!
//! Command-line interface layer for git-rflow.
//!
//! # Responsibilities
//!
//! - Tokenize the raw arguments into global options and positionals
//! - Answer help and version without touching the repository
//! - Resolve and dispatch the workflow command
//! - Render the outcome and map it to an exit code
//!
//! # Architecture
//!
//! The CLI layer is thin. Repository state is only read and changed through
//! the [`crate::engine`], and everything the user sees goes through a
//! [`Reporter`]. Configuration is loaded lazily, after the command line has
//! been fully understood, so help, version and usage errors never read it.

pub mod args;
pub mod commands;
pub mod help;

use std::io;
use std::process::ExitCode;

use anyhow::Context as _;

use crate::core::config::{Config, ConfigError};
use crate::engine::{Context, Executor};
use crate::error::Error;
use crate::git::{self, GitCli, GitTool};
use crate::ui::output::{Narration, Reporter};
use args::GlobalOption;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> ExitCode {
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();
    let mut reporter = Reporter::new(&mut out, &mut err);

    let cwd = match std::env::current_dir().context("failed to determine the current directory")
    {
        Ok(cwd) => cwd,
        Err(e) => {
            reporter.error(format_args!("{e:#}"));
            reporter.flush();
            return ExitCode::from(1);
        }
    };

    let invocation = match args::decode(std::env::args_os().skip(1)) {
        Ok(invocation) => invocation,
        Err(e) => {
            let err = Error::from(e);
            reporter.error(&err);
            reporter.flush();
            return ExitCode::from(err.exit_code());
        }
    };

    let mut git = GitCli::new(cwd.clone());
    let load_config = || {
        let git_dir = git::discover(&cwd).ok().map(|repo| repo.git_dir);
        Config::load(git_dir.as_deref())
    };

    ExitCode::from(run_with(&invocation, &mut git, load_config, &mut reporter))
}

/// Run one invocation against `git`, returning the exit code.
///
/// `load_config` is called at most once, and only when a workflow command
/// is about to run.
pub fn run_with(
    invocation: &[String],
    git: &mut dyn GitTool,
    load_config: impl FnOnce() -> Result<Config, ConfigError>,
    reporter: &mut Reporter<'_>,
) -> u8 {
    let code = match drive(invocation, git, load_config, reporter) {
        Ok(code) => code,
        Err(err) => {
            reporter.error(&err);
            err.exit_code()
        }
    };
    reporter.debug(format_args!("exit code {code}"));
    reporter.flush();
    code
}

fn drive(
    invocation: &[String],
    git: &mut dyn GitTool,
    load_config: impl FnOnce() -> Result<Config, ConfigError>,
    reporter: &mut Reporter<'_>,
) -> Result<u8, Error> {
    let parsed = args::parse(invocation)?;
    let cli = parsed.options;
    reporter.set_narration(Narration::from_flags(
        cli.print_commands,
        cli.print_output,
        cli.debug,
    ));
    reporter.debug(format_args!("options: {cli}"));
    if !parsed.ignored.is_empty() {
        reporter.debug(format_args!("ignored after '--': {}", parsed.ignored.join(" ")));
    }

    match parsed.terminal {
        Some(GlobalOption::Version) => {
            reporter.text(&help::version_line());
            return Ok(0);
        }
        Some(GlobalOption::Help) => {
            reporter.text(&help::usage());
            return Ok(1);
        }
        _ => {}
    }

    if parsed.positionals.is_empty() && cli.is_empty() {
        reporter.text(&help::usage());
    }

    let command = commands::resolve(&parsed.positionals)?;
    reporter.debug(format_args!("command: {command}"));

    let config = load_config()?;
    for source in config.sources() {
        reporter.debug(format_args!("config: {}", source.display()));
    }

    let options = config.options().apply(&cli);
    let ctx = Context {
        print_commands: options.print_commands,
        print_output: options.print_output,
        debug: options.debug,
        feature_prefix: config.feature_prefix().to_string(),
    };
    reporter.set_narration(ctx.narration());

    let result = {
        let mut exec = Executor::new(git, reporter);
        commands::dispatch(&command, &ctx, &mut exec)?
    };
    reporter.summary(&result.summary);
    Ok(0)
}
