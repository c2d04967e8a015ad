//! cli::commands
//!
//! Workflow command vocabulary, resolution, and dispatch.
//!
//! Positional tokens are read as `<command-type> <subcommand> <arguments...>`.
//! Each subcommand declares exactly how many arguments it takes; fewer is a
//! missing-argument error and more is an unrecognized parameter.

pub mod feature;

use std::fmt;

use super::args::UsageError;
use crate::core::types::BranchName;
use crate::engine::{ActionResult, Context, Executor};
use crate::error::Error;

/// The first positional token: which family of workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    Feature,
}

impl CommandType {
    pub const ALL: [CommandType; 1] = [CommandType::Feature];

    /// Token that selects this command type.
    pub fn name(self) -> &'static str {
        match self {
            CommandType::Feature => "feature",
        }
    }

    /// Noun phrase used in messages, e.g. "feature branch".
    pub fn description(self) -> &'static str {
        match self {
            CommandType::Feature => "feature branch",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == token)
    }

    /// Subcommands available under this command type.
    pub fn subcommands(self) -> &'static [Subcommand] {
        match self {
            CommandType::Feature => &[Subcommand::Start],
        }
    }

    fn subcommand(self, token: &str) -> Option<Subcommand> {
        self.subcommands()
            .iter()
            .copied()
            .find(|s| s.name() == token)
    }
}

/// The second positional token: which action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subcommand {
    Start,
}

impl Subcommand {
    pub fn name(self) -> &'static str {
        match self {
            Subcommand::Start => "start",
        }
    }

    /// Names of the required arguments, in order.
    pub fn arguments(self) -> &'static [&'static str] {
        match self {
            Subcommand::Start => &["name"],
        }
    }

    /// One-line help description.
    pub fn description(self) -> &'static str {
        match self {
            Subcommand::Start => "Start a new feature branch from the current branch",
        }
    }
}

/// A fully resolved workflow command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowCommand {
    pub command_type: CommandType,
    pub subcommand: Subcommand,
    /// Required arguments, exactly as many as the subcommand declares.
    /// Every argument in this vocabulary is a branch name.
    pub arguments: Vec<BranchName>,
}

impl WorkflowCommand {
    /// The required argument at `index`.
    fn argument(&self, index: usize) -> Result<&BranchName, UsageError> {
        self.arguments
            .get(index)
            .ok_or(UsageError::MissingArgument {
                command_type: self.command_type,
                argument: self
                    .subcommand
                    .arguments()
                    .get(index)
                    .copied()
                    .unwrap_or("argument"),
            })
    }
}

impl fmt::Display for WorkflowCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.command_type.name(), self.subcommand.name())?;
        for argument in &self.arguments {
            write!(f, " {argument}")?;
        }
        Ok(())
    }
}

/// Resolve positional tokens into a workflow command.
///
/// # Errors
///
/// - [`UsageError::MissingCommand`] / [`UsageError::MissingSubcommand`] /
///   [`UsageError::MissingArgument`] when tokens run out early
/// - [`UsageError::UnrecognizedParameter`] for an unknown command word or the
///   first token beyond the subcommand's arity
/// - [`UsageError::InvalidBranchName`] for an argument git would refuse
///
/// # Example
///
/// ```
/// use git_rflow::cli::commands::{resolve, CommandType, Subcommand};
///
/// let tokens = vec!["feature".to_string(), "start".to_string(), "login".to_string()];
/// let command = resolve(&tokens).unwrap();
///
/// assert_eq!(command.command_type, CommandType::Feature);
/// assert_eq!(command.subcommand, Subcommand::Start);
/// assert_eq!(command.arguments[0].as_str(), "login");
/// ```
pub fn resolve(tokens: &[String]) -> Result<WorkflowCommand, UsageError> {
    let mut tokens = tokens.iter();

    let type_token = tokens.next().ok_or(UsageError::MissingCommand)?;
    let command_type = CommandType::from_token(type_token)
        .ok_or_else(|| UsageError::UnrecognizedParameter(type_token.clone()))?;

    let sub_token = tokens
        .next()
        .ok_or(UsageError::MissingSubcommand(command_type))?;
    let subcommand = command_type
        .subcommand(sub_token)
        .ok_or_else(|| UsageError::UnrecognizedParameter(sub_token.clone()))?;

    let mut arguments = Vec::with_capacity(subcommand.arguments().len());
    for &argument in subcommand.arguments() {
        let token = tokens.next().ok_or(UsageError::MissingArgument {
            command_type,
            argument,
        })?;
        let name = BranchName::new(token.as_str())
            .map_err(|e| UsageError::invalid_branch_name(token, e))?;
        arguments.push(name);
    }

    if let Some(surplus) = tokens.next() {
        return Err(UsageError::UnrecognizedParameter(surplus.clone()));
    }

    Ok(WorkflowCommand {
        command_type,
        subcommand,
        arguments,
    })
}

/// Run a resolved workflow command.
pub fn dispatch(
    command: &WorkflowCommand,
    ctx: &Context,
    exec: &mut Executor<'_, '_>,
) -> Result<ActionResult, Error> {
    match (command.command_type, command.subcommand) {
        (CommandType::Feature, Subcommand::Start) => {
            feature::start(ctx, command.argument(0)?, exec)
        }
    }
}
