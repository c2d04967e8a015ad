//! cli::args
//!
//! Global option vocabulary and the command-line tokenizer.
//!
//! # Global Options
//!
//! These options may appear anywhere in the invocation, before or after the
//! command tokens:
//! - `-h` / `--help`: Show usage (terminal)
//! - `-V` / `--version`: Show version (terminal)
//! - `-c` / `--print-git-commands`: Echo git commands before they run
//! - `-d` / `--debug`: Trace execution to stderr
//! - `-o` / `--print-git-output`: Echo git output after each command
//! - `--`: Ignore all following tokens
//!
//! # Tokenizer
//!
//! Each token is classified by a two-state machine. While options are
//! enabled a token is a separator (`--`), a long option (`--name`), a
//! cluster of short options (`-co`), or a positional. After the separator
//! every token is ignored, whatever it looks like.
//!
//! Tokens are consumed left to right. Help and version are terminal: the
//! first one seen wins, but only once every token before `--` has been
//! recognized.

use std::ffi::OsString;
use std::fmt;

use thiserror::Error;

use crate::cli::commands::CommandType;
use crate::core::types::TypeError;

/// Command-line usage errors. None of these have side effects.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsageError {
    /// No command type was given.
    // `feature` is the only command type, so the message names it.
    #[error("The {} command is required.", CommandType::Feature.description())]
    MissingCommand,

    /// A command type was given without a subcommand.
    #[error("The {} command is required.", .0.description())]
    MissingSubcommand(CommandType),

    /// A subcommand was given without one of its required arguments.
    #[error("The {} {argument} is required.", .command_type.description())]
    MissingArgument {
        command_type: CommandType,
        argument: &'static str,
    },

    /// An unknown option, an unknown command word, or a surplus token.
    #[error("Unrecognized parameter '{0}'")]
    UnrecognizedParameter(String),

    /// A branch-name argument that git would refuse.
    #[error("Invalid branch name '{name}': {reason}")]
    InvalidBranchName { name: String, reason: String },
}

/// Which spelling of an option was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasForm {
    Short,
    Long,
}

/// The canonical identity of a global option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalOption {
    Help,
    Version,
    PrintCommands,
    Debug,
    PrintOutput,
}

impl GlobalOption {
    /// All options, in help-text order.
    pub const ALL: [GlobalOption; 5] = [
        GlobalOption::Help,
        GlobalOption::Version,
        GlobalOption::PrintCommands,
        GlobalOption::Debug,
        GlobalOption::PrintOutput,
    ];

    /// Single-letter alias.
    pub fn short(self) -> char {
        match self {
            GlobalOption::Help => 'h',
            GlobalOption::Version => 'V',
            GlobalOption::PrintCommands => 'c',
            GlobalOption::Debug => 'd',
            GlobalOption::PrintOutput => 'o',
        }
    }

    /// Long alias, without the leading dashes.
    pub fn long(self) -> &'static str {
        match self {
            GlobalOption::Help => "help",
            GlobalOption::Version => "version",
            GlobalOption::PrintCommands => "print-git-commands",
            GlobalOption::Debug => "debug",
            GlobalOption::PrintOutput => "print-git-output",
        }
    }

    /// One-line help description.
    pub fn description(self) -> &'static str {
        match self {
            GlobalOption::Help => "Display this [h]elp",
            GlobalOption::Version => "Display the program [v]ersion",
            GlobalOption::PrintCommands => "Print git [c]ommands as they are run",
            GlobalOption::Debug => "Print [d]ebug traces of git-rflow execution",
            GlobalOption::PrintOutput => "Print [o]utput from git commands",
        }
    }

    /// Help and version skip all repository work.
    pub fn is_terminal(self) -> bool {
        matches!(self, GlobalOption::Help | GlobalOption::Version)
    }

    pub fn from_short(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|opt| opt.short() == c)
    }

    pub fn from_long(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|opt| opt.long() == name)
    }

    /// Look up a bare alias (`"c"` or `"print-git-commands"`), as used in
    /// structured option data.
    pub fn lookup(alias: &str) -> Option<(Self, AliasForm)> {
        let mut chars = alias.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_short(c).map(|opt| (opt, AliasForm::Short));
        }
        Self::from_long(alias).map(|opt| (opt, AliasForm::Long))
    }
}

impl UsageError {
    /// Wrap a branch-name validation failure for `name`.
    pub fn invalid_branch_name(name: &str, err: TypeError) -> Self {
        let TypeError::InvalidBranchName(reason) = err;
        UsageError::InvalidBranchName {
            name: name.to_string(),
            reason,
        }
    }
}

impl fmt::Display for GlobalOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}", self.long())
    }
}

/// Resolved option values, keyed by canonical identity.
///
/// Setting an option twice (in either spelling) is the same as setting it
/// once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionSet {
    pub help: bool,
    pub version: bool,
    pub print_commands: bool,
    pub print_output: bool,
    pub debug: bool,
}

impl OptionSet {
    pub fn set(&mut self, option: GlobalOption) {
        *self.slot(option) = true;
    }

    pub fn is_set(&self, option: GlobalOption) -> bool {
        match option {
            GlobalOption::Help => self.help,
            GlobalOption::Version => self.version,
            GlobalOption::PrintCommands => self.print_commands,
            GlobalOption::Debug => self.debug,
            GlobalOption::PrintOutput => self.print_output,
        }
    }

    /// True when no option was given.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn slot(&mut self, option: GlobalOption) -> &mut bool {
        match option {
            GlobalOption::Help => &mut self.help,
            GlobalOption::Version => &mut self.version,
            GlobalOption::PrintCommands => &mut self.print_commands,
            GlobalOption::Debug => &mut self.debug,
            GlobalOption::PrintOutput => &mut self.print_output,
        }
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<String> = GlobalOption::ALL
            .into_iter()
            .filter(|opt| self.is_set(*opt))
            .map(|opt| opt.to_string())
            .collect();
        if set.is_empty() {
            write!(f, "(none)")
        } else {
            write!(f, "{}", set.join(" "))
        }
    }
}

/// The tokenizer's output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArgs {
    /// Options seen before parsing stopped.
    pub options: OptionSet,
    /// Non-option tokens, in order.
    pub positionals: Vec<String>,
    /// Tokens after `--`.
    pub ignored: Vec<String>,
    /// The help or version option that stopped parsing, if any.
    pub terminal: Option<GlobalOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Options,
    Literal,
}

#[derive(Debug, PartialEq, Eq)]
enum TokenKind<'a> {
    Separator,
    Long(&'a str),
    ShortCluster(&'a str),
    Positional,
    Ignored,
}

fn classify(token: &str, state: State) -> TokenKind<'_> {
    if state == State::Literal {
        return TokenKind::Ignored;
    }
    if token == "--" {
        TokenKind::Separator
    } else if let Some(name) = token.strip_prefix("--") {
        TokenKind::Long(name)
    } else if let Some(letters) = token.strip_prefix('-').filter(|l| !l.is_empty()) {
        TokenKind::ShortCluster(letters)
    } else {
        TokenKind::Positional
    }
}

/// Decode raw process arguments into the invocation.
///
/// Every token before `--` must be valid UTF-8: a branch name git would
/// receive differently from what the user typed is never accepted. Tokens
/// after `--` are ignored anyway and are decoded lossily.
///
/// # Errors
///
/// Returns [`UsageError::UnrecognizedParameter`] for the first token before
/// `--` that is not valid UTF-8.
pub fn decode(raw: impl IntoIterator<Item = OsString>) -> Result<Vec<String>, UsageError> {
    let mut literal = false;
    raw.into_iter()
        .map(|arg| {
            if literal {
                return Ok(arg.to_string_lossy().into_owned());
            }
            let token = arg.into_string().map_err(|arg| {
                UsageError::UnrecognizedParameter(arg.to_string_lossy().into_owned())
            })?;
            literal = token == "--";
            Ok(token)
        })
        .collect()
}

/// Split `invocation` into global options and positional tokens.
///
/// # Errors
///
/// Returns [`UsageError::UnrecognizedParameter`] for the first option-like
/// token that is not part of the vocabulary. A short cluster with any
/// unknown letter is rejected whole.
///
/// # Example
///
/// ```
/// use git_rflow::cli::args::parse;
///
/// let args: Vec<String> = ["-co", "feature", "start", "x", "--", "--version"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
/// let parsed = parse(&args).unwrap();
///
/// assert!(parsed.options.print_commands && parsed.options.print_output);
/// assert!(!parsed.options.version);
/// assert_eq!(parsed.positionals, ["feature", "start", "x"]);
/// assert_eq!(parsed.ignored, ["--version"]);
/// ```
pub fn parse(invocation: &[String]) -> Result<ParsedArgs, UsageError> {
    let mut state = State::Options;
    let mut parsed = ParsedArgs::default();

    for token in invocation {
        let options: Vec<GlobalOption> = match classify(token, state) {
            TokenKind::Separator => {
                state = State::Literal;
                continue;
            }
            TokenKind::Ignored => {
                parsed.ignored.push(token.clone());
                continue;
            }
            TokenKind::Positional => {
                parsed.positionals.push(token.clone());
                continue;
            }
            TokenKind::Long(name) => vec![GlobalOption::from_long(name)
                .ok_or_else(|| UsageError::UnrecognizedParameter(token.clone()))?],
            TokenKind::ShortCluster(letters) => letters
                .chars()
                .map(GlobalOption::from_short)
                .collect::<Option<_>>()
                .ok_or_else(|| UsageError::UnrecognizedParameter(token.clone()))?,
        };

        for option in options {
            parsed.options.set(option);
            if option.is_terminal() && parsed.terminal.is_none() {
                parsed.terminal = Some(option);
            }
        }
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn decode_keeps_utf8_tokens() {
        let raw = ["-c", "feature", "start", "fé"].map(OsString::from);
        assert_eq!(decode(raw).unwrap(), ["-c", "feature", "start", "fé"]);
    }

    #[cfg(unix)]
    #[test]
    fn decode_rejects_non_utf8_before_separator() {
        use std::os::unix::ffi::OsStringExt;

        let bad = OsString::from_vec(vec![b'f', 0xff]);
        let raw = vec![OsString::from("feature"), OsString::from("start"), bad];
        assert_eq!(
            decode(raw),
            Err(UsageError::UnrecognizedParameter("f\u{fffd}".into()))
        );
    }

    #[cfg(unix)]
    #[test]
    fn decode_tolerates_non_utf8_after_separator() {
        use std::os::unix::ffi::OsStringExt;

        let bad = OsString::from_vec(vec![b'f', 0xff]);
        let raw = vec![OsString::from("--"), bad];
        assert_eq!(decode(raw).unwrap(), ["--", "f\u{fffd}"]);
    }

    #[test]
    fn classify_tokens() {
        assert_eq!(classify("--", State::Options), TokenKind::Separator);
        assert_eq!(classify("--debug", State::Options), TokenKind::Long("debug"));
        assert_eq!(classify("-co", State::Options), TokenKind::ShortCluster("co"));
        assert_eq!(classify("-", State::Options), TokenKind::Positional);
        assert_eq!(classify("feature", State::Options), TokenKind::Positional);
        assert_eq!(classify("--debug", State::Literal), TokenKind::Ignored);
        assert_eq!(classify("--", State::Literal), TokenKind::Ignored);
    }

    #[test]
    fn short_and_long_forms_share_identity() {
        let short = parse(&args(&["-c", "-o", "-d"])).unwrap();
        let long = parse(&args(&[
            "--print-git-commands",
            "--print-git-output",
            "--debug",
        ]))
        .unwrap();
        assert_eq!(short.options, long.options);
    }

    #[test]
    fn repeated_options_are_idempotent() {
        let parsed = parse(&args(&["-c", "--print-git-commands", "-cc"])).unwrap();
        assert_eq!(
            parsed.options,
            OptionSet {
                print_commands: true,
                ..OptionSet::default()
            }
        );
    }

    #[test]
    fn options_after_positionals() {
        let parsed = parse(&args(&["feature", "start", "-o", "feature1", "-c"])).unwrap();
        assert_eq!(parsed.positionals, ["feature", "start", "feature1"]);
        assert!(parsed.options.print_output);
        assert!(parsed.options.print_commands);
    }

    #[test]
    fn clustered_short_options() {
        let parsed = parse(&args(&["-co"])).unwrap();
        assert!(parsed.options.print_commands);
        assert!(parsed.options.print_output);
    }

    #[test]
    fn unknown_long_option() {
        let err = parse(&args(&["--invalid"])).unwrap_err();
        assert_eq!(err, UsageError::UnrecognizedParameter("--invalid".into()));
        assert_eq!(err.to_string(), "Unrecognized parameter '--invalid'");
    }

    #[test]
    fn cluster_with_unknown_letter_is_rejected_whole() {
        let err = parse(&args(&["-cx"])).unwrap_err();
        assert_eq!(err, UsageError::UnrecognizedParameter("-cx".into()));
    }

    #[test]
    fn version_after_command_is_terminal() {
        let parsed = parse(&args(&["feature", "start", "feature1", "--version"])).unwrap();
        assert_eq!(parsed.terminal, Some(GlobalOption::Version));
    }

    #[test]
    fn invalid_option_after_terminal_is_reported() {
        let err = parse(&args(&["--version", "--bogus"])).unwrap_err();
        assert_eq!(err, UsageError::UnrecognizedParameter("--bogus".into()));

        let err = parse(&args(&["-h", "-cx"])).unwrap_err();
        assert_eq!(err, UsageError::UnrecognizedParameter("-cx".into()));
    }

    #[test]
    fn options_after_separator_do_not_invalidate_terminal() {
        let parsed = parse(&args(&["-V", "--", "--bogus"])).unwrap();
        assert_eq!(parsed.terminal, Some(GlobalOption::Version));
    }

    #[test]
    fn first_terminal_option_wins() {
        let parsed = parse(&args(&["-h", "-V"])).unwrap();
        assert_eq!(parsed.terminal, Some(GlobalOption::Help));

        let parsed = parse(&args(&["-cV"])).unwrap();
        assert_eq!(parsed.terminal, Some(GlobalOption::Version));
        assert!(parsed.options.print_commands);
    }

    #[test]
    fn invalid_option_before_terminal_is_reported() {
        let err = parse(&args(&["--invalid", "--version"])).unwrap_err();
        assert_eq!(err, UsageError::UnrecognizedParameter("--invalid".into()));
    }

    #[test]
    fn separator_disables_options() {
        let parsed = parse(&args(&["--", "--version", "-h", "feature"])).unwrap();
        assert_eq!(parsed.terminal, None);
        assert!(parsed.options.is_empty());
        assert!(parsed.positionals.is_empty());
        assert_eq!(parsed.ignored, ["--version", "-h", "feature"]);
    }

    #[test]
    fn lookup_aliases() {
        assert_eq!(
            GlobalOption::lookup("c"),
            Some((GlobalOption::PrintCommands, AliasForm::Short))
        );
        assert_eq!(
            GlobalOption::lookup("print-git-output"),
            Some((GlobalOption::PrintOutput, AliasForm::Long))
        );
        assert_eq!(GlobalOption::lookup("x"), None);
        assert_eq!(GlobalOption::lookup("verbose"), None);
    }

    #[test]
    fn option_set_display() {
        assert_eq!(OptionSet::default().to_string(), "(none)");
        let parsed = parse(&args(&["-oc"])).unwrap();
        assert_eq!(
            parsed.options.to_string(),
            "--print-git-commands --print-git-output"
        );
    }

    #[test]
    fn missing_messages() {
        assert_eq!(
            UsageError::MissingCommand.to_string(),
            "The feature branch command is required."
        );
        assert_eq!(
            UsageError::MissingSubcommand(CommandType::Feature).to_string(),
            "The feature branch command is required."
        );
        assert_eq!(
            UsageError::MissingArgument {
                command_type: CommandType::Feature,
                argument: "name",
            }
            .to_string(),
            "The feature branch name is required."
        );
    }
}
