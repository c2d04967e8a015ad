//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! git-rflow has two configuration scopes:
//! - **Global**: User-level settings
//! - **Repo**: Repository-level overrides
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here; a flag given on the command line is
//!    always on)
//!
//! # Global Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$GIT_RFLOW_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/git-rflow/config.toml`
//! 3. `~/.git-rflow/config.toml`
//!
//! # Repo Config Location
//!
//! `<git-dir>/rflow/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use git_rflow::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/repo/.git"))).unwrap();
//! println!("Feature prefix: '{}'", config.feature_prefix());
//! ```

pub mod schema;

pub use schema::{FeatureConfig, FileConfig};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::cli::args::{AliasForm, GlobalOption, OptionSet};

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    /// Both aliases of one option were supplied in the same option table.
    #[error("cannot specify both '{long}' and '{short}'")]
    ConflictingAliases { long: &'static str, short: char },
}

/// Option defaults supplied by configuration.
///
/// `None` means "not configured here"; a lower layer or the built-in
/// default (off) applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub print_commands: Option<bool>,
    pub print_output: Option<bool>,
    pub debug: Option<bool>,
}

impl OptionOverrides {
    /// Build overrides from structured `(alias, value)` entries.
    ///
    /// Each entry may use either alias of an option, but not both for the
    /// same option.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ConflictingAliases`] if an option is given under its
    ///   long and its short alias
    /// - [`ConfigError::InvalidValue`] for unknown aliases and for help and
    ///   version, which cannot be configured
    ///
    /// # Example
    ///
    /// ```
    /// use git_rflow::core::config::{ConfigError, OptionOverrides};
    ///
    /// let ok = OptionOverrides::from_structured([("c", true), ("print-git-output", true)])
    ///     .unwrap();
    /// assert_eq!(ok.print_commands, Some(true));
    ///
    /// let err = OptionOverrides::from_structured([("c", true), ("print-git-commands", true)]);
    /// assert!(matches!(err, Err(ConfigError::ConflictingAliases { .. })));
    /// ```
    pub fn from_structured<'k>(
        entries: impl IntoIterator<Item = (&'k str, bool)>,
    ) -> Result<Self, ConfigError> {
        let mut seen: HashMap<GlobalOption, AliasForm> = HashMap::new();
        let mut overrides = Self::default();

        for (alias, value) in entries {
            let (option, form) = GlobalOption::lookup(alias)
                .ok_or_else(|| ConfigError::InvalidValue(format!("unknown option '{alias}'")))?;

            if let Some(previous) = seen.insert(option, form) {
                if previous != form {
                    return Err(ConfigError::ConflictingAliases {
                        long: option.long(),
                        short: option.short(),
                    });
                }
            }

            let slot = match option {
                GlobalOption::PrintCommands => &mut overrides.print_commands,
                GlobalOption::PrintOutput => &mut overrides.print_output,
                GlobalOption::Debug => &mut overrides.debug,
                GlobalOption::Help | GlobalOption::Version => {
                    return Err(ConfigError::InvalidValue(format!(
                        "option '{alias}' cannot be set in configuration"
                    )));
                }
            };
            *slot = Some(value);
        }

        Ok(overrides)
    }

    /// Layer `over` on top of `self`.
    pub fn layered(self, over: Self) -> Self {
        Self {
            print_commands: over.print_commands.or(self.print_commands),
            print_output: over.print_output.or(self.print_output),
            debug: over.debug.or(self.debug),
        }
    }

    /// Combine with command-line options. Command-line flags win.
    pub fn apply(self, cli: &OptionSet) -> OptionSet {
        OptionSet {
            print_commands: cli.print_commands || self.print_commands.unwrap_or(false),
            print_output: cli.print_output || self.print_output.unwrap_or(false),
            debug: cli.debug || self.debug.unwrap_or(false),
            ..*cli
        }
    }
}

/// Merged configuration from all sources.
#[derive(Debug, Clone, Default)]
pub struct Config {
    options: OptionOverrides,
    feature_prefix: Option<String>,
    sources: Vec<PathBuf>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `git_dir` is provided, also loads the repository config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be read, parsed or
    /// validated. Missing config files are not an error (defaults are used).
    pub fn load(git_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let global = Self::global_config_path();
        let repo = git_dir.map(Self::repo_config_path);
        Self::load_from(global.as_deref(), repo.as_deref())
    }

    /// Load configuration from explicit file paths. Paths that do not exist
    /// are skipped.
    pub fn load_from(global: Option<&Path>, repo: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        for path in [global, repo].into_iter().flatten() {
            if path.exists() {
                let file = Self::read_config(path)?;
                config.layer(&file)?;
                config.sources.push(path.to_path_buf());
            }
        }
        Ok(config)
    }

    /// Layer a parsed file on top of the current values.
    pub fn layer(&mut self, file: &FileConfig) -> Result<(), ConfigError> {
        file.validate()?;
        self.options = self.options.layered(file.option_overrides()?);
        if let Some(prefix) = &file.feature.prefix {
            self.feature_prefix = Some(prefix.clone());
        }
        Ok(())
    }

    /// Find the global config file, if any.
    fn global_config_path() -> Option<PathBuf> {
        let candidates = [
            std::env::var_os("GIT_RFLOW_CONFIG").map(PathBuf::from),
            std::env::var_os("XDG_CONFIG_HOME")
                .map(|xdg| PathBuf::from(xdg).join("git-rflow/config.toml")),
            dirs::home_dir().map(|home| home.join(".git-rflow/config.toml")),
        ];
        candidates.into_iter().flatten().find(|path| path.exists())
    }

    /// The repository config path for `git_dir`.
    pub fn repo_config_path(git_dir: &Path) -> PathBuf {
        git_dir.join("rflow/config.toml")
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<FileConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn options(&self) -> OptionOverrides {
        self.options
    }

    /// Prefix for new feature branches (empty by default).
    pub fn feature_prefix(&self) -> &str {
        self.feature_prefix.as_deref().unwrap_or("")
    }

    /// Files that contributed to this configuration, lowest precedence first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_files_give_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(Some(&dir.path().join("nope.toml")), None).unwrap();
        assert_eq!(config.options(), OptionOverrides::default());
        assert_eq!(config.feature_prefix(), "");
        assert!(config.sources().is_empty());
    }

    #[test]
    fn repo_overrides_global() {
        let dir = TempDir::new().unwrap();
        let global = write(
            &dir,
            "global.toml",
            "[options]\nprint-git-commands = true\nd = true\n[feature]\nprefix = \"feature/\"\n",
        );
        let repo = write(&dir, "repo.toml", "[options]\nc = false\n");

        let config = Config::load_from(Some(&global), Some(&repo)).unwrap();
        assert_eq!(
            config.options(),
            OptionOverrides {
                print_commands: Some(false),
                print_output: None,
                debug: Some(true),
            }
        );
        assert_eq!(config.feature_prefix(), "feature/");
        assert_eq!(config.sources(), &[global, repo]);
    }

    #[test]
    fn both_aliases_in_one_table_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "c.toml", "[options]\nc = true\nprint-git-commands = true\n");
        let err = Config::load_from(Some(&path), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot specify both 'print-git-commands' and 'c'"
        );
    }

    #[test]
    fn aliases_may_differ_between_layers() {
        let dir = TempDir::new().unwrap();
        let global = write(&dir, "g.toml", "[options]\no = true\n");
        let repo = write(&dir, "r.toml", "[options]\nprint-git-output = false\n");
        let config = Config::load_from(Some(&global), Some(&repo)).unwrap();
        assert_eq!(config.options().print_output, Some(false));
    }

    #[test]
    fn terminal_options_cannot_be_configured() {
        let err = OptionOverrides::from_structured([("version", true)]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn unknown_option_key_is_rejected() {
        let err = OptionOverrides::from_structured([("verbose", true)]).unwrap_err();
        assert_eq!(err.to_string(), "invalid config value: unknown option 'verbose'");
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad.toml", "[options\n");
        let err = Config::load_from(None, Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn command_line_flags_win() {
        let overrides = OptionOverrides {
            print_commands: Some(false),
            print_output: Some(true),
            debug: None,
        };
        let cli = OptionSet {
            print_commands: true,
            ..OptionSet::default()
        };
        let merged = overrides.apply(&cli);
        assert!(merged.print_commands);
        assert!(merged.print_output);
        assert!(!merged.debug);
    }

    #[test]
    fn repo_config_lives_under_git_dir() {
        assert_eq!(
            Config::repo_config_path(Path::new("/repo/.git")),
            PathBuf::from("/repo/.git/rflow/config.toml")
        );
    }
}
