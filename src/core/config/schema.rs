//! core::config::schema
//!
//! Configuration file schema.
//!
//! The same schema is used for the global and the repository file.
//!
//! # Validation
//!
//! Unknown keys are rejected at parse time. Option keys and the feature
//! prefix are validated after parsing, see [`FileConfig::validate`].

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{ConfigError, OptionOverrides};
use crate::core::types::BranchName;

/// One configuration file.
///
/// # Example
///
/// ```toml
/// [options]
/// print-git-commands = true
/// o = true
///
/// [feature]
/// prefix = "feature/"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Defaults for global options, keyed by long or short alias.
    pub options: BTreeMap<String, bool>,

    /// Feature workflow settings
    pub feature: FeatureConfig,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an unknown or non-settable
    /// option or an unusable prefix, and `ConfigError::ConflictingAliases` if
    /// an option is given under both of its aliases.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.option_overrides()?;
        self.feature.validate()
    }

    /// The option defaults this file supplies.
    pub fn option_overrides(&self) -> Result<OptionOverrides, ConfigError> {
        OptionOverrides::from_structured(self.options.iter().map(|(k, v)| (k.as_str(), *v)))
    }
}

/// Feature workflow settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FeatureConfig {
    /// Prepended to the name given to `feature start`, e.g. `feature/`.
    pub prefix: Option<String>,
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(prefix) = self.prefix.as_deref().filter(|p| !p.is_empty()) else {
            return Ok(());
        };
        BranchName::new(format!("{prefix}x")).map_err(|e| {
            ConfigError::InvalidValue(format!("invalid feature prefix '{prefix}': {e}"))
        })?;
        Ok(())
    }
}
