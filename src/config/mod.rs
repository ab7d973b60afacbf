//! Configuration management module
//!
//! Handles the optional YAML defaults file and its merge with CLI arguments

pub mod yaml;

use crate::error::PromptError;
use crate::git::GitClient;
use crate::operations::invoke::{DEFAULT_GENERATOR, Encoding, Generator};
use crate::system::System;
use serde::{Deserialize, Serialize};

/// Configuration file looked up when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "./repo2prompt.yaml";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Prompt generator binary name or path
    #[serde(default = "default_generator")]
    pub generator: String,

    /// Git client binary name or path
    #[serde(default = "default_git")]
    pub git: String,

    /// Shallow clone depth
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,

    /// Default generator options, overridden by the command line
    #[serde(default)]
    pub defaults: OptionDefaults,
}

/// Generator options that may be preset in the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub tokens: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
    #[serde(default)]
    pub line_number: bool,
    #[serde(default)]
    pub no_codeblock: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub no_ignore: bool,
}

fn default_generator() -> String {
    return DEFAULT_GENERATOR.to_owned();
}

fn default_git() -> String {
    return "git".to_owned();
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generator: default_generator(),
            git: default_git(),
            depth: None,
            defaults: OptionDefaults::default(),
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// With `explicit_path` the file must exist. Without it the default
    /// file is used when present, built-in defaults otherwise.
    pub fn load(system: &dyn System, explicit_path: Option<&str>) -> anyhow::Result<Self> {
        match explicit_path {
            Some(path) => yaml::load_config(system, path),
            None if system.exists(std::path::Path::new(DEFAULT_CONFIG_FILE)) => {
                yaml::load_config(system, DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    /// Check values serde cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.generator.trim().is_empty() {
            return Err(PromptError::configuration("'generator' cannot be empty").into());
        }
        if self.git.trim().is_empty() {
            return Err(PromptError::configuration("'git' cannot be empty").into());
        }
        if self.depth == Some(0) {
            return Err(PromptError::configuration("'depth' must be at least 1").into());
        }
        Ok(())
    }

    #[must_use]
    pub fn git_client(&self) -> GitClient {
        GitClient::new(self.git.as_str(), self.depth)
    }

    #[must_use]
    pub fn generator(&self) -> Generator {
        Generator::new(self.generator.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockSystem;

    #[test]
    fn defaults_without_file() {
        let system = MockSystem::new();
        let config = Config::load(&system, None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.generator().program, "code2prompt");
        assert_eq!(config.git_client(), GitClient::default());
    }

    #[test]
    fn zero_depth_is_rejected() {
        let config = Config {
            depth: Some(0),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_generator_is_rejected() {
        let config = Config {
            generator: "  ".to_owned(),
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("'generator' cannot be empty"));
    }
}
