//! YAML configuration loading and parsing

use crate::config::Config;
use crate::error::PromptError;
use crate::system::System;
use anyhow::Result;
use std::path::Path;
use tracing::debug;

/// Load and parse YAML configuration from file
pub fn load_config(system: &dyn System, path: &str) -> Result<Config> {
    let path_obj = Path::new(path);

    if !system.exists(path_obj) {
        return Err(PromptError::configuration(format!(
            "Configuration file not found: {path}"
        ))
        .into());
    }

    let content = system.read_to_string(path_obj).map_err(|e| {
        PromptError::configuration(format!("Failed to read configuration file {path}: {e}"))
    })?;

    let config = if content.trim().is_empty() {
        Config::default()
    } else {
        serde_yaml::from_str::<Config>(&content).map_err(|e| {
            PromptError::configuration(format!(
                "Failed to parse YAML configuration in file {path}: {e}"
            ))
        })?
    };

    config.validate()?;

    debug!("Loaded configuration from {path}");
    Ok(config)
}
