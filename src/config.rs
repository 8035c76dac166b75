//! Server configuration
//!
//! Layers, each overriding the previous one:
//! 1. built-in defaults
//! 2. `.newline-doubler.yaml` in the workspace root
//! 3. `initializationOptions` sent by the client

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::transform::LineEndingPolicy;

/// Name of the workspace config file
pub const CONFIG_FILE_NAME: &str = ".newline-doubler.yaml";

/// Effective configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    pub line_endings: LineEndingPolicy,
}

/// One configuration layer; absent fields leave the lower layer in place
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigLayer {
    line_endings: Option<LineEndingPolicy>,
}

impl Config {
    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(line_endings) = layer.line_endings {
            self.line_endings = line_endings;
        }
    }

    /// Apply `.newline-doubler.yaml` from `root`, if the file exists
    pub fn load_workspace_file(&mut self, root: &Path) -> Result<Option<PathBuf>, ConfigError> {
        let path = root.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        if contents.trim().is_empty() {
            return Ok(Some(path));
        }
        let layer: ConfigLayer =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Yaml {
                path: path.clone(),
                source,
            })?;
        self.merge(layer);

        Ok(Some(path))
    }

    /// Apply the client's `initializationOptions`
    pub fn apply_options(&mut self, options: serde_json::Value) -> Result<(), ConfigError> {
        if options.is_null() {
            return Ok(());
        }
        let layer: ConfigLayer = serde_json::from_value(options)?;
        self.merge(layer);
        Ok(())
    }

    /// Build the effective configuration, logging and skipping broken layers
    pub fn resolve(root: Option<&Path>, options: Option<serde_json::Value>) -> Self {
        let mut config = Self::default();

        if let Some(root) = root {
            match config.load_workspace_file(root) {
                Ok(Some(path)) => tracing::info!("Loaded config from {}", path.display()),
                Ok(None) => {}
                Err(err) => tracing::warn!("Ignoring workspace config: {}", err),
            }
        }

        if let Some(options) = options {
            if let Err(err) = config.apply_options(options) {
                tracing::warn!("Ignoring initialization options: {}", err);
            }
        }

        config
    }
}
