//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Optional TOML file
//! 3. Environment variables: `NAMETREE_*` prefix

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::errors::{TreeError, TreeResult};

/// Settings for building a [`Tree`](crate::tree::Tree).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Name of the root node (default: the DNS root `.`)
    pub origin: String,
    /// Reject malformed names on insert (default: false)
    pub validate_names: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            origin: ".".into(),
            validate_names: false,
        }
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `path` - Optional TOML file; it must exist when given
    pub fn load(path: Option<&Path>) -> TreeResult<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("origin", defaults.origin)
            .map_err(config_err)?
            .set_default("validate_names", defaults.validate_names)
            .map_err(config_err)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder
            .add_source(Environment::with_prefix("NAMETREE").try_parsing(true))
            .build()
            .map_err(config_err)?
            .try_deserialize()
            .map_err(config_err)
    }

    /// Parse settings from a TOML string, without environment overrides.
    pub fn from_toml_str(content: &str) -> TreeResult<Self> {
        toml::from_str(content).map_err(|e| TreeError::Config {
            message: format!("parse settings: {}", e),
        })
    }
}

fn config_err(e: config::ConfigError) -> TreeError {
    TreeError::Config {
        message: e.to_string(),
    }
}
