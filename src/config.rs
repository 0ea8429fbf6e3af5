//! Bridge configuration, loaded from TOML
//!
//! ```toml
//! default_module = "extension"
//! on_collision = "reject"
//! ```

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "PRIMBRIDGE_CONFIG";

/// Module used when a primitive is registered without one
pub const DEFAULT_MODULE: &str = "extension";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_module")]
    pub default_module: String,

    #[serde(default)]
    pub on_collision: CollisionPolicy,
}

/// What to do when `(module, name)` is registered a second time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Fail the second registration, keeping the first binding
    #[default]
    Reject,
    /// The newer binding shadows the older one
    Replace,
}

fn default_module() -> String {
    DEFAULT_MODULE.to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_module: default_module(),
            on_collision: CollisionPolicy::default(),
        }
    }
}

impl BridgeConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from the file named by `PRIMBRIDGE_CONFIG`, or defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
