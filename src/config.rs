use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ModtagError, Result};

fn default_version_prefix() -> String {
    "v".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Caller-visible options for one invocation. Constructed once and never
/// mutated afterwards.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    /// Prepended to numeric versions when forming and matching tags
    #[serde(default = "default_version_prefix")]
    pub version_prefix: String,

    /// Modules to ignore during discovery, by import path or exact
    /// relative path
    #[serde(default)]
    pub exclude_modules: Vec<String>,

    /// Keep 0.x modules at 0.x even on breaking changes
    #[serde(default)]
    pub pre_major: bool,

    /// Write tags after computing them
    #[serde(default)]
    pub create_tag: bool,

    /// Push created tags
    #[serde(default)]
    pub push: bool,

    /// Remote that receives pushed tags
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version_prefix: default_version_prefix(),
            exclude_modules: Vec::new(),
            pre_major: false,
            create_tag: false,
            push: false,
            remote: default_remote(),
        }
    }
}

/// Load configuration from an explicit path, falling back to
/// `./modtag.toml`, then `<config dir>/modtag.toml`, then the defaults.
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let text = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./modtag.toml").exists() {
        fs::read_to_string("./modtag.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let path = config_dir.join("modtag.toml");
        if path.exists() {
            fs::read_to_string(path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&text).map_err(|e| ModtagError::config(e.to_string()))
}
