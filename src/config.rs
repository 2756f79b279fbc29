use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::AssetConfig;
use crate::dom::Selector;
use crate::error::{Error, Result};

const DEFAULT_SELECTOR: &str = "pre.macro";

/// How a document is scanned and decorated.
///
/// Diagram options are deliberately absent: every instance starts from
/// [`crate::options::DiagramOptions::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// `tag.class` criterion for macro source blocks.
    #[serde(default = "default_selector")]
    pub selector: String,
    /// Only decorate documents whose `<meta name="generator">` has this content.
    #[serde(default)]
    pub generator: Option<String>,
    #[serde(default)]
    pub assets: AssetConfig,
    #[serde(default = "default_inject_stylesheet")]
    pub inject_stylesheet: bool,
}

fn default_selector() -> String {
    DEFAULT_SELECTOR.to_string()
}
fn default_inject_stylesheet() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            generator: None,
            assets: AssetConfig::default(),
            inject_stylesheet: default_inject_stylesheet(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Reads a config file, trying TOML first and YAML second.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match Self::from_toml(&content) {
            Ok(config) => Ok(config),
            Err(toml_error) => Self::from_yaml(&content).map_err(|_| toml_error),
        }
    }

    pub fn selector(&self) -> Result<Selector> {
        self.selector.parse()
    }
}
