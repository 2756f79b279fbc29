use serde::{Deserialize, Serialize};

/// Static files shipped alongside the generated markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Options,
    Fullscreen,
    Stylesheet,
}

impl Asset {
    pub fn file_name(self) -> &'static str {
        match self {
            Asset::Options => "options.svg",
            Asset::Fullscreen => "fullscreen.svg",
            Asset::Stylesheet => "macro_railroad_ext.css",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    /// Prefix the asset names are resolved against; empty means relative.
    #[serde(default)]
    pub base: String,
}

impl AssetConfig {
    pub fn url(&self, asset: Asset) -> String {
        if self.base.is_empty() {
            return asset.file_name().to_string();
        }
        format!("{}/{}", self.base.trim_end_matches('/'), asset.file_name())
    }
}
