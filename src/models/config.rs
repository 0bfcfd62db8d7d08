use crate::assets::AssetLoader;
use pixel_grid::{Config, DEFAULT_HISTORY_LIMIT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    /// Conversion settings used when a request leaves a field out
    #[serde(default)]
    pub defaults: Config,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub conversion: ConversionConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Listen address, overridden by BIND_ADDR
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Source image formats accepted for upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadFormat {
    Jpeg,
    Png,
    Webp,
}

impl UploadFormat {
    pub const ALL: [UploadFormat; 3] = [UploadFormat::Jpeg, UploadFormat::Png, UploadFormat::Webp];

    pub fn as_str(&self) -> &'static str {
        match self {
            UploadFormat::Jpeg => "jpeg",
            UploadFormat::Png => "png",
            UploadFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for UploadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Largest accepted upload in bytes
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    #[serde(default = "default_formats")]
    pub formats: Vec<UploadFormat>,
}

fn default_max_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_formats() -> Vec<UploadFormat> {
    UploadFormat::ALL.to_vec()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            formats: default_formats(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    /// Undo snapshots kept per session
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: default_history_limit(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConversionConfig {
    /// Conversions running at once across all sessions
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_max_concurrent() -> usize {
    2
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_concurrent: default_max_concurrent(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    /// Recompress exported PNGs with oxipng
    #[serde(default = "default_optimize")]
    pub optimize: bool,
}

fn default_optimize() -> bool {
    true
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            optimize: default_optimize(),
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => Self::from_yaml(&content),
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse a YAML document, falling back to defaults when it is invalid.
    pub fn from_yaml(content: &str) -> Self {
        match serde_yaml::from_str::<Self>(content) {
            Ok(config) => {
                let config = config.sanitized();
                tracing::info!(
                    bind = %config.server.bind,
                    max_bytes = config.upload.max_bytes,
                    history_limit = config.history.limit,
                    max_concurrent = config.conversion.max_concurrent,
                    "Loaded configuration"
                );
                config
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to parse config, using defaults");
                Self::default()
            }
        }
    }

    /// Replace out-of-range values with their defaults.
    fn sanitized(mut self) -> Self {
        if let Err(e) = self.defaults.validate() {
            tracing::warn!(%e, "Invalid default conversion settings, using built-in defaults");
            self.defaults = Config::default();
        }
        if self.history.limit == 0 {
            tracing::warn!("history.limit must be at least 1, using default");
            self.history.limit = default_history_limit();
        }
        if self.conversion.max_concurrent == 0 {
            tracing::warn!("conversion.max_concurrent must be at least 1, using default");
            self.conversion.max_concurrent = default_max_concurrent();
        }
        if self.upload.max_bytes == 0 {
            tracing::warn!("upload.max_bytes must be at least 1, using default");
            self.upload.max_bytes = default_max_bytes();
        }
        if self.upload.formats.is_empty() {
            tracing::warn!("upload.formats is empty, accepting all formats");
            self.upload.formats = default_formats();
        }
        self
    }

    /// Whether uploads of `format` are accepted
    pub fn accepts(&self, format: UploadFormat) -> bool {
        self.upload.formats.contains(&format)
    }
}
