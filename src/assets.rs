//! Configuration loading with an embedded fallback
//!
//! - If no config path is given: use the embedded `config.yaml`
//! - If a path is given and the file exists: read it from the filesystem
//! - If a path is given but missing: fall back to the embedded file

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

const CONFIG_NAME: &str = "config.yaml";

/// Loader for the application config file
#[derive(Debug, Clone, Default)]
pub struct AssetLoader {
    /// External config file path (from `--config` or the CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new loader.
    ///
    /// `None` means embedded config only.
    pub fn new(config_file: Option<PathBuf>) -> Self {
        Self { config_file }
    }

    /// Path of the external config file, if one was configured.
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Whether the config is read from the filesystem.
    pub fn uses_external_config(&self) -> bool {
        self.config_file.as_ref().is_some_and(|p| p.exists())
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
            tracing::warn!(path = %path.display(), "Config file not found, using embedded config");
        }

        Self::embedded_config().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Embedded config.yaml not found")
        })
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// The embedded default `config.yaml`.
    pub fn embedded_config() -> Option<Cow<'static, [u8]>> {
        EmbeddedConfig::get(CONFIG_NAME).map(|f| {
            tracing::trace!("Loading config from embedded assets");
            f.data
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_config_present() {
        let loader = AssetLoader::new(None);
        let content = loader.read_config_string().unwrap();
        assert!(content.contains("max_concurrent"));
        assert!(!loader.uses_external_config());
    }

    #[test]
    fn test_external_config_preferred() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "history:\n  limit: 7").unwrap();

        let loader = AssetLoader::new(Some(file.path().to_path_buf()));
        assert!(loader.uses_external_config());
        assert_eq!(loader.read_config_string().unwrap().trim(), "history:\n  limit: 7");
    }

    #[test]
    fn test_missing_external_falls_back() {
        let loader = AssetLoader::new(Some(PathBuf::from("/nonexistent/knemo.yaml")));
        assert!(!loader.uses_external_config());
        assert!(loader.read_config_string().unwrap().contains("upload"));
    }
}
