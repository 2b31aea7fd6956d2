//! Editor configuration.
//!
//! Settings live in a TOML file under the user config directory. Every
//! field has a default and missing fields are filled in, so old config
//! files keep working; a malformed file degrades to the defaults. The
//! syntax highlighting rules are a separate JSON document (see
//! `quill_syntax::SyntaxConfig`) whose path this module also resolves.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use quill_syntax::SyntaxConfig;

/// Main editor configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// File handling settings
    pub files: FileConfig,

    /// Compile service settings
    pub compile: CompileConfig,
}

impl EditorConfig {
    /// Loads config from the default location, degrading to defaults.
    pub fn load() -> Self {
        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|error| {
                tracing::warn!(path = %path.display(), %error, "using default configuration");
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    /// Loads config from a file.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Returns the default config file path.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("quill").join("config.toml"))
    }

    /// Returns the path of the user's syntax configuration document.
    pub fn syntax_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("quill").join("syntax.json"))
    }

    /// Loads the syntax configuration: the user's document when present,
    /// the built-in rules otherwise. Never fails.
    pub fn load_syntax() -> SyntaxConfig {
        let path = Self::syntax_path().ok();
        SyntaxConfig::load_or_builtin(path.as_deref())
    }

    /// Saves the config to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::default_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

/// File handling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Auto-save dirty buffers on a timer
    pub auto_save: bool,

    /// Auto-save interval in seconds
    pub auto_save_secs: u64,

    /// Directory names hidden from the workspace tree
    pub exclude_dirs: Vec<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            auto_save: true,
            auto_save_secs: 30,
            exclude_dirs: vec![
                ".git".to_string(),
                "node_modules".to_string(),
                "target".to_string(),
                "__pycache__".to_string(),
            ],
        }
    }
}

/// Compile service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Compile endpoint URL
    pub service_url: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:5000/compile".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config directory not found")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert!(config.files.auto_save);
        assert_eq!(config.files.auto_save_secs, 30);
        assert_eq!(config.compile.service_url, "http://localhost:5000/compile");
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = EditorConfig::default();
        let toml = toml::to_string(&config).unwrap();
        let parsed: EditorConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.files.auto_save_secs, config.files.auto_save_secs);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let parsed: EditorConfig = toml::from_str("[files]\nauto_save = false\n").unwrap();
        assert!(!parsed.files.auto_save);
        assert_eq!(parsed.files.auto_save_secs, 30);
    }

    #[test]
    fn test_malformed_config_degrades_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "auto_save = [broken").unwrap();
        assert!(EditorConfig::load_from(&path).is_err());
    }
}
