use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::corpus::chooser::DEFAULT_CHUNK_LINES;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_sample_dir")]
    pub sample_dir: PathBuf,
    #[serde(default = "default_record_path")]
    pub record_path: PathBuf,
    #[serde(default = "default_chunk_lines")]
    pub chunk_lines: usize,
    /// Fetch paragraphs from a chunk server instead of the local corpus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paratype")
}
fn default_sample_dir() -> PathBuf {
    data_dir().join("samples")
}
fn default_record_path() -> PathBuf {
    data_dir().join("record.json")
}
fn default_chunk_lines() -> usize {
    DEFAULT_CHUNK_LINES
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_dir: default_sample_dir(),
            record_path: default_record_path(),
            chunk_lines: default_chunk_lines(),
            source_url: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("paratype")
            .join("config.toml")
    }

    /// Clamp values a hand-edited file may have broken.
    pub fn validate(&mut self) {
        if self.chunk_lines == 0 {
            self.chunk_lines = 1;
        }
        if self.source_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            self.source_url = None;
        }
        if self.log_level.trim().is_empty() {
            self.log_level = default_log_level();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.chunk_lines, 15);
        assert_eq!(config.source_url, None);
        assert_eq!(config.log_level, "warn");
        assert!(config.record_path.ends_with("record.json"));
        assert!(config.sample_dir.ends_with("samples"));
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
sample_dir = "/srv/samples/use"
chunk_lines = 20
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sample_dir, PathBuf::from("/srv/samples/use"));
        assert_eq!(config.chunk_lines, 20);
        assert!(config.record_path.ends_with("record.json"));
    }

    #[test]
    fn test_config_save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            source_url: Some("http://localhost:8080/paragraph".to_string()),
            chunk_lines: 10,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_config_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_config_file_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "chunk_lines = \"many\"").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn test_validate_clamps_values() {
        let mut config = Config {
            chunk_lines: 0,
            source_url: Some("  ".to_string()),
            log_level: String::new(),
            ..Config::default()
        };
        config.validate();
        assert_eq!(config.chunk_lines, 1);
        assert_eq!(config.source_url, None);
        assert_eq!(config.log_level, "warn");
    }
}
