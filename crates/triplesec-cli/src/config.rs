use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::constants::DEFAULT_LOG_LEVEL;

/// Contents of `config.toml`. Every section and key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TripleSecConfig {
    pub logging: LoggingSection,
    pub progress: ProgressSection,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// `tracing` filter directive, e.g. `info` or `triplesec_core=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressSection {
    pub enabled: bool,
}

impl Default for ProgressSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Load the config.
///
/// An explicit path (`--config` / `TRIPLESEC_CONFIG`) must exist. The default
/// XDG location is optional: when it is missing, or no home directory can be
/// resolved, defaults are used.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<TripleSecConfig> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    match default_config_path() {
        Ok(path) if path.is_file() => read_config(&path),
        _ => Ok(TripleSecConfig::default()),
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<TripleSecConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("triplesec"));
        }
    }
    Ok(home_dir()?.join(".config").join("triplesec"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = TripleSecConfig::default();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.progress.enabled);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: TripleSecConfig = toml::from_str("[logging]\nformat = \"json\"\n").unwrap();
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "warn");
        assert!(config.progress.enabled);
    }

    #[test]
    fn test_full_file() {
        let config: TripleSecConfig = toml::from_str(
            "[logging]\nlevel = \"debug\"\nformat = \"text\"\n\n[progress]\nenabled = false\n",
        )
        .unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(!config.progress.enabled);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result: Result<TripleSecConfig, _> = toml::from_str("[progress]\nenable = false\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_read_config_reports_parse_errors_with_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging\n").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        assert!(err.to_string().contains("config.toml"));
    }
}
