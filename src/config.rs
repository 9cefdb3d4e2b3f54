use crate::{ids, paths};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub disabled_providers: Vec<String>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub start_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).context("Failed to read config.toml")?;
        let config: AppConfig = toml::from_str(&content).context("Failed to parse config.toml")?;
        Ok(config)
    }

    pub fn is_provider_disabled(&self, id: &str) -> bool {
        self.disabled_providers.iter().any(|d| ids::same_id(d, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_from_returns_default_when_file_missing() {
        // Arrange
        let temp_dir = TempDir::new().unwrap();

        // Act
        let config = AppConfig::load_from(&temp_dir.path().join("config.toml")).unwrap();

        // Assert
        assert!(config.disabled_providers.is_empty());
        assert!(!config.read_only);
        assert!(config.start_dir.is_none());
    }

    #[test]
    fn load_from_parses_all_fields() {
        // Arrange
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
disabled_providers = ["ssh"]
read_only = true
start_dir = "/srv/data"
"#,
        )
        .unwrap();

        // Act
        let config = AppConfig::load_from(&path).unwrap();

        // Assert
        assert_eq!(config.disabled_providers, vec!["ssh".to_string()]);
        assert!(config.read_only);
        assert_eq!(config.start_dir, Some(PathBuf::from("/srv/data")));
    }

    #[test]
    fn load_from_rejects_invalid_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "not valid toml {{{").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn is_provider_disabled_ignores_case() {
        let config = AppConfig {
            disabled_providers: vec!["SSH".to_string()],
            ..Default::default()
        };

        let cases = [("ssh", true), ("Ssh", true), ("SSH", true), ("local", false)];

        for (id, expected) in cases {
            assert_eq!(config.is_provider_disabled(id), expected, "id: {}", id);
        }
    }

    #[test]
    fn is_provider_disabled_folds_non_ascii_ids() {
        let config = AppConfig {
            disabled_providers: vec!["ÜBERSTORE".to_string()],
            ..Default::default()
        };

        let cases = [("überstore", true), ("Überstore", true), ("uberstore", false)];

        for (id, expected) in cases {
            assert_eq!(config.is_provider_disabled(id), expected, "id: {}", id);
        }
    }
}
