// ⚙️ Configuration - defaults, optional TOML file, CLI overrides on top

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File picked up from the working directory when no --config is given
pub const DEFAULT_CONFIG_FILE: &str = "pipeline.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// SQLite database holding raw_data, charges and companies
    pub database_path: PathBuf,

    /// Run SQLite in WAL journal mode
    pub wal: bool,

    /// Field delimiter for input and export files
    pub delimiter: char,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            database_path: PathBuf::from("pipeline.db"),
            wal: true,
            delimiter: ',',
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content).context("Invalid configuration")?;
        config.delimiter_byte()?;
        Ok(config)
    }

    /// Load from `path`, or from `pipeline.toml` if it exists, or defaults.
    ///
    /// An explicit path that cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(PipelineConfig::default());
                }
                default
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config file '{}'", path.display()))
    }

    /// Delimiter as the single byte the csv crate expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!("Delimiter must be a single ASCII character, got {:?}", self.delimiter);
        }
        Ok(self.delimiter as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.delimiter_byte().unwrap(), b',');
    }

    #[test]
    fn test_partial_override() {
        let config = PipelineConfig::from_toml_str(
            "database_path = \"/tmp/charges.db\"\ndelimiter = \";\"\n",
        )
        .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/charges.db"));
        assert_eq!(config.delimiter_byte().unwrap(), b';');
        assert!(config.wal);
    }

    #[test]
    fn test_rejects_unknown_keys_and_bad_delimiter() {
        assert!(PipelineConfig::from_toml_str("datbase = \"x\"").is_err());
        assert!(PipelineConfig::from_toml_str("delimiter = \"§\"").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        fs::write(&path, "wal = false\n").unwrap();

        let config = PipelineConfig::load(Some(&path)).unwrap();
        assert!(!config.wal);

        assert!(PipelineConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
