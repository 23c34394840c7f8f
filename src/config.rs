//! Configuration types for clone-provisioner

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for [`BatchProvisioner`]
///
/// All paths are explicit values fixed at construction; there are no ambient
/// globals or environment variables. Fields have sensible defaults matching a
/// local working directory layout, so a config file only needs to override
/// what differs.
///
/// [`BatchProvisioner`]: crate::provisioner::BatchProvisioner
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// File listing source links, one per line (blank lines ignored)
    #[serde(default = "default_links_file")]
    pub links_file: PathBuf,

    /// Pre-existing template directory copied verbatim for every clone
    ///
    /// Read-only to this system.
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    /// Destination root; one clone directory is created under it per link
    #[serde(default = "default_clone_root")]
    pub clone_root: PathBuf,

    /// Shared temporary directory for downloaded archives and extraction
    ///
    /// Created at run start, deleted entirely on full-run success.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Progress ledger file (one completed clone name per line)
    ///
    /// Absent file means no prior progress; deleted on full-run success.
    #[serde(default = "default_ledger_file")]
    pub ledger_file: PathBuf,

    /// Path to the external downloader executable
    ///
    /// When `None`, the binary is auto-discovered from PATH at construction.
    #[serde(default)]
    pub downloader_path: Option<PathBuf>,

    /// Base name for clone directories
    ///
    /// The first link uses the base name as-is; subsequent links append a
    /// 1-based ordinal starting at 2 (e.g., "Telegram", "Telegram2", ...).
    #[serde(default = "default_clone_base_name")]
    pub clone_base_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            links_file: default_links_file(),
            template_dir: default_template_dir(),
            clone_root: default_clone_root(),
            temp_dir: default_temp_dir(),
            ledger_file: default_ledger_file(),
            downloader_path: None,
            clone_base_name: default_clone_base_name(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Validate that the configuration points at usable inputs
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if:
    /// - the links file does not exist
    /// - the template directory does not exist or is not a directory
    /// - the clone base name is empty
    pub fn validate(&self) -> Result<()> {
        if !self.links_file.is_file() {
            return Err(Error::Config {
                message: format!("links file not found: {}", self.links_file.display()),
                key: Some("links_file".to_string()),
            });
        }

        if !self.template_dir.is_dir() {
            return Err(Error::Config {
                message: format!(
                    "template directory not found: {}",
                    self.template_dir.display()
                ),
                key: Some("template_dir".to_string()),
            });
        }

        if self.clone_base_name.is_empty() {
            return Err(Error::Config {
                message: "clone base name must not be empty".to_string(),
                key: Some("clone_base_name".to_string()),
            });
        }

        Ok(())
    }
}

fn default_links_file() -> PathBuf {
    PathBuf::from("./links.txt")
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("./Telegram")
}

fn default_clone_root() -> PathBuf {
    PathBuf::from("./clones")
}

fn default_temp_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_ledger_file() -> PathBuf {
    PathBuf::from("./progress.txt")
}

fn default_clone_base_name() -> String {
    "Telegram".to_string()
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn valid_config(dir: &TempDir) -> Config {
        let links_file = dir.path().join("links.txt");
        let template_dir = dir.path().join("Telegram");
        std::fs::write(&links_file, "https://example.test/a\n").unwrap();
        std::fs::create_dir(&template_dir).unwrap();

        Config {
            links_file,
            template_dir,
            clone_root: dir.path().join("clones"),
            temp_dir: dir.path().join("downloads"),
            ledger_file: dir.path().join("progress.txt"),
            downloader_path: None,
            clone_base_name: "Telegram".to_string(),
        }
    }

    #[test]
    fn validate_accepts_existing_inputs() {
        let dir = TempDir::new().unwrap();
        let config = valid_config(&dir);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_links_file() {
        let dir = TempDir::new().unwrap();
        let mut config = valid_config(&dir);
        config.links_file = dir.path().join("nope.txt");

        let err = config.validate().unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("links_file")),
            other => panic!("expected Config error, got: {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_missing_template_dir() {
        let dir = TempDir::new().unwrap();
        let mut config = valid_config(&dir);
        config.template_dir = dir.path().join("missing");

        let err = config.validate().unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some("template_dir")),
            other => panic!("expected Config error, got: {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_empty_base_name() {
        let dir = TempDir::new().unwrap();
        let mut config = valid_config(&dir);
        config.clone_base_name = String::new();

        assert!(config.validate().is_err());
    }

    #[test]
    fn from_file_applies_defaults_for_missing_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"clone_base_name": "Session"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.clone_base_name, "Session");
        assert_eq!(config.temp_dir, PathBuf::from("./downloads"));
        assert_eq!(config.ledger_file, PathBuf::from("./progress.txt"));
    }

    #[test]
    fn from_file_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(Error::Serialization(_))
        ));
    }
}
