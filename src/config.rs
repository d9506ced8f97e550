//! Estimator configuration
//!
//! Where the archive lives and which economic assumptions to use. Read from
//! a YAML file; every key is optional and falls back to its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analytics::{AnalyticsError, EconomicAssumptions, EconomicModel};
use crate::archive::DEFAULT_SNAPSHOT_PATH;

/// GitHub archive of the McBroken site
pub const DEFAULT_ARCHIVE_URL: &str = "https://github.com/rashiq/mcbroken-archive";

/// Local clone location, relative to the working directory
pub const DEFAULT_CACHE_DIR: &str = "data/mcbroken-archive";

/// Branch the archive commits snapshots to
pub const DEFAULT_BRANCH: &str = "main";

/// Config file looked up in the working directory when none is given
pub const CONFIG_FILENAME: &str = "mcbroken.yaml";

/// Directory inside the cache that retained snapshots are written to
const EXTRACT_DIRNAME: &str = "retrieved";

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Economics(#[from] AnalyticsError),
}

/// Estimator configuration
///
/// Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Remote archive URL (anything `git clone` accepts)
    #[serde(default = "default_archive_url")]
    pub archive_url: String,

    /// Where the archive clone is cached
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Branch holding the snapshot history
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Snapshot file inside each commit
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,

    /// Keep a copy of every extracted snapshot under `<cache_dir>/retrieved`
    #[serde(default)]
    pub retain_extracted: bool,

    /// Economic model assumptions
    #[serde(default)]
    pub economics: EconomicAssumptions,
}

fn default_archive_url() -> String {
    DEFAULT_ARCHIVE_URL.to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CACHE_DIR)
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

fn default_snapshot_path() -> String {
    DEFAULT_SNAPSHOT_PATH.to_string()
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            archive_url: default_archive_url(),
            cache_dir: default_cache_dir(),
            branch: default_branch(),
            snapshot_path: default_snapshot_path(),
            retain_extracted: false,
            economics: EconomicAssumptions::default(),
        }
    }
}

impl EstimatorConfig {
    /// Loads an explicitly named config file; a missing file is an error
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Loads `mcbroken.yaml` from `dir`, or the defaults when it is absent
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(dir);
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::load(&config_path)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        // An empty file is a valid, all-defaults config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Full path of the config file inside `dir`
    pub fn get_config_path(dir: &Path) -> PathBuf {
        dir.join(CONFIG_FILENAME)
    }

    /// Builds the economic model, validating the assumptions
    pub fn economic_model(&self) -> Result<EconomicModel, ConfigError> {
        Ok(EconomicModel::new(self.economics)?)
    }

    /// Directory for retained snapshots, when retention is on
    pub fn extract_dir(&self) -> Option<PathBuf> {
        self.retain_extracted
            .then(|| self.cache_dir.join(EXTRACT_DIRNAME))
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = EstimatorConfig::default();
        assert_eq!(config.archive_url, DEFAULT_ARCHIVE_URL);
        assert_eq!(config.cache_dir, PathBuf::from("data/mcbroken-archive"));
        assert_eq!(config.branch, "main");
        assert_eq!(config.snapshot_path, "mcbroken.json");
        assert!(!config.retain_extracted);
        assert_eq!(config.extract_dir(), None);
    }

    #[test]
    fn test_load_from_dir_without_file() {
        let dir = tempdir().unwrap();
        let config = EstimatorConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config, EstimatorConfig::default());
    }

    #[test]
    fn test_load_partial_config() {
        let dir = tempdir().unwrap();
        fs::write(
            EstimatorConfig::get_config_path(dir.path()),
            "cache_dir: /var/cache/mcbroken\nretain_extracted: true\neconomics:\n  dessert_share: 0.25\n",
        )
        .unwrap();

        let config = EstimatorConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.cache_dir, PathBuf::from("/var/cache/mcbroken"));
        assert_eq!(config.branch, "main");
        assert_eq!(config.economics.dessert_share, 0.25);
        assert_eq!(config.economics.ice_cream_share, 0.6);
        assert_eq!(
            config.extract_dir(),
            Some(PathBuf::from("/var/cache/mcbroken/retrieved"))
        );
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.yaml");
        fs::write(&path, "\n").unwrap();
        assert_eq!(EstimatorConfig::load(&path).unwrap(), EstimatorConfig::default());
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempdir().unwrap();
        let result = EstimatorConfig::load(&dir.path().join("nope.yaml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_invalid_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "economics: [1, 2").unwrap();
        assert!(matches!(EstimatorConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_rejects_misspelt_keys() {
        let dir = tempdir().unwrap();

        let path = dir.path().join("top.yaml");
        fs::write(&path, "econmics:\n  dessert_share: 0.25\n").unwrap();
        assert!(matches!(EstimatorConfig::load(&path), Err(ConfigError::Parse { .. })));

        let path = dir.path().join("nested.yaml");
        fs::write(&path, "economics:\n  dessert_shar: 0.25\n").unwrap();
        assert!(matches!(EstimatorConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_economic_model_validation() {
        let mut config = EstimatorConfig::default();
        assert!(config.economic_model().is_ok());

        config.economics.visitors_per_day = -1.0;
        assert!(matches!(config.economic_model(), Err(ConfigError::Economics(_))));
    }
}
