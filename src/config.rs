//! Searcher configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::SearchAlgorithm;

/// Index file used when no path is configured.
pub const DEFAULT_INDEX_PATH: &str = "ip2region.db";

/// Where the index lives and which algorithm `find` uses.
///
/// Missing keys fall back to their defaults, so an empty document is a
/// valid configuration:
///
/// ```yaml
/// path: /var/lib/ip2region/ip2region.db
/// algorithm: memory   # or `default_search`
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearcherConfig {
    /// Index file path
    pub path: PathBuf,
    /// Default search algorithm
    #[serde(alias = "default_search")]
    pub algorithm: SearchAlgorithm,
}

impl Default for SearcherConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_INDEX_PATH),
            algorithm: SearchAlgorithm::default(),
        }
    }
}

impl SearcherConfig {
    pub fn new(path: impl Into<PathBuf>, algorithm: SearchAlgorithm) -> Self {
        Self {
            path: path.into(),
            algorithm,
        }
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load a configuration file. `.json` files are parsed as JSON,
    /// everything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };

        log::debug!("Loaded searcher config from {:?}: {:?}", path, config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = SearcherConfig::default();
        assert_eq!(config.path, PathBuf::from("ip2region.db"));
        assert_eq!(config.algorithm, SearchAlgorithm::BTree);
    }

    #[test]
    fn test_from_yaml() {
        let config = SearcherConfig::from_yaml_str("path: /data/ip.db\nalgorithm: memory\n").unwrap();
        assert_eq!(config, SearcherConfig::new("/data/ip.db", SearchAlgorithm::Memory));
    }

    #[test]
    fn test_default_search_alias() {
        let config = SearcherConfig::from_yaml_str("default_search: binary").unwrap();
        assert_eq!(config.algorithm, SearchAlgorithm::Binary);
        assert_eq!(config.path, PathBuf::from(DEFAULT_INDEX_PATH));
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(SearcherConfig::from_yaml_str("{}").unwrap(), SearcherConfig::default());
        assert_eq!(SearcherConfig::from_json_str("{}").unwrap(), SearcherConfig::default());
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        assert!(matches!(
            SearcherConfig::from_yaml_str("algorithm: linear"),
            Err(Error::Yaml(_))
        ));
        assert!(matches!(
            SearcherConfig::from_json_str(r#"{"algorithm": "linear"}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempdir().unwrap();

        let yaml = dir.path().join("searcher.yaml");
        fs::write(&yaml, "path: a.db\nalgorithm: btree\n").unwrap();
        assert_eq!(
            SearcherConfig::load(&yaml).unwrap(),
            SearcherConfig::new("a.db", SearchAlgorithm::BTree)
        );

        let json = dir.path().join("searcher.JSON");
        fs::write(&json, r#"{"path": "b.db", "default_search": "memory"}"#).unwrap();
        assert_eq!(
            SearcherConfig::load(&json).unwrap(),
            SearcherConfig::new("b.db", SearchAlgorithm::Memory)
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            SearcherConfig::load(dir.path().join("absent.yaml")),
            Err(Error::Io(_))
        ));
    }
}
