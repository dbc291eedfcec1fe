//! Configuration schema (dbterd.toml)

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::TypeMap;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to dbt catalog.json
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,

    /// Path to the schema.yml describing models and tests
    #[serde(default = "default_schema")]
    pub schema: PathBuf,

    /// Where the DBML file is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Extra type aliases, applied on top of the built-in ones
    #[serde(default)]
    pub type_map: IndexMap<String, String>,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

fn default_catalog() -> PathBuf {
    PathBuf::from("target/catalog.json")
}

fn default_schema() -> PathBuf {
    PathBuf::from("models/schema.yml")
}

fn default_output() -> PathBuf {
    PathBuf::from("erd.dbml")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            schema: default_schema(),
            output: default_output(),
            type_map: IndexMap::new(),
            project_root: PathBuf::new(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Built-in type aliases with this config's entries layered on top
    pub fn type_map(&self) -> TypeMap {
        TypeMap::default().with_overrides(&self.type_map)
    }

    /// Resolve a configured path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.catalog, PathBuf::from("target/catalog.json"));
        assert_eq!(config.schema, PathBuf::from("models/schema.yml"));
        assert_eq!(config.output, PathBuf::from("erd.dbml"));
        assert_eq!(config.type_map(), TypeMap::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            output = "docs/erd.dbml"

            [type_map]
            "character varying" = "varchar"
            "#,
        )
        .unwrap();

        assert_eq!(config.output, PathBuf::from("docs/erd.dbml"));
        assert_eq!(config.catalog, PathBuf::from("target/catalog.json"));
        assert_eq!(config.type_map().resolve("character varying"), "varchar");
        assert_eq!(config.type_map().resolve("double precision"), "double");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Config::from_toml("output = [").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn config_toml_roundtrip() {
        let mut config = Config::default();
        config.type_map.insert("numeric".to_string(), "decimal".to_string());

        let toml = toml::to_string(&config).unwrap();
        let parsed = Config::from_toml(&toml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn relative_paths_resolve_against_project_root() {
        let config = Config {
            project_root: PathBuf::from("/work/jaffle"),
            ..Config::default()
        };

        assert_eq!(
            config.resolve(&config.catalog),
            PathBuf::from("/work/jaffle/target/catalog.json")
        );
        assert_eq!(config.resolve(Path::new("/tmp/x.json")), PathBuf::from("/tmp/x.json"));
    }
}
