//! Reader configuration.
//!
//! [`ReaderConfig`] replaces an ambient key/value dictionary: it is built
//! once, validated, and passed by reference to every component at
//! construction. It can be persisted as TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, KbpResult};

fn default_repr_dim() -> usize {
    50
}

fn default_num_negative() -> usize {
    1
}

fn default_model_name() -> String {
    "DistMult".to_string()
}

fn default_seed() -> u64 {
    123
}

/// Hyperparameters shared by the batch assembler and the scoring model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Embedding dimension for entities and predicates.
    #[serde(default = "default_repr_dim")]
    pub repr_dim: usize,
    /// Corruptions per positive triple (each yields one subject- and one
    /// object-corrupted triple).
    #[serde(default = "default_num_negative")]
    pub num_negative: usize,
    /// Name of the registered scoring function.
    #[serde(default = "default_model_name")]
    pub model_name: String,
    /// Seed for negative sampling and embedding initialization.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            repr_dim: default_repr_dim(),
            num_negative: default_num_negative(),
            model_name: default_model_name(),
            seed: default_seed(),
        }
    }
}

impl ReaderConfig {
    /// Create a config for the given dimension and scoring function (other
    /// fields default).
    pub fn new(repr_dim: usize, model_name: &str) -> Self {
        Self {
            repr_dim,
            model_name: model_name.to_string(),
            ..Default::default()
        }
    }

    /// Reject values no component can work with.
    ///
    /// `model_name` is resolved later against a scoring registry.
    pub fn validate(&self) -> KbpResult<()> {
        if self.repr_dim == 0 {
            return Err(ConfigError::Invalid {
                message: "repr_dim must be > 0".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> KbpResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> KbpResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> KbpResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KbpError;

    #[test]
    fn defaults_match_reader_conventions() {
        let config = ReaderConfig::default();
        assert_eq!(config.num_negative, 1);
        assert_eq!(config.model_name, "DistMult");
        assert_eq!(config.seed, 123);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let config = ReaderConfig::new(0, "DistMult");
        assert!(matches!(
            config.validate(),
            Err(KbpError::Config(ConfigError::Invalid { .. }))
        ));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config =
            ReaderConfig::from_toml_str("repr_dim = 8\nmodel_name = \"TransE\"\n").unwrap();
        assert_eq!(config.repr_dim, 8);
        assert_eq!(config.model_name, "TransE");
        assert_eq!(config.num_negative, 1);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let result = ReaderConfig::from_toml_str("repr_dim = \"eight\"");
        assert!(matches!(
            result,
            Err(KbpError::Config(ConfigError::Parse { .. }))
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("reader.toml");
        let config = ReaderConfig {
            repr_dim: 16,
            num_negative: 3,
            model_name: "ComplEx".into(),
            seed: 7,
        };
        config.save(&path).unwrap();
        assert_eq!(ReaderConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = ReaderConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(KbpError::Config(ConfigError::Read { .. }))));
    }
}
