//! Generator configuration.
//!
//! Only the shape of the generator is configurable: which sources to try
//! and in what order, and which hash mixes the state. There are no knobs
//! for reseeding or persistence.

use crate::error::RngError;
use crate::generator::RngState;
use crate::mixing::HashAlgorithm;
use crate::sources::SourceKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Configuration for one generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Sources to try, strongest first.
    pub sources: Vec<SourceKind>,
    /// Hash used for mixing.
    pub hash: HashAlgorithm,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            sources: SourceKind::DEFAULT_ORDER.to_vec(),
            hash: HashAlgorithm::Sha512,
        }
    }
}

impl GeneratorConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        let mut seen = HashSet::new();
        for kind in &self.sources {
            if !seen.insert(kind) {
                return Err(ConfigError::DuplicateSource(*kind));
            }
        }
        Ok(())
    }

    /// Builds and seeds a generator from this configuration.
    pub fn build(&self) -> Result<RngState, RngError> {
        let sources = self.sources.iter().map(|kind| kind.build()).collect();
        RngState::from_sources(sources, self.hash)
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// The source list is empty.
    #[error("at least one entropy source must be configured")]
    NoSources,
    /// A source kind appears twice.
    #[error("entropy source {0:?} listed more than once")]
    DuplicateSource(SourceKind),
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid TOML for this format.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// The `[generator]` table.
    #[serde(default)]
    pub generator: GeneratorConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.generator.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = GeneratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sources.len(), 4);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = FileConfig::from_toml("").unwrap();
        assert_eq!(config.generator, GeneratorConfig::default());
    }

    #[test]
    fn test_parse_custom_chain() {
        let config = FileConfig::from_toml(
            r#"
            [generator]
            sources = ["dev-urandom", "platform"]
            hash = "blake3"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.generator.sources,
            [SourceKind::DevUrandom, SourceKind::Platform]
        );
        assert_eq!(config.generator.hash, HashAlgorithm::Blake3);
    }

    #[test]
    fn test_empty_source_list_invalid() {
        let result = FileConfig::from_toml("[generator]\nsources = []\nhash = \"sha512\"\n");
        assert!(matches!(result, Err(ConfigError::NoSources)));
    }

    #[test]
    fn test_duplicate_source_invalid() {
        let config = GeneratorConfig {
            sources: vec![SourceKind::Platform, SourceKind::Platform],
            hash: HashAlgorithm::Sha512,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateSource(SourceKind::Platform))
        ));
    }

    #[test]
    fn test_unknown_source_rejected() {
        let result = FileConfig::from_toml("[generator]\nsources = [\"camera\"]\nhash = \"sha512\"\n");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = FileConfig::from_file("/nonexistent/entropy-reservoir.toml");
        assert!(matches!(result, Err(ConfigError::FileReadError(_))));
    }

    #[test]
    fn test_build_platform_only() {
        let config = GeneratorConfig {
            sources: vec![SourceKind::Platform],
            hash: HashAlgorithm::Blake3,
        };
        let rng = config.build().unwrap();
        assert_eq!(rng.mix_extract(16).unwrap().len(), 16);
    }
}
