//! Sync configuration.
//!
//! All rule and behavior settings live in one [`SyncConfig`] value that is
//! passed explicitly to the sync driver. It is stored as TOML:
//!
//! ```toml
//! version = 1
//! dry_run = false
//! sort_order = "descending"
//!
//! [[title_match_collections]]
//! pattern = "Nolan"
//! match_type = "director"
//!
//! [[expression_collections]]
//! collection_name = "Marvel Action"
//! expression = 'STUDIO "Marvel" AND GENRE "Action"'
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::reconcile::SortOrder;
use crate::rules::{CollectionRule, ExpressionRule, TitleMatchRule};

/// Current config schema version. Increment when making breaking changes.
pub const CONFIG_VERSION: u32 = 1;

/// Errors that can occur while reading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unsupported config version {found} (newest supported is {max})", max = CONFIG_VERSION)]
    UnsupportedVersion { found: u32 },
}

/// Settings for a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Config schema version. Defaults to the current version when absent.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Compute plans without creating or editing collections.
    #[serde(default)]
    pub dry_run: bool,

    /// Ordering applied to every collection.
    #[serde(default)]
    pub sort_order: SortOrder,

    /// Library file used by the command line host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_path: Option<PathBuf>,

    #[serde(default)]
    pub title_match_collections: Vec<TitleMatchRule>,

    #[serde(default)]
    pub expression_collections: Vec<ExpressionRule>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            dry_run: false,
            sort_order: SortOrder::default(),
            library_path: None,
            title_match_collections: Vec::new(),
            expression_collections: Vec::new(),
        }
    }
}

impl SyncConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML and
    /// `ConfigError::UnsupportedVersion` for a schema newer than this build.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: SyncConfig = toml::from_str(text)?;
        config.migrate()
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Brings an older config up to the current schema.
    fn migrate(mut self) -> Result<Self, ConfigError> {
        if self.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
            });
        }
        self.version = CONFIG_VERSION;
        Ok(self)
    }

    /// All rules in processing order: title-match rules first, then
    /// expression rules.
    pub fn rules(&self) -> Vec<CollectionRule> {
        self.title_match_collections
            .iter()
            .cloned()
            .map(CollectionRule::from)
            .chain(
                self.expression_collections
                    .iter()
                    .cloned()
                    .map(CollectionRule::from),
            )
            .collect()
    }

    /// Total number of configured rules.
    pub fn rule_count(&self) -> usize {
        self.title_match_collections.len() + self.expression_collections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{MatchType, MediaTypeFilter};

    const SAMPLE: &str = r#"
dry_run = true
sort_order = "ascending"
library_path = "/srv/media/library.json"

[[title_match_collections]]
pattern = "Nolan"
match_type = "director"

[[title_match_collections]]
pattern = "Star Wars"
collection_name = "Galaxy"
media_type = "movies"
case_sensitive = true

[[expression_collections]]
collection_name = "Marvel Action"
expression = 'STUDIO "Marvel" AND GENRE "Action"'
"#;

    #[test]
    fn test_parse_sample() {
        let config = SyncConfig::from_toml(SAMPLE).unwrap();

        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.dry_run);
        assert_eq!(config.sort_order, SortOrder::Ascending);
        assert_eq!(
            config.library_path,
            Some(PathBuf::from("/srv/media/library.json"))
        );
        assert_eq!(config.title_match_collections.len(), 2);
        assert_eq!(config.title_match_collections[0].match_type, MatchType::Director);
        assert_eq!(
            config.title_match_collections[1].media_type,
            MediaTypeFilter::Movies
        );
        assert!(config.title_match_collections[1].case_sensitive);
        assert_eq!(config.expression_collections[0].collection_name, "Marvel Action");
    }

    #[test]
    fn test_parse_empty_is_default() {
        let config = SyncConfig::from_toml("").unwrap();
        assert_eq!(config, SyncConfig::default());
        assert!(config.rules().is_empty());
    }

    #[test]
    fn test_rules_title_match_first() {
        let config = SyncConfig::from_toml(SAMPLE).unwrap();
        let names: Vec<String> = config
            .rules()
            .iter()
            .map(CollectionRule::collection_name)
            .collect();

        assert_eq!(names, vec!["Nolan Directed", "Galaxy", "Marvel Action"]);
        assert_eq!(config.rule_count(), 3);
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let err = SyncConfig::from_toml("version = 99").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedVersion { found: 99 }));
    }

    #[test]
    fn test_invalid_toml() {
        let err = SyncConfig::from_toml("dry_run = maybe").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_round_trip_keeps_rules() {
        let config = SyncConfig::from_toml(SAMPLE).unwrap();
        let text = config.to_toml().unwrap();
        assert_eq!(SyncConfig::from_toml(&text).unwrap(), config);
    }
}
