//! Configuration management for chatsift
//!
//! A single `Config` value drives both engines. It is loaded once (file,
//! environment, profile), validated, and then shared read-only.

use crate::error::{ChatsiftError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

pub const SCHEMA_VERSION: &str = "1.0.0";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    #[serde(default)]
    pub segmentation: SegmentationConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Segment boundary settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub max_messages_per_segment: usize,
    pub min_messages_per_segment: usize,
    pub max_time_gap_minutes: i64,
    pub max_segment_length_chars: usize,
    /// Minimum keyword overlap (Jaccard) for a message to stay on topic
    pub topic_similarity_threshold: f64,
    pub max_topic_keywords: usize,
    pub min_keyword_length: usize,
    /// Phrases that announce a change of subject
    pub transition_signals: Vec<String>,
    /// How many recent authors are checked for the participant-shift trigger (0 disables)
    pub participant_window: usize,
    pub participant_shift_min_messages: usize,
    pub extra_stop_words: Vec<String>,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            max_messages_per_segment: 10,
            min_messages_per_segment: 3,
            max_time_gap_minutes: 30,
            max_segment_length_chars: 2000,
            topic_similarity_threshold: 0.3,
            max_topic_keywords: 10,
            min_keyword_length: 3,
            transition_signals: [
                "另外",
                "顺便",
                "对了",
                "换个话题",
                "说到",
                "话说",
                "by the way",
                "btw",
                "anyway",
                "speaking of",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            participant_window: 5,
            participant_shift_min_messages: 8,
            extra_stop_words: Vec::new(),
        }
    }
}

/// Search result scoring settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Maximum raw distance a hit may have to be kept (smaller is closer)
    pub similarity_threshold: f32,
    pub keyword_match_weight: f64,
    pub vector_similarity_weight: f64,
    pub enable_deduplication: bool,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 1.5,
            keyword_match_weight: 0.5,
            vector_similarity_weight: 0.5,
            enable_deduplication: true,
        }
    }
}

/// Profile-specific configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_time_gap_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_similarity_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_deduplication: Option<bool>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ChatsiftError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ChatsiftError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();

        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ChatsiftError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Load configuration with a specific profile applied
    pub fn load_with_profile(path: &Path, profile: &str) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_profile(profile)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Apply a profile's overrides to the configuration
    pub fn apply_profile(&mut self, profile: &str) -> Result<()> {
        let overrides = self
            .profiles
            .get(profile)
            .cloned()
            .ok_or_else(|| ChatsiftError::Config(format!("Unknown profile: {}", profile)))?;

        if let Some(gap) = overrides.max_time_gap_minutes {
            self.segmentation.max_time_gap_minutes = gap;
        }
        if let Some(threshold) = overrides.topic_similarity_threshold {
            self.segmentation.topic_similarity_threshold = threshold;
        }
        if let Some(threshold) = overrides.similarity_threshold {
            self.ranking.similarity_threshold = threshold;
        }
        if let Some(enabled) = overrides.enable_deduplication {
            self.ranking.enable_deduplication = enabled;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: CHATSIFT_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(std::env::vars());
    }

    fn apply_overrides(&mut self, vars: impl Iterator<Item = (String, String)>) {
        for (key, value) in vars {
            if let Some(config_key) = key.strip_prefix("CHATSIFT_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "SEGMENTATION__MAX_MESSAGES_PER_SEGMENT" => {
                self.segmentation.max_messages_per_segment = parse_value(path, value)?;
            }
            "SEGMENTATION__MIN_MESSAGES_PER_SEGMENT" => {
                self.segmentation.min_messages_per_segment = parse_value(path, value)?;
            }
            "SEGMENTATION__MAX_TIME_GAP_MINUTES" => {
                self.segmentation.max_time_gap_minutes = parse_value(path, value)?;
            }
            "SEGMENTATION__MAX_SEGMENT_LENGTH_CHARS" => {
                self.segmentation.max_segment_length_chars = parse_value(path, value)?;
            }
            "SEGMENTATION__TOPIC_SIMILARITY_THRESHOLD" => {
                self.segmentation.topic_similarity_threshold = parse_value(path, value)?;
            }
            "RANKING__SIMILARITY_THRESHOLD" => {
                self.ranking.similarity_threshold = parse_value(path, value)?;
            }
            "RANKING__KEYWORD_MATCH_WEIGHT" => {
                self.ranking.keyword_match_weight = parse_value(path, value)?;
            }
            "RANKING__VECTOR_SIMILARITY_WEIGHT" => {
                self.ranking.vector_similarity_weight = parse_value(path, value)?;
            }
            "RANKING__ENABLE_DEDUPLICATION" => {
                self.ranking.enable_deduplication = parse_value(path, value)?;
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ChatsiftError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("chatsift").join("config.toml"))
    }
}

fn parse_value<T: std::str::FromStr>(path: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ChatsiftError::InvalidConfigValue {
            path: path.to_string(),
            message: format!("Cannot parse '{}'", value),
        })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: SCHEMA_VERSION.to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            segmentation: SegmentationConfig::default(),
            ranking: RankingConfig::default(),
            profiles: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");

        let mut config = Config::default();
        config.segmentation.max_time_gap_minutes = 45;
        config.ranking.enable_deduplication = false;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.segmentation.max_time_gap_minutes, 45);
        assert!(!loaded.ranking.enable_deduplication);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = Config::load(&temp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ChatsiftError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[_meta]
schema_version = "1.0.0"

[segmentation]
min_messages_per_segment = 12
max_messages_per_segment = 10
"#,
        )
        .unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ChatsiftError::ConfigValidation { .. }));
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config: Config = toml::from_str(
            r#"
[_meta]
schema_version = "1.0.0"

[ranking]
similarity_threshold = 0.8
"#,
        )
        .unwrap();

        assert_eq!(config.ranking.similarity_threshold, 0.8);
        assert_eq!(config.ranking.keyword_match_weight, 0.5);
        assert_eq!(config.segmentation.max_messages_per_segment, 10);
    }

    #[test]
    fn test_apply_profile() {
        let mut config = Config::default();
        config.profiles.insert(
            "strict".to_string(),
            ProfileOverrides {
                similarity_threshold: Some(0.5),
                enable_deduplication: Some(false),
                ..Default::default()
            },
        );

        config.apply_profile("strict").unwrap();
        assert_eq!(config.ranking.similarity_threshold, 0.5);
        assert!(!config.ranking.enable_deduplication);
        assert!(config.apply_profile("missing").is_err());
    }

    #[test]
    fn test_env_style_overrides() {
        let mut config = Config::default();
        let vars = vec![
            ("CHATSIFT_SEGMENTATION__MAX_TIME_GAP_MINUTES".to_string(), "15".to_string()),
            ("CHATSIFT_RANKING__ENABLE_DEDUPLICATION".to_string(), "false".to_string()),
            ("CHATSIFT_RANKING__KEYWORD_MATCH_WEIGHT".to_string(), "not-a-number".to_string()),
            ("UNRELATED".to_string(), "1".to_string()),
        ];

        config.apply_overrides(vars.into_iter());

        assert_eq!(config.segmentation.max_time_gap_minutes, 15);
        assert!(!config.ranking.enable_deduplication);
        // unparsable values are skipped
        assert_eq!(config.ranking.keyword_match_weight, 0.5);
    }
}
