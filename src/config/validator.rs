use crate::config::{Config, SCHEMA_VERSION};
use crate::error::{ChatsiftError, Result, ValidationError};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration, collecting every problem found
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        Self::validate_schema_version(config, &mut errors);
        Self::validate_segmentation(config, &mut errors);
        Self::validate_ranking(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ChatsiftError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != SCHEMA_VERSION {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_segmentation(config: &Config, errors: &mut Vec<ValidationError>) {
        let seg = &config.segmentation;

        if seg.max_messages_per_segment == 0 {
            errors.push(ValidationError::new(
                "segmentation.max_messages_per_segment",
                "Max messages per segment must be greater than 0",
            ));
        }

        if seg.min_messages_per_segment == 0 {
            errors.push(ValidationError::new(
                "segmentation.min_messages_per_segment",
                "Min messages per segment must be greater than 0",
            ));
        }

        if seg.min_messages_per_segment > seg.max_messages_per_segment {
            errors.push(ValidationError::new(
                "segmentation.min_messages_per_segment",
                format!(
                    "Min messages per segment ({}) exceeds max ({})",
                    seg.min_messages_per_segment, seg.max_messages_per_segment
                ),
            ));
        }

        if seg.max_time_gap_minutes <= 0 {
            errors.push(ValidationError::new(
                "segmentation.max_time_gap_minutes",
                "Max time gap must be greater than 0",
            ));
        }

        if seg.max_segment_length_chars == 0 {
            errors.push(ValidationError::new(
                "segmentation.max_segment_length_chars",
                "Max segment length must be greater than 0",
            ));
        }

        if !(0.0..=1.0).contains(&seg.topic_similarity_threshold) {
            errors.push(ValidationError::new(
                "segmentation.topic_similarity_threshold",
                format!(
                    "Topic similarity threshold must be between 0.0 and 1.0, got {}",
                    seg.topic_similarity_threshold
                ),
            ));
        }

        if seg.max_topic_keywords == 0 {
            errors.push(ValidationError::new(
                "segmentation.max_topic_keywords",
                "Max topic keywords must be greater than 0",
            ));
        }

        if seg.min_keyword_length == 0 {
            errors.push(ValidationError::new(
                "segmentation.min_keyword_length",
                "Min keyword length must be greater than 0",
            ));
        }

        if seg.transition_signals.iter().any(|s| s.trim().is_empty()) {
            errors.push(ValidationError::new(
                "segmentation.transition_signals",
                "Transition signals cannot contain empty phrases",
            ));
        }
    }

    fn validate_ranking(config: &Config, errors: &mut Vec<ValidationError>) {
        let ranking = &config.ranking;

        let threshold = ranking.similarity_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            errors.push(ValidationError::new(
                "ranking.similarity_threshold",
                format!("Similarity threshold must be a non-negative number, got {}", threshold),
            ));
        }

        let weights = [
            ("ranking.keyword_match_weight", ranking.keyword_match_weight),
            ("ranking.vector_similarity_weight", ranking.vector_similarity_weight),
        ];
        for (path, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                errors.push(ValidationError::new(
                    path,
                    format!("Weight must be a non-negative number, got {}", weight),
                ));
            }
        }

        if ranking.keyword_match_weight + ranking.vector_similarity_weight <= 0.0 {
            errors.push(ValidationError::new(
                "ranking",
                "At least one of keyword_match_weight and vector_similarity_weight must be positive",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_paths(config: &Config) -> Vec<String> {
        match ConfigValidator::validate(config) {
            Err(ChatsiftError::ConfigValidation { errors }) => {
                errors.into_iter().map(|e| e.path).collect()
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(()) => Vec::new(),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_min_above_max() {
        let mut config = Config::default();
        config.segmentation.min_messages_per_segment = 11;
        assert_eq!(
            error_paths(&config),
            vec!["segmentation.min_messages_per_segment"]
        );
    }

    #[test]
    fn test_zero_min_messages() {
        let mut config = Config::default();
        config.segmentation.min_messages_per_segment = 0;
        assert_eq!(
            error_paths(&config),
            vec!["segmentation.min_messages_per_segment"]
        );
    }

    #[test]
    fn test_negative_weight() {
        let mut config = Config::default();
        config.ranking.keyword_match_weight = -0.1;
        assert!(error_paths(&config).contains(&"ranking.keyword_match_weight".to_string()));
    }

    #[test]
    fn test_zero_weights() {
        let mut config = Config::default();
        config.ranking.keyword_match_weight = 0.0;
        config.ranking.vector_similarity_weight = 0.0;
        assert_eq!(error_paths(&config), vec!["ranking"]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = Config::default();
        config.meta.schema_version = "0.9".to_string();
        config.segmentation.topic_similarity_threshold = 1.5;
        config.ranking.similarity_threshold = f32::NAN;

        let paths = error_paths(&config);
        assert_eq!(paths.len(), 3);
        assert!(paths.contains(&"_meta.schema_version".to_string()));
        assert!(paths.contains(&"segmentation.topic_similarity_threshold".to_string()));
        assert!(paths.contains(&"ranking.similarity_threshold".to_string()));
    }
}
