//! Keyword and fused relevance scoring

use crate::config::RankingConfig;
use crate::error::{ChatsiftError, Result};
use crate::ranking::RawSearchHit;

/// Fraction of whitespace-delimited query terms contained in `content`
///
/// Matching is case-insensitive substring containment. An empty query
/// scores 0.0.
pub fn keyword_score(content: &str, query: &str) -> f64 {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if terms.is_empty() {
        return 0.0;
    }

    let content_lower = content.to_lowercase();

    // whole query present implies every term is present
    if content_lower.contains(&query.trim().to_lowercase()) {
        return 1.0;
    }

    let matched = terms
        .iter()
        .filter(|term| content_lower.contains(term.as_str()))
        .count();

    matched as f64 / terms.len() as f64
}

/// Map a vector distance to a similarity in (0, 1]
///
/// Distance 0 maps to 1.0 and the similarity decays towards 0 as the
/// distance grows.
pub fn distance_to_similarity(distance: f32) -> f64 {
    1.0 / (1.0 + distance as f64)
}

/// Weighted mean of vector similarity and keyword score
///
/// # Errors
/// `InvalidArgument` for a negative or non-finite distance, or a keyword
/// score outside [0, 1]
pub fn relevance_score(
    config: &RankingConfig,
    hit: &RawSearchHit,
    keyword_score: f64,
) -> Result<f64> {
    if !hit.distance.is_finite() || hit.distance < 0.0 {
        return Err(ChatsiftError::invalid_argument(format!(
            "hit {} has invalid distance {}",
            hit.id, hit.distance
        )));
    }

    if !(0.0..=1.0).contains(&keyword_score) {
        return Err(ChatsiftError::invalid_argument(format!(
            "keyword score {} for hit {} is outside [0, 1]",
            keyword_score, hit.id
        )));
    }

    let similarity = distance_to_similarity(hit.distance);
    let vector_weight = config.vector_similarity_weight;
    let keyword_weight = config.keyword_match_weight;

    let fused = (vector_weight * similarity + keyword_weight * keyword_score)
        / (vector_weight + keyword_weight);

    Ok(fused.clamp(0.0, 1.0))
}
