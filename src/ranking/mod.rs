//! Search result ranking and deduplication
//!
//! Re-scores raw vector-store hits by fusing vector similarity with keyword
//! overlap against the query, collapses duplicate content and orders the
//! survivors by relevance. Pipeline order:
//! threshold → keyword score → relevance → deduplicate → sort.

mod deduplication;
mod scoring;
mod types;

pub use deduplication::{content_hash, deduplicate_results, sort_by_relevance};
pub use scoring::{distance_to_similarity, keyword_score, relevance_score};
pub use types::{RankedResult, RawSearchHit};

use crate::config::{Config, ConfigValidator};
use crate::error::{ChatsiftError, Result};
use std::sync::Arc;
use tracing::info;

/// Ranking engine bound to one immutable configuration
#[derive(Debug, Clone)]
pub struct ResultProcessor {
    config: Arc<Config>,
}

impl ResultProcessor {
    /// Create a processor, rejecting an invalid configuration up front
    pub fn new(config: Arc<Config>) -> Result<Self> {
        ConfigValidator::validate(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Keep hits whose distance is within the similarity threshold, in order
    pub fn apply_similarity_threshold(&self, hits: Vec<RawSearchHit>) -> Vec<RawSearchHit> {
        let threshold = self.config.ranking.similarity_threshold;
        let before = hits.len();

        let filtered: Vec<RawSearchHit> = hits
            .into_iter()
            .filter(|hit| hit.distance <= threshold)
            .collect();

        info!(
            "Similarity threshold: {} -> {} (threshold: {})",
            before,
            filtered.len(),
            threshold
        );
        filtered
    }

    pub fn calculate_keyword_score(&self, content: &str, query: &str) -> f64 {
        keyword_score(content, query)
    }

    pub fn calculate_relevance_score(&self, hit: &RawSearchHit, keyword_score: f64) -> Result<f64> {
        relevance_score(&self.config.ranking, hit, keyword_score)
    }

    pub fn calculate_content_hash(&self, content: &str) -> String {
        content_hash(content)
    }

    /// Score a single hit against the query
    ///
    /// # Errors
    /// `InvalidArgument` if the hit carries no content or a malformed distance
    pub fn rank_hit(&self, hit: RawSearchHit, query: &str) -> Result<RankedResult> {
        let content = hit.content.as_deref().ok_or_else(|| {
            ChatsiftError::invalid_argument(format!("hit {} has no content", hit.id))
        })?;

        let keyword_score = self.calculate_keyword_score(content, query);
        let relevance_score = self.calculate_relevance_score(&hit, keyword_score)?;
        let content_hash = self.calculate_content_hash(content);

        Ok(RankedResult {
            hit,
            keyword_score,
            relevance_score,
            content_hash,
        })
    }

    /// Collapse results sharing a content hash; no-op when deduplication is disabled
    pub fn apply_deduplication(&self, results: Vec<RankedResult>) -> Vec<RankedResult> {
        if !self.config.ranking.enable_deduplication {
            return results;
        }

        let before = results.len();
        let deduplicated = deduplicate_results(results);

        info!("Deduplication: {} -> {}", before, deduplicated.len());
        deduplicated
    }

    pub fn sort_by_relevance(&self, results: Vec<RankedResult>) -> Vec<RankedResult> {
        sort_by_relevance(results)
    }

    /// Run the full pipeline over raw hits for `query`
    pub fn process(&self, hits: Vec<RawSearchHit>, query: &str) -> Result<Vec<RankedResult>> {
        let raw_count = hits.len();

        let filtered = self.apply_similarity_threshold(hits);
        let filtered_count = filtered.len();

        let ranked = filtered
            .into_iter()
            .map(|hit| self.rank_hit(hit, query))
            .collect::<Result<Vec<_>>>()?;

        let deduplicated = self.apply_deduplication(ranked);
        let deduplicated_count = deduplicated.len();

        let sorted = self.sort_by_relevance(deduplicated);

        info!(
            "Ranked search results: raw {} -> filtered {} -> deduplicated {}",
            raw_count, filtered_count, deduplicated_count
        );

        Ok(sorted)
    }
}
