//! Search hit input and ranked result output

use serde::{Deserialize, Serialize};

/// A raw nearest-neighbor hit as returned by the vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSearchHit {
    /// Identifier of the indexed item
    pub id: i64,

    /// Vector distance (smaller is more similar)
    pub distance: f32,

    /// Text of the indexed item, `None` if it could not be resolved
    #[serde(default)]
    pub content: Option<String>,
}

impl RawSearchHit {
    pub fn new(id: i64, distance: f32, content: impl Into<String>) -> Self {
        Self {
            id,
            distance,
            content: Some(content.into()),
        }
    }

    /// Get a short preview of the content (first N characters)
    pub fn preview(&self, max_chars: usize) -> String {
        let content = self.content.as_deref().unwrap_or_default();
        if content.chars().count() <= max_chars {
            content.to_string()
        } else {
            let cut: String = content.chars().take(max_chars).collect();
            format!("{}...", cut)
        }
    }
}

/// A hit re-scored by fusing vector similarity with keyword overlap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    /// The originating hit
    pub hit: RawSearchHit,

    /// Fraction of query terms found in the content (0.0 to 1.0)
    pub keyword_score: f64,

    /// Fused score (0.0 to 1.0, higher is better)
    pub relevance_score: f64,

    /// Fingerprint of the normalized content
    pub content_hash: String,
}
