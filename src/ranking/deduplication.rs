//! Content fingerprinting and duplicate collapsing

use crate::ranking::RankedResult;
use ahash::AHashMap;

/// BLAKE3 fingerprint of `content`, hex encoded
///
/// Whitespace is removed and letters lowercased first, so reflowed or
/// re-cased copies of the same text collapse to one fingerprint.
pub fn content_hash(content: &str) -> String {
    let normalized: String = content
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();

    blake3::hash(normalized.as_bytes()).to_hex().to_string()
}

/// Keep one result per content hash, the one with the highest relevance
///
/// Ties keep the earliest result. Each survivor takes the position where
/// its hash first appeared.
pub fn deduplicate_results(results: Vec<RankedResult>) -> Vec<RankedResult> {
    let mut slots: AHashMap<String, usize> = AHashMap::new();
    let mut kept: Vec<RankedResult> = Vec::with_capacity(results.len());

    for result in results {
        match slots.get(&result.content_hash) {
            Some(&slot) => {
                if result.relevance_score > kept[slot].relevance_score {
                    kept[slot] = result;
                }
            }
            None => {
                slots.insert(result.content_hash.clone(), kept.len());
                kept.push(result);
            }
        }
    }

    kept
}

/// Stable sort by relevance, highest first
pub fn sort_by_relevance(mut results: Vec<RankedResult>) -> Vec<RankedResult> {
    results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
    results
}
