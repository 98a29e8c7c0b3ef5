//! Ranking integration tests
//!
//! Runs the ranking pipeline step by step and end to end through the public API

use chatsift::config::Config;
use chatsift::ranking::content_hash;
use chatsift::{ChatsiftError, RankedResult, RawSearchHit, ResultProcessor};
use std::sync::Arc;
use std::thread;

fn test_processor() -> ResultProcessor {
    let mut config = Config::default();
    config.ranking.similarity_threshold = 1.5;
    config.ranking.enable_deduplication = true;
    config.ranking.keyword_match_weight = 0.5;
    config.ranking.vector_similarity_weight = 0.5;
    ResultProcessor::new(Arc::new(config)).unwrap()
}

fn ranked(id: i64, hash: &str, relevance: f64) -> RankedResult {
    RankedResult {
        hit: RawSearchHit::new(id, 0.5, "text"),
        keyword_score: 0.0,
        relevance_score: relevance,
        content_hash: hash.to_string(),
    }
}

#[test]
fn test_threshold_keeps_hits_at_or_below() {
    let processor = test_processor();
    let hits = vec![
        RawSearchHit::new(1, 0.5, "a"),
        RawSearchHit::new(2, 1.0, "b"),
        RawSearchHit::new(3, 2.0, "c"),
        RawSearchHit::new(4, 1.5, "d"),
    ];

    let filtered = processor.apply_similarity_threshold(hits);

    assert_eq!(filtered.len(), 3);
    assert!(filtered.iter().all(|h| h.id != 3));

    let again = processor.apply_similarity_threshold(filtered.clone());
    assert_eq!(again, filtered);
}

#[test]
fn test_keyword_score_boundaries() {
    let processor = test_processor();
    let query = "project planning";

    assert_eq!(
        processor.calculate_keyword_score("This is a test message about project planning", query),
        1.0
    );
    assert_eq!(
        processor.calculate_keyword_score("This is a test message about project", query),
        0.5
    );
    assert_eq!(
        processor.calculate_keyword_score("This is completely different", query),
        0.0
    );
}

#[test]
fn test_relevance_combines_vector_and_keyword() {
    let processor = test_processor();
    let hit = RawSearchHit::new(1, 0.5, "text");

    let relevance = processor.calculate_relevance_score(&hit, 0.8).unwrap();

    assert!(relevance > 0.0);
    assert!(relevance <= 1.0);
}

#[test]
fn test_relevance_non_increasing_in_distance() {
    let processor = test_processor();
    let mut previous = f64::INFINITY;
    for step in 0..50 {
        let hit = RawSearchHit::new(1, step as f32 * 0.25, "text");
        let relevance = processor.calculate_relevance_score(&hit, 0.4).unwrap();
        assert!(relevance <= previous);
        previous = relevance;
    }
}

#[test]
fn test_content_hash_same_and_different() {
    let processor = test_processor();

    assert_eq!(
        processor.calculate_content_hash("This is a test message"),
        processor.calculate_content_hash("This is a test message")
    );
    assert_ne!(
        processor.calculate_content_hash("This is a test message"),
        processor.calculate_content_hash("This is a different message")
    );
}

#[test]
fn test_deduplication_removes_duplicates() {
    let processor = test_processor();
    let results = vec![
        ranked(1, "hash1", 0.9),
        ranked(2, "hash1", 0.8),
        ranked(3, "hash2", 0.7),
    ];

    let deduplicated = processor.apply_deduplication(results);

    assert_eq!(deduplicated.len(), 2);
    assert!(deduplicated
        .iter()
        .any(|r| r.content_hash == "hash1" && r.relevance_score == 0.9));
}

#[test]
fn test_sort_by_relevance_descending() {
    let processor = test_processor();
    let results = vec![ranked(1, "a", 0.5), ranked(2, "b", 0.9), ranked(3, "c", 0.7)];

    let sorted = processor.sort_by_relevance(results);

    assert_eq!(sorted[0].relevance_score, 0.9);
    assert_eq!(sorted[1].relevance_score, 0.7);
    assert_eq!(sorted[2].relevance_score, 0.5);
}

#[test]
fn test_full_pipeline_from_json() {
    let processor = test_processor();
    let hits: Vec<RawSearchHit> = serde_json::from_str(
        r#"[
            {"id": 10, "distance": 0.40, "content": "Standup moved to 10am tomorrow"},
            {"id": 11, "distance": 0.35, "content": "standup moved to 10AM  tomorrow"},
            {"id": 12, "distance": 0.20, "content": "New hire onboarding checklist"},
            {"id": 13, "distance": 0.90, "content": "Standup notes: release blocked"},
            {"id": 14, "distance": 4.00, "content": "standup standup standup"}
        ]"#,
    )
    .unwrap();

    let results = processor.process(hits, "standup tomorrow").unwrap();

    let ids: Vec<i64> = results.iter().map(|r| r.hit.id).collect();
    assert_eq!(ids, vec![11, 13, 12]);

    // one result per content hash, sorted descending
    let mut hashes: Vec<&str> = results.iter().map(|r| r.content_hash.as_str()).collect();
    hashes.sort();
    hashes.dedup();
    assert_eq!(hashes.len(), results.len());
    assert!(results
        .windows(2)
        .all(|w| w[0].relevance_score >= w[1].relevance_score));
    assert_eq!(results[0].content_hash, content_hash("Standup moved to 10am tomorrow"));
}

#[test]
fn test_pipeline_without_deduplication() {
    let mut config = Config::default();
    config.ranking.enable_deduplication = false;
    let processor = ResultProcessor::new(Arc::new(config)).unwrap();

    let hits = vec![
        RawSearchHit::new(1, 0.1, "same text"),
        RawSearchHit::new(2, 0.2, "same text"),
    ];

    assert_eq!(processor.process(hits, "same").unwrap().len(), 2);
}

#[test]
fn test_missing_content_is_invalid_argument() {
    let processor = test_processor();
    let hits: Vec<RawSearchHit> =
        serde_json::from_str(r#"[{"id": 1, "distance": 0.1}]"#).unwrap();

    let err = processor.process(hits, "query").unwrap_err();

    assert!(matches!(err, ChatsiftError::InvalidArgument(_)));
}

#[test]
fn test_invalid_weights_rejected_at_construction() {
    let mut config = Config::default();
    config.ranking.vector_similarity_weight = -1.0;

    let err = ResultProcessor::new(Arc::new(config)).unwrap_err();

    assert!(matches!(err, ChatsiftError::ConfigValidation { .. }));
}

#[test]
fn test_concurrent_ranking_is_deterministic() {
    let processor = Arc::new(test_processor());
    let hits = vec![
        RawSearchHit::new(1, 0.3, "alpha beta"),
        RawSearchHit::new(2, 0.3, "beta gamma"),
        RawSearchHit::new(3, 0.6, "alpha beta"),
        RawSearchHit::new(4, 1.2, "gamma delta"),
    ];
    let expected = processor.process(hits.clone(), "beta").unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let processor = Arc::clone(&processor);
            let hits = hits.clone();
            thread::spawn(move || processor.process(hits, "beta").unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
