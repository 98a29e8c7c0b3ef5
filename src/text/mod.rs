//! Tokenization and keyword utilities shared by segmentation and ranking

mod stopwords;

pub use stopwords::DEFAULT_STOP_WORDS;

use crate::config::SegmentationConfig;
use crate::error::{ChatsiftError, Result};
use ahash::{AHashMap, AHashSet};
use regex::Regex;

/// A token is a maximal run of characters that are not whitespace, punctuation or symbols
const TOKEN_PATTERN: &str = r"[^\s\p{P}\p{S}]+";

/// Tokens this long or longer are noise (URLs, hashes, unsegmented CJK runs)
const MAX_KEYWORD_LENGTH: usize = 30;

/// Extracts normalized keywords from chat text
///
/// Stop words are owned by the extractor instance, built from the
/// configuration it was created with.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    token_pattern: Regex,
    stop_words: AHashSet<String>,
    min_length: usize,
    top_k: usize,
}

impl KeywordExtractor {
    pub fn new(config: &SegmentationConfig) -> Result<Self> {
        let token_pattern =
            Regex::new(TOKEN_PATTERN).map_err(|e| ChatsiftError::Other(e.into()))?;

        let stop_words = DEFAULT_STOP_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(config.extra_stop_words.iter().map(|w| w.to_lowercase()))
            .collect();

        Ok(Self {
            token_pattern,
            stop_words,
            min_length: config.min_keyword_length,
            top_k: config.max_topic_keywords,
        })
    }

    /// Keyword tokens of `text` in order of appearance (duplicates kept)
    pub fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        self.token_pattern
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .filter(move |token| {
                let len = token.chars().count();
                len >= self.min_length
                    && len < MAX_KEYWORD_LENGTH
                    && !self.stop_words.contains(token.as_str())
            })
    }

    /// Distinct keyword tokens of `text`
    pub fn keyword_set(&self, text: &str) -> AHashSet<String> {
        self.tokens(text).collect()
    }

    /// Most frequent keywords across `texts`, ties broken by first appearance
    pub fn top_keywords<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        // token -> (count, first position)
        let mut counts: AHashMap<String, (usize, usize)> = AHashMap::new();
        let mut position = 0;

        for text in texts {
            for token in self.tokens(text) {
                let entry = counts.entry(token).or_insert((0, position));
                entry.0 += 1;
                position += 1;
            }
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(token, (count, first))| (token, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .take(self.top_k)
            .map(|(token, _, _)| token)
            .collect()
    }
}

/// Jaccard similarity of two keyword sets
///
/// Returns 1.0 when the union is empty: no signal means no topic change.
pub fn jaccard_similarity(a: &AHashSet<String>, b: &AHashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }

    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

/// Case-insensitive matcher for a fixed list of phrases
///
/// A message matches when it contains any phrase as a substring.
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    pattern: Option<Regex>,
}

impl PhraseMatcher {
    pub fn new(phrases: &[String]) -> Result<Self> {
        let alternatives: Vec<String> = phrases
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = Regex::new(&format!("(?i)(?:{})", alternatives.join("|")))
            .map_err(|e| ChatsiftError::Other(e.into()))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern
            .as_ref()
            .map(|p| p.is_match(text))
            .unwrap_or(false)
    }
}
