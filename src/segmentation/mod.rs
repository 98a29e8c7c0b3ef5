//! Conversation segmentation
//!
//! Splits a chronologically ordered message stream for one chat group into
//! bounded, topically coherent segments. Boundaries come from hard limits
//! (size, time gap, length) and from topic-drift signals (keyword overlap,
//! transition phrases, participant shift). Topic-drift signals never close a
//! segment that is still below the minimum size.

mod types;

pub use types::{ConversationSegment, Message};

use crate::config::{Config, ConfigValidator};
use crate::error::{ChatsiftError, Result};
use crate::text::{jaccard_similarity, KeywordExtractor, PhraseMatcher};
use ahash::AHashSet;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

const SUMMARY_MAX_LINES: usize = 3;
const SUMMARY_MAX_CHARS: usize = 100;
const EMPTY_SUMMARY: &str = "(empty conversation)";

/// Reason a segment was closed before a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    /// Working segment already holds the maximum number of messages
    Size,
    /// Gap since the previous message exceeds the allowed maximum
    TimeGap,
    /// Adding the message would exceed the character budget
    Length,
    /// Keyword overlap with the running topic fell below the threshold
    TopicChange,
    /// Message contains a phrase like "by the way"
    TransitionSignal,
    /// Message author is absent from the recent speakers
    ParticipantShift,
}

/// Messages accumulated since the last boundary
#[derive(Default)]
struct WorkingSegment<'a> {
    messages: Vec<&'a Message>,
    content_chars: usize,
    keywords: AHashSet<String>,
}

impl<'a> WorkingSegment<'a> {
    fn push(&mut self, message: &'a Message, extractor: &KeywordExtractor) {
        self.content_chars += message.content.chars().count();
        self.keywords.extend(extractor.tokens(&message.content));
        self.messages.push(message);
    }

    fn len(&self) -> usize {
        self.messages.len()
    }

    fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Segmentation engine
///
/// Stateless apart from the immutable configuration, so one instance can be
/// shared across threads and called concurrently on different groups.
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: Arc<Config>,
    keywords: KeywordExtractor,
    transitions: PhraseMatcher,
}

impl Segmenter {
    /// Create a segmenter, rejecting an invalid configuration up front
    pub fn new(config: Arc<Config>) -> Result<Self> {
        ConfigValidator::validate(&config)?;

        let keywords = KeywordExtractor::new(&config.segmentation)?;
        let transitions = PhraseMatcher::new(&config.segmentation.transition_signals)?;

        Ok(Self {
            config,
            keywords,
            transitions,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segment the ordered messages of a single group
    ///
    /// # Errors
    /// `InvalidArgument` if the messages are not ordered by timestamp
    pub fn segment(&self, messages: &[Message]) -> Result<Vec<ConversationSegment>> {
        let refs: Vec<&Message> = messages.iter().collect();
        self.segment_ordered(&refs)
    }

    /// Segment messages from several groups at once
    ///
    /// Messages are partitioned by group, keeping input order within each
    /// group. Groups without enough material map to an empty list.
    pub fn segment_groups(
        &self,
        messages: &[Message],
    ) -> Result<BTreeMap<i64, Vec<ConversationSegment>>> {
        let mut groups: BTreeMap<i64, Vec<&Message>> = BTreeMap::new();
        for message in messages {
            groups.entry(message.group_id).or_default().push(message);
        }

        let mut segmented = BTreeMap::new();
        for (group_id, group_messages) in groups {
            let segments = self.segment_ordered(&group_messages).map_err(|e| match e {
                ChatsiftError::InvalidArgument(msg) => {
                    ChatsiftError::InvalidArgument(format!("group {}: {}", group_id, msg))
                }
                other => other,
            })?;
            segmented.insert(group_id, segments);
        }

        Ok(segmented)
    }

    fn segment_ordered(&self, messages: &[&Message]) -> Result<Vec<ConversationSegment>> {
        ensure_chronological(messages)?;

        let min = self.config.segmentation.min_messages_per_segment;
        if messages.len() < min {
            debug!(
                "Only {} message(s), need {} for a segment; skipping",
                messages.len(),
                min
            );
            return Ok(Vec::new());
        }

        let mut segments = Vec::new();
        let mut working = WorkingSegment::default();

        for &message in messages {
            if let Some(boundary) = self.boundary_before(&working, message) {
                let closed = std::mem::take(&mut working);
                if closed.len() >= min {
                    debug!(
                        "Closing segment of {} message(s) before message {} ({:?})",
                        closed.len(),
                        message.message_id,
                        boundary
                    );
                    segments.push(self.finalize(&closed.messages));
                } else {
                    debug!(
                        "Discarding {} message(s) below minimum at {:?} boundary",
                        closed.len(),
                        boundary
                    );
                }
            }

            working.push(message, &self.keywords);
        }

        if !working.is_empty() && working.len() >= min {
            segments.push(self.finalize(&working.messages));
        } else if !working.is_empty() {
            debug!(
                "Discarding trailing {} message(s) below minimum",
                working.len()
            );
        }

        info!(
            "Segmented {} messages into {} segments",
            messages.len(),
            segments.len()
        );

        Ok(segments)
    }

    /// Decide whether `working` must be closed before `candidate` joins it
    fn boundary_before(&self, working: &WorkingSegment<'_>, candidate: &Message) -> Option<Boundary> {
        let last = working.messages.last()?;
        let cfg = &self.config.segmentation;

        if working.len() >= cfg.max_messages_per_segment {
            return Some(Boundary::Size);
        }

        // an unrepresentable gap limit never splits
        if let Some(max_gap) = chrono::Duration::try_minutes(cfg.max_time_gap_minutes) {
            if candidate.timestamp - last.timestamp > max_gap {
                return Some(Boundary::TimeGap);
            }
        }

        if working.content_chars + candidate.content.chars().count() > cfg.max_segment_length_chars
        {
            return Some(Boundary::Length);
        }

        if working.len() < cfg.min_messages_per_segment {
            return None;
        }

        let candidate_keywords = self.keywords.keyword_set(&candidate.content);
        if !working.keywords.is_empty() && !candidate_keywords.is_empty() {
            let similarity = jaccard_similarity(&working.keywords, &candidate_keywords);
            if similarity < cfg.topic_similarity_threshold {
                return Some(Boundary::TopicChange);
            }
        }

        if self.transitions.is_match(&candidate.content) {
            return Some(Boundary::TransitionSignal);
        }

        if cfg.participant_window > 0 && working.len() >= cfg.participant_shift_min_messages {
            let recent = working
                .messages
                .iter()
                .rev()
                .take(cfg.participant_window)
                .any(|m| m.from_user_id == candidate.from_user_id);
            if !recent {
                return Some(Boundary::ParticipantShift);
            }
        }

        None
    }

    fn finalize(&self, messages: &[&Message]) -> ConversationSegment {
        let first = messages[0];
        let last = messages[messages.len() - 1];

        let participant_count = messages
            .iter()
            .map(|m| m.from_user_id)
            .collect::<AHashSet<_>>()
            .len();

        let topic_keywords = self
            .keywords
            .top_keywords(messages.iter().map(|m| m.content.as_str()));

        let mut full_content = String::new();
        for message in messages {
            full_content.push_str(&message.content);
            full_content.push('\n');
        }
        let content_summary = summarize(&full_content);

        ConversationSegment {
            messages: messages.iter().map(|&m| m.clone()).collect(),
            group_id: first.group_id,
            start_time: first.timestamp,
            end_time: last.timestamp,
            first_message_id: first.message_id,
            last_message_id: last.message_id,
            message_count: messages.len(),
            participant_count,
            topic_keywords,
            full_content,
            content_summary,
        }
    }
}

fn ensure_chronological(messages: &[&Message]) -> Result<()> {
    for pair in messages.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if next.timestamp < prev.timestamp {
            return Err(ChatsiftError::invalid_argument(format!(
                "messages not ordered by timestamp: message {} ({}) follows message {} ({})",
                next.message_id, next.timestamp, prev.message_id, prev.timestamp
            )));
        }
    }
    Ok(())
}

/// First few non-blank lines joined by a space, cut to a fixed width
fn summarize(full_content: &str) -> String {
    let summary = full_content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SUMMARY_MAX_LINES)
        .collect::<Vec<_>>()
        .join(" ");

    if summary.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }

    if summary.chars().count() > SUMMARY_MAX_CHARS {
        let cut: String = summary.chars().take(SUMMARY_MAX_CHARS).collect();
        format!("{}...", cut)
    } else {
        summary
    }
}
