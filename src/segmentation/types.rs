// Message input and segment output types for the segmentation engine
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message as supplied by the ingestion side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message ID, unique within its group
    pub message_id: i64,

    /// Chat group the message belongs to
    pub group_id: i64,

    /// Author of the message
    pub from_user_id: i64,

    /// When the message was sent
    pub timestamp: DateTime<Utc>,

    /// Raw message text (may be empty, e.g. for stickers)
    #[serde(default)]
    pub content: String,
}

impl Message {
    pub fn new(
        message_id: i64,
        group_id: i64,
        from_user_id: i64,
        timestamp: DateTime<Utc>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            message_id,
            group_id,
            from_user_id,
            timestamp,
            content: content.into(),
        }
    }
}

/// A contiguous, topically coherent run of messages ready for embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSegment {
    /// Member messages in chronological order
    pub messages: Vec<Message>,

    pub group_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub first_message_id: i64,
    pub last_message_id: i64,
    pub message_count: usize,

    /// Number of distinct authors
    pub participant_count: usize,

    /// Most frequent keywords, most frequent first
    pub topic_keywords: Vec<String>,

    /// Every message's content, one per line
    pub full_content: String,

    /// Short preview built from the first lines of `full_content`
    pub content_summary: String,
}

impl ConversationSegment {
    /// Time covered by the segment
    pub fn duration(&self) -> chrono::Duration {
        self.end_time - self.start_time
    }
}
