//! Chatsift - conversation segmentation and hybrid result ranking
//!
//! Two pure, synchronous engines used by a chat search service: one groups
//! ordered chat messages into topically coherent segments for embedding, the
//! other fuses vector distance with keyword overlap to rank and deduplicate
//! search hits. Both are driven by one immutable configuration value.

pub mod cli;
pub mod config;
pub mod error;
pub mod ranking;
pub mod segmentation;
pub mod text;

pub use config::Config;
pub use error::{ChatsiftError, Result};
pub use ranking::{RankedResult, RawSearchHit, ResultProcessor};
pub use segmentation::{ConversationSegment, Message, Segmenter};
