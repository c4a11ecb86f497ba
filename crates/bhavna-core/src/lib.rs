//! Bhavna Core
//!
//! Core types and error handling shared across Bhavna components.
//!
//! This crate provides:
//! - The canonical sentiment label set and the display label wrapper
//! - Per-statement analyses and conversation summaries
//! - Conversation turns
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    AnalysisSource, ConversationSummary, DisplayLabel, Role, Route, SentimentLabel,
    StatementAnalysis, StatementScores, Trend, Turn,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        AnalysisSource, ConversationSummary, DisplayLabel, SentimentLabel, StatementAnalysis,
        Trend,
    };
}
