//! Bhavna Engine
//!
//! Statement-level routing with sticky lexicon fallback, conversation
//! state and trend aggregation.

pub mod conversation;
pub mod engine;
pub mod reply;
pub mod routing;
pub mod trend;

pub use conversation::{Conversation, Exchange};
pub use engine::{SentimentEngine, SentimentEngineBuilder, DEFAULT_ADAPTER_TIMEOUT};
pub use reply::{CannedReplies, ReplyGenerator};
pub use routing::{RoutingMode, RoutingState};
pub use trend::{summarize, summarize_scores};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::conversation::{Conversation, Exchange};
    pub use crate::engine::SentimentEngine;
    pub use crate::reply::{CannedReplies, ReplyGenerator};
    pub use crate::routing::RoutingState;
}
