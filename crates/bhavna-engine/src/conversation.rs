//! Per-session conversation state

use crate::engine::SentimentEngine;
use crate::reply::ReplyGenerator;
use crate::trend::summarize;
use bhavna_core::{ConversationSummary, StatementAnalysis, Turn};
use serde::Serialize;

/// Result of one user submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exchange {
    pub bot_response: String,
    pub user_sentiment: StatementAnalysis,
}

/// Ordered history of one session.
///
/// Every submission appends one user turn, one bot turn and one analysis,
/// so the analyses always line up with the user turns.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    history: Vec<Turn>,
    analyses: Vec<StatementAnalysis>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze a user statement, record it and reply
    pub async fn process_user_input(
        &mut self,
        engine: &SentimentEngine,
        replies: &dyn ReplyGenerator,
        text: &str,
    ) -> Exchange {
        let analysis = engine.analyze_statement(text).await;
        let bot_response = replies.reply(text, &analysis.label);

        self.analyses.push(analysis.clone());
        self.history.push(Turn::user(text, analysis.clone()));
        self.history.push(Turn::bot(bot_response.clone()));

        Exchange {
            bot_response,
            user_sentiment: analysis,
        }
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn statement_analyses(&self) -> &[StatementAnalysis] {
        &self.analyses
    }

    /// Conversation-level summary of all user statements so far
    pub fn summary(&self) -> ConversationSummary {
        summarize(&self.analyses)
    }

    /// Per-statement compounds in submission order
    pub fn history_scores(&self) -> Vec<f64> {
        self.analyses.iter().map(|a| a.compound).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.analyses.is_empty()
    }

    /// Discard all turns and analyses
    pub fn reset(&mut self) {
        self.history.clear();
        self.analyses.clear();
    }
}
