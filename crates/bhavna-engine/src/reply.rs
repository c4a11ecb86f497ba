//! Bot reply generation

use bhavna_core::{DisplayLabel, SentimentLabel};
use rand::seq::SliceRandom;

const NEGATIVE_REPLIES: &[&str] = &[
    "I'm sorry to hear that. How can I help?",
    "That sounds frustrating. Tell me more.",
    "I apologize if things aren't going well.",
];

const POSITIVE_REPLIES: &[&str] = &[
    "That's great to hear!",
    "I'm glad you're feeling positive.",
    "Awesome! What else is on your mind?",
];

const NEUTRAL_REPLIES: &[&str] = &[
    "I see. Please go on.",
    "Could you tell me more?",
    "Interesting.",
];

/// Produces the bot's answer to a user statement
pub trait ReplyGenerator: Send + Sync {
    fn reply(&self, text: &str, label: &DisplayLabel) -> String;
}

/// Picks one of three fixed lines for the statement's label.
///
/// Only the plain `Positive` and `Negative` labels get their own lines;
/// everything else, "Very" labels included, gets the neutral ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedReplies;

impl CannedReplies {
    pub fn new() -> Self {
        Self
    }

    /// Candidate lines for a label
    pub fn candidates(label: &DisplayLabel) -> &'static [&'static str] {
        match label.recognized() {
            Some(SentimentLabel::Negative) => NEGATIVE_REPLIES,
            Some(SentimentLabel::Positive) => POSITIVE_REPLIES,
            _ => NEUTRAL_REPLIES,
        }
    }
}

impl ReplyGenerator for CannedReplies {
    fn reply(&self, _text: &str, label: &DisplayLabel) -> String {
        let candidates = Self::candidates(label);
        candidates
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(NEUTRAL_REPLIES[0])
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_comes_from_label_bucket() {
        let replies = CannedReplies::new();
        for _ in 0..20 {
            let reply = replies.reply("bad day", &SentimentLabel::Negative.into());
            assert!(NEGATIVE_REPLIES.contains(&reply.as_str()));

            let reply = replies.reply("good day", &SentimentLabel::Positive.into());
            assert!(POSITIVE_REPLIES.contains(&reply.as_str()));
        }
    }

    #[test]
    fn test_very_and_unknown_labels_get_neutral_lines() {
        assert_eq!(
            CannedReplies::candidates(&SentimentLabel::VeryPositive.into()),
            NEUTRAL_REPLIES
        );
        assert_eq!(
            CannedReplies::candidates(&SentimentLabel::VeryNegative.into()),
            NEUTRAL_REPLIES
        );
        assert_eq!(
            CannedReplies::candidates(&DisplayLabel::Unrecognized("Joy".to_string())),
            NEUTRAL_REPLIES
        );
    }
}
