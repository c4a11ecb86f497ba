//! Conversation trend aggregation

use bhavna_core::{ConversationSummary, SentimentLabel, StatementAnalysis, Trend};

/// Conversation-level neutral dead zone
pub const CONVERSATION_NEUTRAL_THRESHOLD: f64 = 0.1;

/// Minimum shift between halves to call a trend
pub const TREND_THRESHOLD: f64 = 0.2;

/// Summarize a sequence of statement analyses
pub fn summarize(analyses: &[StatementAnalysis]) -> ConversationSummary {
    let scores: Vec<f64> = analyses.iter().map(|a| a.compound).collect();
    summarize_scores(&scores)
}

/// Summarize a sequence of compound scores.
///
/// The mean decides the label. For the trend the sequence is split at
/// `len / 2`, so the second half gets the extra element on odd lengths.
pub fn summarize_scores(scores: &[f64]) -> ConversationSummary {
    let Some(compound) = mean(scores) else {
        return ConversationSummary::empty();
    };

    let label = if compound >= CONVERSATION_NEUTRAL_THRESHOLD {
        SentimentLabel::Positive
    } else if compound <= -CONVERSATION_NEUTRAL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    ConversationSummary {
        compound,
        label,
        trend: trend(scores),
    }
}

fn trend(scores: &[f64]) -> Trend {
    if scores.len() <= 1 {
        return Trend::Stable;
    }

    let (first, second) = scores.split_at(scores.len() / 2);
    match (mean(first), mean(second)) {
        (Some(first), Some(second)) if second - first > TREND_THRESHOLD => Trend::Improving,
        (Some(first), Some(second)) if first - second > TREND_THRESHOLD => Trend::Declining,
        _ => Trend::Stable,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: f64 = values.iter().sum();
    Some(sum / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_is_no_data() {
        let summary = summarize(&[]);
        assert_eq!(summary.compound, 0.0);
        assert_eq!(summary.label, SentimentLabel::Neutral);
        assert_eq!(summary.trend, Trend::NoData);
    }

    #[test]
    fn test_declining() {
        let summary = summarize_scores(&[0.8, 0.9, -0.8, -0.9]);
        assert_eq!(summary.trend, Trend::Declining);
        assert!(summary.compound.abs() < 1e-6);
        assert_eq!(summary.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_improving() {
        let summary = summarize_scores(&[-0.5, -0.4, 0.3, 0.6]);
        assert_eq!(summary.trend, Trend::Improving);
    }

    #[test]
    fn test_flat_sequence_is_stable() {
        assert_eq!(summarize_scores(&[0.1, 0.1, 0.1]).trend, Trend::Stable);
    }

    #[test]
    fn test_shift_of_exactly_threshold_is_stable() {
        // 0.3 - 0.1 is 0.19999999999999998 in double precision
        assert_eq!(summarize_scores(&[0.1, 0.3]).trend, Trend::Stable);
        assert_eq!(summarize_scores(&[0.3, 0.1]).trend, Trend::Stable);
        assert_eq!(summarize_scores(&[0.1, 0.1, 0.3, 0.3]).trend, Trend::Stable);
    }

    #[test]
    fn test_opposite_pair_averages_to_neutral() {
        let summary = summarize_scores(&[1.0, -1.0]);
        assert_eq!(summary.compound, 0.0);
        assert_eq!(summary.label, SentimentLabel::Neutral);
    }

    #[test]
    fn test_single_statement_is_stable() {
        let summary = summarize_scores(&[-0.7]);
        assert_eq!(summary.trend, Trend::Stable);
        assert_eq!(summary.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_odd_length_extra_goes_to_second_half() {
        // first = [0.0], second = [0.0, 0.9]: shift 0.45
        assert_eq!(summarize_scores(&[0.0, 0.0, 0.9]).trend, Trend::Improving);
        // first = [0.0], second = [0.5]
        assert_eq!(summarize_scores(&[0.0, 0.5]).trend, Trend::Improving);
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(summarize_scores(&[0.1]).label, SentimentLabel::Positive);
        assert_eq!(summarize_scores(&[0.09]).label, SentimentLabel::Neutral);
        assert_eq!(summarize_scores(&[-0.1]).label, SentimentLabel::Negative);
    }

    proptest! {
        #[test]
        fn prop_summary_is_idempotent(scores in proptest::collection::vec(-1.0f64..=1.0, 0..40)) {
            prop_assert_eq!(summarize_scores(&scores), summarize_scores(&scores));
        }

        #[test]
        fn prop_compound_stays_in_range(scores in proptest::collection::vec(-1.0f64..=1.0, 1..40)) {
            let summary = summarize_scores(&scores);
            prop_assert!((-1.0..=1.0).contains(&summary.compound));
            prop_assert_ne!(summary.trend, Trend::NoData);
        }
    }
}
