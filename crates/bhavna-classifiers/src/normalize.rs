//! Score normalization
//!
//! Each adapter emits a differently shaped raw result. These pure functions
//! map every shape into a [`StatementAnalysis`] with a signed compound score
//! in [-1, 1] and a display label.

use crate::classifier::ClassificationResult;
use crate::lexicon::PolarityScores;
use bhavna_core::{AnalysisSource, DisplayLabel, SentimentLabel, StatementAnalysis, StatementScores};

/// Per-statement neutral dead zone of the lexicon scorer
pub const LEXICON_NEUTRAL_THRESHOLD: f64 = 0.05;

/// Plain positive/negative remote scores above this are promoted to "Very"
pub const VERY_TIER_THRESHOLD: f64 = 0.9;

/// Damping applied to plain positive/negative remote scores
pub const PLAIN_TIER_DAMPING: f64 = 0.5;

/// Raw adapter output, tagged by the adapter that produced it
#[derive(Debug, Clone)]
pub enum RawSentiment {
    /// Local 3-class Hinglish model
    Hinglish(ClassificationResult),
    /// Remote 5-class multilingual model
    Standard(ClassificationResult),
    /// Lexicon scorer
    Lexicon(PolarityScores),
}

impl RawSentiment {
    pub fn source(&self) -> AnalysisSource {
        match self {
            Self::Hinglish(_) => AnalysisSource::Hinglish,
            Self::Standard(_) => AnalysisSource::Standard,
            Self::Lexicon(_) => AnalysisSource::Lexicon,
        }
    }

    /// Normalize into the shared analysis schema
    pub fn normalize(&self, text: &str) -> StatementAnalysis {
        match self {
            Self::Hinglish(result) => normalize_hinglish(text, result),
            Self::Standard(result) => normalize_standard(text, result),
            Self::Lexicon(scores) => normalize_lexicon(text, scores),
        }
    }
}

/// Map a 3-class (`positive` / `negative` / `neutral`) result
pub fn normalize_hinglish(text: &str, result: &ClassificationResult) -> StatementAnalysis {
    let label = result.label.to_lowercase();
    let score = result.score;

    let (compound, sentiment) = if label.contains("positive") {
        (score, SentimentLabel::Positive)
    } else if label.contains("negative") {
        (-score, SentimentLabel::Negative)
    } else {
        (0.0, SentimentLabel::Neutral)
    };

    analysis(text, compound, sentiment.into(), score, AnalysisSource::Hinglish)
}

/// Map a 5-class result.
///
/// "Very" classes and confident plain classes pass the score through;
/// plain classes below the confidence bar are damped. Unknown labels are
/// kept, title-cased, with a zero compound.
pub fn normalize_standard(text: &str, result: &ClassificationResult) -> StatementAnalysis {
    let canonical = canonical_label(&result.label);
    let score = result.score;
    let very = canonical.starts_with("very ");

    let (compound, label) = if canonical.contains("positive") {
        if very || score > VERY_TIER_THRESHOLD {
            (score, SentimentLabel::VeryPositive.into())
        } else {
            (score * PLAIN_TIER_DAMPING, SentimentLabel::Positive.into())
        }
    } else if canonical.contains("negative") {
        if very || score > VERY_TIER_THRESHOLD {
            (-score, SentimentLabel::VeryNegative.into())
        } else {
            (-score * PLAIN_TIER_DAMPING, SentimentLabel::Negative.into())
        }
    } else if canonical.contains("neutral") {
        (0.0, SentimentLabel::Neutral.into())
    } else {
        (0.0, DisplayLabel::Unrecognized(title_case(&result.label)))
    };

    analysis(text, compound, label, score, AnalysisSource::Standard)
}

/// Map lexicon polarity scores using the per-statement dead zone
pub fn normalize_lexicon(text: &str, scores: &PolarityScores) -> StatementAnalysis {
    let compound = scores.compound;
    let label = if compound >= LEXICON_NEUTRAL_THRESHOLD {
        SentimentLabel::Positive
    } else if compound <= -LEXICON_NEUTRAL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    StatementAnalysis {
        text: text.to_string(),
        scores: StatementScores {
            pos: scores.pos,
            neg: scores.neg,
            neu: Some(scores.neu),
        },
        compound,
        label: label.into(),
        source: AnalysisSource::Lexicon,
    }
}

fn analysis(
    text: &str,
    compound: f64,
    label: DisplayLabel,
    score: f64,
    source: AnalysisSource,
) -> StatementAnalysis {
    let polarity = label.polarity();
    StatementAnalysis {
        text: text.to_string(),
        scores: StatementScores {
            pos: if polarity > 0 { score } else { 0.0 },
            neg: if polarity < 0 { score } else { 0.0 },
            neu: None,
        },
        compound,
        label,
        source,
    }
}

/// Lower-case, treat `_` and `-` as spaces, collapse whitespace
fn canonical_label(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_alpha = false;

    for c in raw.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }

    out
}
