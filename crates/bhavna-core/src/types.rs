//! Core types for Bhavna

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical sentiment label shared by every adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SentimentLabel {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    VeryNegative,
}

impl SentimentLabel {
    /// Human-readable rendering, as returned to callers
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryPositive => "Very Positive",
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
            Self::VeryNegative => "Very Negative",
        }
    }

    /// Polarity implied by the label: 1, 0 or -1
    pub fn polarity(&self) -> i8 {
        match self {
            Self::VeryPositive | Self::Positive => 1,
            Self::Neutral => 0,
            Self::Negative | Self::VeryNegative => -1,
        }
    }

    pub fn is_positive(&self) -> bool {
        self.polarity() > 0
    }

    pub fn is_negative(&self) -> bool {
        self.polarity() < 0
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Very Positive" => Ok(Self::VeryPositive),
            "Positive" => Ok(Self::Positive),
            "Neutral" => Ok(Self::Neutral),
            "Negative" => Ok(Self::Negative),
            "Very Negative" => Ok(Self::VeryNegative),
            other => Err(crate::Error::classifier(format!(
                "unknown sentiment label: {other}"
            ))),
        }
    }
}

impl Serialize for SentimentLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SentimentLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Label attached to a statement.
///
/// Classifiers occasionally emit labels outside the canonical set. Those are
/// kept as `Unrecognized` (already title-cased for display) instead of being
/// coerced, so callers decide how to render them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisplayLabel {
    Recognized(SentimentLabel),
    Unrecognized(String),
}

impl DisplayLabel {
    /// The canonical label, if any
    pub fn recognized(&self) -> Option<SentimentLabel> {
        match self {
            Self::Recognized(label) => Some(*label),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::Recognized(_))
    }

    /// Polarity of the label; unrecognized labels carry none
    pub fn polarity(&self) -> i8 {
        self.recognized().map_or(0, |label| label.polarity())
    }
}

impl fmt::Display for DisplayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recognized(label) => f.write_str(label.as_str()),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}

impl From<SentimentLabel> for DisplayLabel {
    fn from(label: SentimentLabel) -> Self {
        Self::Recognized(label)
    }
}

impl From<String> for DisplayLabel {
    fn from(raw: String) -> Self {
        match raw.parse::<SentimentLabel>() {
            Ok(label) => Self::Recognized(label),
            Err(_) => Self::Unrecognized(raw),
        }
    }
}

impl From<DisplayLabel> for String {
    fn from(label: DisplayLabel) -> Self {
        label.to_string()
    }
}

impl PartialEq<SentimentLabel> for DisplayLabel {
    fn eq(&self, other: &SentimentLabel) -> bool {
        self.recognized() == Some(*other)
    }
}

/// Which adapter produced an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    /// Local Hinglish pipeline
    Hinglish,
    /// Remote multilingual model
    Standard,
    /// Rule-based lexicon fallback
    Lexicon,
}

impl AnalysisSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hinglish => "hinglish",
            Self::Standard => "standard",
            Self::Lexicon => "lexicon",
        }
    }
}

impl fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification route chosen for a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    /// Romanized Hindi / code-mixed text
    Hinglish,
    /// English, native-script Hindi and everything else
    Standard,
}

/// Per-statement score magnitudes.
///
/// Values are adapter specific and not comparable across adapters; only
/// `StatementAnalysis::compound` is.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatementScores {
    pub pos: f64,
    pub neg: f64,

    /// Neutral proportion (lexicon scorer only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neu: Option<f64>,
}

/// Sentiment judgment for one statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementAnalysis {
    /// Original input text
    pub text: String,

    /// Adapter-specific magnitudes
    pub scores: StatementScores,

    /// Signed score in [-1, 1], comparable across adapters
    pub compound: f64,

    /// Display label
    pub label: DisplayLabel,

    /// Adapter that produced this analysis
    pub source: AnalysisSource,
}

/// Direction of sentiment across a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Stable,
    Improving,
    Declining,
    #[serde(rename = "No data")]
    NoData,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "Stable",
            Self::Improving => "Improving",
            Self::Declining => "Declining",
            Self::NoData => "No data",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversation-level summary, recomputed on every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub compound: f64,
    pub label: SentimentLabel,
    pub trend: Trend,
}

impl ConversationSummary {
    /// Summary of a conversation with no statements
    pub fn empty() -> Self {
        Self {
            compound: 0.0,
            label: SentimentLabel::Neutral,
            trend: Trend::NoData,
        }
    }
}

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// A single entry in the conversation history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,

    /// Present on user turns only
    pub sentiment: Option<StatementAnalysis>,
}

impl Turn {
    /// Create a user turn carrying its analysis
    pub fn user(content: impl Into<String>, sentiment: StatementAnalysis) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            sentiment: Some(sentiment),
        }
    }

    /// Create a bot turn
    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
            sentiment: None,
        }
    }
}
