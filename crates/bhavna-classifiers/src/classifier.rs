//! Classifier trait and common types

use async_trait::async_trait;
use bhavna_core::Result;

/// A text classification capability (remote API or local model)
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify the given text
    async fn classify(&self, text: &str) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of classification
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Raw classification label, as emitted by the model
    pub label: String,

    /// Confidence score (0.0-1.0)
    pub score: f64,

    /// Additional metadata
    pub metadata: ClassificationMetadata,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Create a new classification result
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
            metadata: ClassificationMetadata::default(),
            latency_us: 0,
        }
    }

    /// Pick the highest-scoring entry of a ranked list of `(label, score)`
    pub fn from_ranked(mut ranked: Vec<(String, f64)>) -> Option<Self> {
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        let (label, score) = ranked.first().cloned()?;

        Some(Self {
            label,
            score,
            metadata: ClassificationMetadata {
                all_scores: Some(ranked),
                ..Default::default()
            },
            latency_us: 0,
        })
    }
}

/// Metadata about classification
#[derive(Debug, Clone, Default)]
pub struct ClassificationMetadata {
    /// Model name or identifier
    pub model: Option<String>,

    /// All class scores, highest first (for multi-class classifiers)
    pub all_scores: Option<Vec<(String, f64)>>,
}
