//! Bhavna Classifiers
//!
//! Sentiment adapters and the pure logic around them.
//!
//! Three adapters produce raw sentiment for a single statement:
//! - A local Hinglish sequence classifier (candle, `ml-models` feature)
//! - A remote multilingual classifier behind the Hugging Face Inference API
//! - A lexicon scorer that cannot fail
//!
//! The router picks between the two model adapters per statement and the
//! normalizer maps every raw result into one schema.

pub mod classifier;
pub mod config;
pub mod language;
pub mod lexicon;
pub mod local_model;
pub mod normalize;
pub mod remote;
pub mod router;

pub use classifier::{ClassificationMetadata, ClassificationResult, Classifier};
pub use config::{EngineConfig, LexiconConfig, LocalModelConfig, RemoteConfig, RoutingConfig};
pub use language::{LanguageIdentifier, WhatlangIdentifier};
pub use lexicon::{LexiconScorer, PolarityScores};
pub use local_model::load_local_classifier;
#[cfg(feature = "ml-models")]
pub use local_model::LocalSequenceClassifier;
pub use normalize::RawSentiment;
pub use remote::InferenceApiClassifier;
pub use router::{contains_devanagari, ScriptRouter, HINGLISH_KEYWORDS};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassificationResult, Classifier};
    pub use crate::lexicon::LexiconScorer;
    pub use crate::normalize::RawSentiment;
    pub use crate::remote::InferenceApiClassifier;
    pub use crate::router::ScriptRouter;
}
