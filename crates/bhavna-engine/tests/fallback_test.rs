//! Routing and sticky fallback behavior of the sentiment engine

mod common;

use bhavna_core::{AnalysisSource, DisplayLabel, SentimentLabel};
use bhavna_engine::{RoutingMode, RoutingState, SentimentEngine};
use common::{FailingClassifier, FixedClassifier, SlowClassifier};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_standard_route_confident_positive() {
    let standard = FixedClassifier::new("standard", "positive", 0.95);
    let hinglish = FixedClassifier::new("hinglish", "negative", 0.9);
    let engine = SentimentEngine::builder(standard.clone())
        .hinglish(hinglish.clone())
        .build()
        .unwrap();

    let analysis = engine.analyze_statement("I love this!").await;

    assert_eq!(analysis.label, SentimentLabel::VeryPositive);
    assert!((analysis.compound - 0.95).abs() < 1e-6);
    assert_eq!(analysis.source, AnalysisSource::Standard);
    assert_eq!(standard.calls(), 1);
    assert_eq!(hinglish.calls(), 0);
}

#[tokio::test]
async fn test_standard_route_plain_positive_is_damped() {
    let standard = FixedClassifier::new("standard", "positive", 0.6);
    let engine = SentimentEngine::builder(standard).build().unwrap();

    let analysis = engine.analyze_statement("I love this!").await;
    assert_eq!(analysis.label, SentimentLabel::Positive);
    assert!((analysis.compound - 0.3).abs() < 1e-6);
}

#[tokio::test]
async fn test_hinglish_text_uses_local_model() {
    let standard = FixedClassifier::new("standard", "positive", 0.95);
    let hinglish = FixedClassifier::new("hinglish", "positive", 0.8);
    let engine = SentimentEngine::builder(standard.clone())
        .hinglish(hinglish.clone())
        .build()
        .unwrap();

    let analysis = engine.analyze_statement("yeh movie bahut acha hai bhai").await;

    assert_eq!(analysis.source, AnalysisSource::Hinglish);
    assert_eq!(analysis.label, SentimentLabel::Positive);
    assert!((analysis.compound - 0.8).abs() < 1e-6);
    assert_eq!(hinglish.calls(), 1);
    assert_eq!(standard.calls(), 0);
}

#[tokio::test]
async fn test_english_with_shared_vocabulary_uses_local_model() {
    let standard = FixedClassifier::new("standard", "positive", 0.95);
    let hinglish = FixedClassifier::new("hinglish", "positive", 0.8);
    let engine = SentimentEngine::builder(standard.clone())
        .hinglish(hinglish.clone())
        .build()
        .unwrap();

    let analysis = engine.analyze_statement("the movie was great").await;

    assert_eq!(analysis.source, AnalysisSource::Hinglish);
    assert_eq!(hinglish.calls(), 1);
    assert_eq!(standard.calls(), 0);
}

#[tokio::test]
async fn test_hinglish_text_without_local_model_uses_standard() {
    let standard = FixedClassifier::new("standard", "negative", 0.7);
    let engine = SentimentEngine::builder(standard.clone()).build().unwrap();
    assert!(!engine.hinglish_available());

    let analysis = engine.analyze_statement("tu mujhe pasandh heh").await;

    assert_eq!(analysis.source, AnalysisSource::Standard);
    assert_eq!(analysis.label, SentimentLabel::Negative);
    assert!((analysis.compound + 0.35).abs() < 1e-6);
    assert_eq!(standard.calls(), 1);
}

#[tokio::test]
async fn test_devanagari_uses_standard_even_with_local_model() {
    let standard = FixedClassifier::new("standard", "positive", 0.92);
    let hinglish = FixedClassifier::new("hinglish", "positive", 0.8);
    let engine = SentimentEngine::builder(standard.clone())
        .hinglish(hinglish.clone())
        .build()
        .unwrap();

    let analysis = engine.analyze_statement("मुझे यह फिल्म बहुत पसंद है").await;

    assert_eq!(analysis.source, AnalysisSource::Standard);
    assert_eq!(hinglish.calls(), 0);
}

#[tokio::test]
async fn test_unknown_label_is_kept_title_cased() {
    let standard = FixedClassifier::new("standard", "mixed feelings", 0.5);
    let engine = SentimentEngine::builder(standard).build().unwrap();

    let analysis = engine.analyze_statement("hmm").await;
    assert_eq!(
        analysis.label,
        DisplayLabel::Unrecognized("Mixed Feelings".to_string())
    );
    assert_eq!(analysis.compound, 0.0);
}

#[tokio::test]
async fn test_failure_falls_back_and_demotes() {
    let standard = FailingClassifier::new();
    let engine = SentimentEngine::builder(standard.clone()).build().unwrap();
    assert_eq!(engine.routing_mode(), RoutingMode::AdapterRouted);

    let first = engine.analyze_statement("I am so sad and angry").await;
    assert_eq!(first.source, AnalysisSource::Lexicon);
    assert_eq!(first.label, SentimentLabel::Negative);
    assert!(first.compound <= -0.05);
    assert_eq!(engine.routing_mode(), RoutingMode::LexiconOnly);

    let second = engine.analyze_statement("This is great").await;
    assert_eq!(second.source, AnalysisSource::Lexicon);
    assert_eq!(second.label, SentimentLabel::Positive);

    // Demotion is sticky: the failed adapter is never retried
    assert_eq!(standard.calls(), 1);
}

#[tokio::test]
async fn test_local_model_failure_also_demotes() {
    let standard = FixedClassifier::new("standard", "positive", 0.95);
    let hinglish = FailingClassifier::new();
    let engine = SentimentEngine::builder(standard.clone())
        .hinglish(hinglish.clone())
        .build()
        .unwrap();

    let analysis = engine.analyze_statement("kya bakwas hai yaar").await;
    assert_eq!(analysis.source, AnalysisSource::Lexicon);
    assert_eq!(analysis.label, SentimentLabel::Negative);

    let english = engine.analyze_statement("I love this!").await;
    assert_eq!(english.source, AnalysisSource::Lexicon);
    assert_eq!(standard.calls(), 0);
    assert_eq!(hinglish.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_counts_as_failure() {
    let standard = SlowClassifier::new(Duration::from_secs(60));
    let engine = SentimentEngine::builder(standard.clone())
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let analysis = engine.analyze_statement("what a wonderful day").await;

    assert_eq!(analysis.source, AnalysisSource::Lexicon);
    assert_eq!(analysis.label, SentimentLabel::Positive);
    assert_eq!(engine.routing_mode(), RoutingMode::LexiconOnly);
    assert_eq!(standard.calls(), 1);
}

#[tokio::test]
async fn test_engine_constructed_lexicon_only_never_calls_adapters() {
    let standard = FixedClassifier::new("standard", "positive", 0.95);
    let hinglish = FixedClassifier::new("hinglish", "positive", 0.95);
    let engine = SentimentEngine::builder(standard.clone())
        .hinglish(hinglish.clone())
        .routing_state(Arc::new(RoutingState::lexicon_only()))
        .build()
        .unwrap();

    for text in ["I love this!", "yeh acha hai bhai", "बहुत बढ़िया", ""] {
        let analysis = engine.analyze_statement(text).await;
        assert_eq!(analysis.source, AnalysisSource::Lexicon);
    }
    assert_eq!(standard.calls(), 0);
    assert_eq!(hinglish.calls(), 0);
}

#[tokio::test]
async fn test_shared_routing_state_demotes_every_engine() {
    let routing = Arc::new(RoutingState::new());
    let failing = FailingClassifier::new();
    let healthy = FixedClassifier::new("standard", "positive", 0.95);

    let first = SentimentEngine::builder(failing)
        .routing_state(Arc::clone(&routing))
        .build()
        .unwrap();
    let second = SentimentEngine::builder(healthy.clone())
        .routing_state(Arc::clone(&routing))
        .build()
        .unwrap();

    first.analyze_statement("hello").await;
    let analysis = second.analyze_statement("I love this!").await;

    assert_eq!(analysis.source, AnalysisSource::Lexicon);
    assert_eq!(healthy.calls(), 0);
}

#[tokio::test]
async fn test_empty_text_is_analyzed() {
    let engine = SentimentEngine::builder(FailingClassifier::new())
        .build()
        .unwrap();

    let analysis = engine.analyze_statement("").await;
    assert_eq!(analysis.label, SentimentLabel::Neutral);
    assert_eq!(analysis.compound, 0.0);
}
