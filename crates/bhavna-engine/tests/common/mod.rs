//! Classifier doubles shared by the engine tests

#![allow(dead_code)]

use async_trait::async_trait;
use bhavna_classifiers::{ClassificationResult, Classifier};
use bhavna_core::{Error, Result};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Always returns the same label and score
pub struct FixedClassifier {
    name: String,
    label: String,
    score: f64,
    calls: AtomicU32,
}

impl FixedClassifier {
    pub fn new(name: &str, label: &str, score: f64) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            label: label.to_string(),
            score,
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ClassificationResult::new(self.label.clone(), self.score))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Always fails
pub struct FailingClassifier {
    calls: AtomicU32,
}

impl FailingClassifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::http("connection refused"))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Answers only after a long delay
pub struct SlowClassifier {
    delay: Duration,
    calls: AtomicU32,
}

impl SlowClassifier {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for SlowClassifier {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(ClassificationResult::new("positive", 0.99))
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Returns `positive` with the next score from a fixed script
pub struct ScriptedScores {
    scores: Vec<f64>,
    calls: AtomicU32,
}

impl ScriptedScores {
    pub fn new(scores: &[f64]) -> Arc<Self> {
        Arc::new(Self {
            scores: scores.to_vec(),
            calls: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl Classifier for ScriptedScores {
    async fn classify(&self, _text: &str) -> Result<ClassificationResult> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        let score = self
            .scores
            .get(call)
            .copied()
            .ok_or_else(|| Error::classifier("script exhausted"))?;
        Ok(ClassificationResult::new("positive", score))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
