//! Fallback chain controller
//!
//! Dispatches each statement to one adapter, normalizes the result and
//! recovers from adapter failures by demoting the whole process to the
//! lexicon scorer. [`SentimentEngine::analyze_statement`] always returns an
//! analysis.

use crate::routing::{RoutingMode, RoutingState};
use bhavna_classifiers::{
    load_local_classifier, Classifier, EngineConfig, InferenceApiClassifier, LexiconScorer,
    RawSentiment, ScriptRouter, WhatlangIdentifier,
};
use bhavna_core::{AnalysisSource, Result, Route, StatementAnalysis};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default per-call adapter timeout
pub const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(10);

/// Sentiment engine shared by all sessions
pub struct SentimentEngine {
    hinglish: Option<Arc<dyn Classifier>>,
    standard: Arc<dyn Classifier>,
    lexicon: LexiconScorer,
    router: ScriptRouter,
    routing: Arc<RoutingState>,
    timeout: Duration,
}

impl SentimentEngine {
    /// Start building an engine around the standard adapter
    pub fn builder(standard: Arc<dyn Classifier>) -> SentimentEngineBuilder {
        SentimentEngineBuilder::new(standard)
    }

    /// Build the production engine from configuration.
    ///
    /// The remote client must be constructible. A local model that fails to
    /// load only disables the Hinglish route.
    pub async fn from_config(config: &EngineConfig, token: Option<String>) -> Result<Self> {
        let standard: Arc<dyn Classifier> =
            Arc::new(InferenceApiClassifier::new(&config.remote, token.clone())?);
        info!("Remote classifier: {}", config.remote.model_id);

        let hinglish = if config.local.enabled {
            load_hinglish(config, token).await
        } else {
            info!("Local Hinglish model disabled by configuration");
            None
        };

        let mut router = ScriptRouter::new();
        if let Some(keywords) = &config.routing.hinglish_keywords {
            router = router.with_keywords(keywords);
        }
        if config.routing.language_identification {
            router = router.with_identifier(Arc::new(WhatlangIdentifier::new()));
        }

        let lexicon = LexiconScorer::with_extra_entries(config.lexicon.extra_entries.clone())?;
        info!("Lexicon scorer ready with {} entries", lexicon.len());

        let mut builder = Self::builder(standard)
            .router(router)
            .lexicon(lexicon)
            .timeout(Duration::from_millis(config.remote.timeout_ms));
        if let Some(hinglish) = hinglish {
            builder = builder.hinglish(hinglish);
        }
        builder.build()
    }

    /// Analyze one statement. Never fails.
    pub async fn analyze_statement(&self, text: &str) -> StatementAnalysis {
        if self.routing.is_lexicon_only() {
            return self.lexicon_analysis(text);
        }

        let route = self.router.classify_route(text);
        let (source, classifier) = match (route, &self.hinglish) {
            (Route::Hinglish, Some(hinglish)) => (AnalysisSource::Hinglish, hinglish),
            _ => (AnalysisSource::Standard, &self.standard),
        };
        debug!(?route, adapter = %source, "Routing statement");

        let failure = match tokio::time::timeout(self.timeout, classifier.classify(text)).await {
            Ok(Ok(result)) => {
                debug!(
                    adapter = %source,
                    label = %result.label,
                    score = result.score,
                    "Raw classifier output"
                );
                metrics::histogram!("bhavna_classifier_latency_us", "source" => source.as_str())
                    .record(result.latency_us as f64);

                let raw = match source {
                    AnalysisSource::Hinglish => RawSentiment::Hinglish(result),
                    _ => RawSentiment::Standard(result),
                };
                metrics::counter!("bhavna_statements_total", "source" => source.as_str())
                    .increment(1);
                return raw.normalize(text);
            }
            Ok(Err(e)) => e.to_string(),
            Err(_) => format!("timed out after {}ms", self.timeout.as_millis()),
        };

        warn!(adapter = %source, error = %failure, "Adapter failed, falling back to lexicon");
        metrics::counter!("bhavna_adapter_failures_total", "adapter" => source.as_str())
            .increment(1);
        if self.routing.demote() {
            warn!("Routing demoted to lexicon-only for the rest of the process");
            metrics::counter!("bhavna_routing_demotions_total").increment(1);
        }

        self.lexicon_analysis(text)
    }

    fn lexicon_analysis(&self, text: &str) -> StatementAnalysis {
        let start = Instant::now();
        let raw = RawSentiment::Lexicon(self.lexicon.polarity_scores(text));
        metrics::histogram!("bhavna_classifier_latency_us", "source" => "lexicon")
            .record(start.elapsed().as_micros() as f64);
        metrics::counter!("bhavna_statements_total", "source" => "lexicon").increment(1);
        raw.normalize(text)
    }

    /// Current routing mode
    pub fn routing_mode(&self) -> RoutingMode {
        self.routing.mode()
    }

    /// Shared routing state
    pub fn routing_state(&self) -> &Arc<RoutingState> {
        &self.routing
    }

    /// Whether the Hinglish route has a loaded model
    pub fn hinglish_available(&self) -> bool {
        self.hinglish.is_some()
    }
}

async fn load_hinglish(config: &EngineConfig, token: Option<String>) -> Option<Arc<dyn Classifier>> {
    let local = config.local.clone();
    info!("Loading local Hinglish model: {}", local.repo_id);

    match tokio::task::spawn_blocking(move || load_local_classifier(&local, token)).await {
        Ok(Ok(classifier)) => {
            info!("Local Hinglish model loaded");
            Some(classifier)
        }
        Ok(Err(e)) => {
            warn!("Could not load Hinglish model, Hinglish route disabled: {}", e);
            None
        }
        Err(e) => {
            warn!("Hinglish model loader panicked, Hinglish route disabled: {}", e);
            None
        }
    }
}

/// Builder for [`SentimentEngine`]
pub struct SentimentEngineBuilder {
    hinglish: Option<Arc<dyn Classifier>>,
    standard: Arc<dyn Classifier>,
    lexicon: Option<LexiconScorer>,
    router: ScriptRouter,
    routing: Arc<RoutingState>,
    timeout: Duration,
}

impl SentimentEngineBuilder {
    pub fn new(standard: Arc<dyn Classifier>) -> Self {
        Self {
            hinglish: None,
            standard,
            lexicon: None,
            router: ScriptRouter::new(),
            routing: Arc::new(RoutingState::new()),
            timeout: DEFAULT_ADAPTER_TIMEOUT,
        }
    }

    /// Enable the Hinglish route
    pub fn hinglish(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.hinglish = Some(classifier);
        self
    }

    pub fn router(mut self, router: ScriptRouter) -> Self {
        self.router = router;
        self
    }

    pub fn lexicon(mut self, lexicon: LexiconScorer) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    /// Share a routing state with other engines
    pub fn routing_state(mut self, routing: Arc<RoutingState>) -> Self {
        self.routing = routing;
        self
    }

    /// Per-call adapter timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the engine, creating the default lexicon if none was given
    pub fn build(self) -> Result<SentimentEngine> {
        let lexicon = match self.lexicon {
            Some(lexicon) => lexicon,
            None => LexiconScorer::new()?,
        };

        Ok(SentimentEngine {
            hinglish: self.hinglish,
            standard: self.standard,
            lexicon,
            router: self.router,
            routing: self.routing,
            timeout: self.timeout,
        })
    }
}
