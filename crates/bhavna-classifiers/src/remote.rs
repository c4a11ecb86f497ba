//! Remote multilingual classifier (Hugging Face Inference API)
//!
//! Sends `{"inputs": text}` to `<base_url>/<model_id>` and reads back a
//! ranked list of `{label, score}` pairs. The API answers either a flat
//! list or a list wrapped in another list; both are accepted.

use crate::classifier::{ClassificationResult, Classifier};
use crate::config::RemoteConfig;
use bhavna_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Inference API text-classification client
pub struct InferenceApiClassifier {
    name: String,
    client: reqwest::Client,
    endpoint: String,
    model_id: String,
    token: Option<String>,
}

impl InferenceApiClassifier {
    /// Build a client from configuration. `token` is sent as a bearer token.
    pub fn new(config: &RemoteConfig, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        let endpoint = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            config.model_id
        );

        if token.is_none() {
            tracing::info!("No API token configured, using anonymous access (may be rate limited)");
        }

        Ok(Self {
            name: "standard".to_string(),
            client,
            endpoint,
            model_id: config.model_id.clone(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Full URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
    Error { error: String },
}

impl InferenceResponse {
    fn into_ranked(self) -> Result<Vec<(String, f64)>> {
        let entries = match self {
            Self::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            Self::Flat(entries) => entries,
            Self::Error { error } => return Err(Error::http(format!("Inference API error: {error}"))),
        };

        Ok(entries.into_iter().map(|e| (e.label, e.score)).collect())
    }
}

#[async_trait::async_trait]
impl Classifier for InferenceApiClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();

        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&InferenceRequest { inputs: text });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            return Err(Error::http(format!(
                "Inference API returned {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let ranked = serde_json::from_str::<InferenceResponse>(&body)?.into_ranked()?;
        let mut result = ClassificationResult::from_ranked(ranked)
            .ok_or_else(|| Error::http("Inference API returned no labels"))?;

        tracing::debug!(
            model = %self.model_id,
            label = %result.label,
            score = result.score,
            "Inference API output"
        );

        result.metadata.model = Some(self.model_id.clone());
        result.latency_us = start.elapsed().as_micros() as u64;
        Ok(result)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn map_reqwest_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout
    } else {
        Error::http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_model() {
        let config = RemoteConfig {
            base_url: "http://localhost:9000/models/".to_string(),
            model_id: "org/model".to_string(),
            timeout_ms: 100,
        };
        let classifier = InferenceApiClassifier::new(&config, None).unwrap();
        assert_eq!(classifier.endpoint(), "http://localhost:9000/models/org/model");
    }

    #[test]
    fn test_parses_nested_and_flat_responses() {
        let nested: InferenceResponse =
            serde_json::from_str(r#"[[{"label":"positive","score":0.9},{"label":"negative","score":0.1}]]"#)
                .unwrap();
        assert_eq!(nested.into_ranked().unwrap().len(), 2);

        let flat: InferenceResponse =
            serde_json::from_str(r#"[{"label":"neutral","score":0.6}]"#).unwrap();
        assert_eq!(flat.into_ranked().unwrap()[0].0, "neutral");
    }

    #[test]
    fn test_parses_error_payload() {
        let err: InferenceResponse =
            serde_json::from_str(r#"{"error":"Model is currently loading"}"#).unwrap();
        assert!(err.into_ranked().is_err());
    }

    #[test]
    fn test_empty_token_is_dropped() {
        let classifier =
            InferenceApiClassifier::new(&RemoteConfig::default(), Some(String::new())).unwrap();
        assert!(classifier.token.is_none());
    }
}
