//! Local sequence-classification model (Hinglish)
//!
//! Loads a RoBERTa-family checkpoint with candle, from a local directory or
//! the Hugging Face Hub, and serves it through the [`Classifier`] trait.
//! Labels come from the checkpoint's `id2label` table.

use crate::classifier::Classifier;
use crate::config::LocalModelConfig;
use bhavna_core::{Error, Result};
use std::sync::Arc;

#[cfg(feature = "ml-models")]
use crate::classifier::ClassificationResult;
#[cfg(feature = "ml-models")]
use candle_core::{DType, Device, Tensor, D};
#[cfg(feature = "ml-models")]
use candle_nn::VarBuilder;
#[cfg(feature = "ml-models")]
use candle_transformers::models::xlm_roberta::{
    Config as RobertaConfig, XLMRobertaForSequenceClassification,
};
#[cfg(feature = "ml-models")]
use std::collections::HashMap;
#[cfg(feature = "ml-models")]
use std::path::{Path, PathBuf};
#[cfg(feature = "ml-models")]
use std::time::Instant;
#[cfg(feature = "ml-models")]
use tokenizers::{Tokenizer, TruncationParams};

/// Load the configured local classifier.
///
/// Blocking: downloads and memory-maps weights. Call from a blocking task.
pub fn load_local_classifier(
    config: &LocalModelConfig,
    token: Option<String>,
) -> Result<Arc<dyn Classifier>> {
    #[cfg(feature = "ml-models")]
    {
        let classifier = LocalSequenceClassifier::load(config, token)?;
        Ok(Arc::new(classifier))
    }

    #[cfg(not(feature = "ml-models"))]
    {
        let _ = (config, token);
        Err(Error::model("Local models require the 'ml-models' feature"))
    }
}

/// Files a checkpoint directory must provide
#[cfg(feature = "ml-models")]
struct ModelFiles {
    config: PathBuf,
    tokenizer: PathBuf,
    weights: PathBuf,
}

#[cfg(feature = "ml-models")]
impl ModelFiles {
    fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.exists() {
            return Err(Error::model(format!(
                "Model path does not exist: {}",
                dir.display()
            )));
        }

        let safetensors = dir.join("model.safetensors");
        let weights = if safetensors.exists() {
            safetensors
        } else {
            dir.join("pytorch_model.bin")
        };

        Ok(Self {
            config: dir.join("config.json"),
            tokenizer: dir.join("tokenizer.json"),
            weights,
        })
    }

    fn from_hub(repo_id: &str, revision: &str, token: Option<String>) -> Result<Self> {
        use hf_hub::api::sync::ApiBuilder;
        use hf_hub::{Repo, RepoType};

        tracing::info!("Fetching model from Hugging Face Hub: {} @ {}", repo_id, revision);

        let mut builder = ApiBuilder::new().with_token(token);
        if let Some(cache) = dirs::cache_dir() {
            builder = builder.with_cache_dir(cache.join("bhavna").join("models"));
        }
        let api = builder
            .build()
            .map_err(|e| Error::model(format!("Failed to initialize Hub API: {e}")))?;

        let repo = api.repo(Repo::with_revision(
            repo_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ));

        let fetch = |file: &str| {
            tracing::debug!("Fetching {}", file);
            repo.get(file)
                .map_err(|e| Error::model(format!("Failed to fetch {file}: {e}")))
        };

        let config = fetch("config.json")?;
        let tokenizer = fetch("tokenizer.json")?;
        let weights = fetch("model.safetensors").or_else(|_| fetch("pytorch_model.bin"))?;

        Ok(Self {
            config,
            tokenizer,
            weights,
        })
    }
}

#[cfg(feature = "ml-models")]
#[derive(serde::Deserialize)]
struct LabelTable {
    #[serde(default)]
    id2label: HashMap<String, String>,
}

#[cfg(feature = "ml-models")]
impl LabelTable {
    /// Labels ordered by class index
    fn ordered(self) -> Result<Vec<String>> {
        let mut indexed = self
            .id2label
            .into_iter()
            .map(|(id, label)| {
                id.parse::<usize>()
                    .map(|i| (i, label))
                    .map_err(|_| Error::model(format!("Invalid id2label key: {id}")))
            })
            .collect::<Result<Vec<_>>>()?;
        indexed.sort_by_key(|(i, _)| *i);

        if indexed.is_empty() {
            return Err(Error::model("Model config has no id2label table"));
        }
        if indexed.iter().enumerate().any(|(pos, (i, _))| pos != *i) {
            return Err(Error::model("id2label indices are not contiguous"));
        }

        Ok(indexed.into_iter().map(|(_, label)| label).collect())
    }
}

#[cfg(feature = "ml-models")]
struct LoadedModel {
    tokenizer: Tokenizer,
    model: XLMRobertaForSequenceClassification,
    device: Device,
    labels: Vec<String>,
}

#[cfg(feature = "ml-models")]
impl LoadedModel {
    fn predict(&self, text: &str) -> Result<Vec<(String, f64)>> {
        let err = |what: &str| {
            let what = what.to_string();
            move |e: candle_core::Error| Error::classifier(format!("{what}: {e}"))
        };

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::classifier(format!("Tokenization failed: {e}")))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(err("Failed to create input tensor"))?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(err("Failed to create attention mask"))?;
        let token_type_ids = input_ids
            .zeros_like()
            .map_err(err("Failed to create token type tensor"))?;

        let logits = self
            .model
            .forward(&input_ids, &attention_mask, &token_type_ids)
            .map_err(err("Model forward pass failed"))?;

        let probs = candle_nn::ops::softmax(&logits, D::Minus1)
            .and_then(|t| t.squeeze(0))
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(err("Failed to read probabilities"))?;

        Ok(self
            .labels
            .iter()
            .cloned()
            .zip(probs.into_iter().map(f64::from))
            .collect())
    }
}

/// RoBERTa sequence classifier running on the CPU
#[cfg(feature = "ml-models")]
pub struct LocalSequenceClassifier {
    name: String,
    model_id: String,
    inner: Arc<LoadedModel>,
}

#[cfg(feature = "ml-models")]
impl LocalSequenceClassifier {
    /// Load from `config.path` if set, otherwise from the Hub
    pub fn load(config: &LocalModelConfig, token: Option<String>) -> Result<Self> {
        let (files, model_id) = match &config.path {
            Some(dir) => (ModelFiles::from_dir(dir)?, dir.display().to_string()),
            None => (
                ModelFiles::from_hub(&config.repo_id, &config.revision, token)?,
                config.repo_id.clone(),
            ),
        };

        let device = Device::Cpu;

        let mut tokenizer = Tokenizer::from_file(&files.tokenizer)
            .map_err(|e| Error::model(format!("Failed to load tokenizer: {e}")))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_length,
                ..Default::default()
            }))
            .map_err(|e| Error::model(format!("Failed to configure truncation: {e}")))?;

        let config_json = std::fs::read_to_string(&files.config)?;
        let model_config: RobertaConfig = serde_json::from_str(&config_json)?;
        let labels = serde_json::from_str::<LabelTable>(&config_json)?.ordered()?;

        let is_safetensors = files
            .weights
            .extension()
            .is_some_and(|ext| ext == "safetensors");
        let vb = if is_safetensors {
            // SAFETY: the weights file is not modified while mapped
            unsafe { VarBuilder::from_mmaped_safetensors(&[&files.weights], DType::F32, &device) }
        } else {
            VarBuilder::from_pth(&files.weights, DType::F32, &device)
        };
        let vb = vb.map_err(|e| Error::model(format!("Failed to load weights: {e}")))?;

        let model = XLMRobertaForSequenceClassification::new(labels.len(), &model_config, vb)
            .map_err(|e| Error::model(format!("Failed to build model: {e}")))?;

        tracing::info!(
            model = %model_id,
            labels = ?labels,
            "Loaded local sequence classifier"
        );

        Ok(Self {
            name: "hinglish".to_string(),
            model_id,
            inner: Arc::new(LoadedModel {
                tokenizer,
                model,
                device,
                labels,
            }),
        })
    }
}

#[cfg(feature = "ml-models")]
#[async_trait::async_trait]
impl Classifier for LocalSequenceClassifier {
    async fn classify(&self, text: &str) -> Result<ClassificationResult> {
        let start = Instant::now();
        let inner = Arc::clone(&self.inner);
        let input = text.to_string();

        let ranked = tokio::task::spawn_blocking(move || inner.predict(&input))
            .await
            .map_err(|e| Error::internal(format!("Inference task failed: {e}")))??;

        let mut result = ClassificationResult::from_ranked(ranked)
            .ok_or_else(|| Error::classifier("Model produced no scores"))?;
        result.metadata.model = Some(self.model_id.clone());
        result.latency_us = start.elapsed().as_micros() as u64;
        Ok(result)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(all(test, feature = "ml-models"))]
mod tests {
    use super::*;

    #[test]
    fn test_label_table_ordering() {
        let table: LabelTable = serde_json::from_str(
            r#"{"id2label": {"2": "positive", "0": "negative", "1": "neutral"}}"#,
        )
        .unwrap();
        assert_eq!(table.ordered().unwrap(), vec!["negative", "neutral", "positive"]);
    }

    #[test]
    fn test_label_table_rejects_gaps_and_empty() {
        let gap: LabelTable =
            serde_json::from_str(r#"{"id2label": {"0": "negative", "2": "positive"}}"#).unwrap();
        assert!(gap.ordered().is_err());

        let empty: LabelTable = serde_json::from_str("{}").unwrap();
        assert!(empty.ordered().is_err());
    }

    #[test]
    fn test_missing_directory_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = LocalModelConfig {
            path: Some(dir.path().join("nope")),
            ..Default::default()
        };
        assert!(LocalSequenceClassifier::load(&config, None).is_err());
    }

    #[test]
    fn test_incomplete_directory_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        let config = LocalModelConfig {
            path: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(load_local_classifier(&config, None).is_err());
    }
}
