//! Configuration for classifiers, routing and model loading

use bhavna_core::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Remote multilingual classifier
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Local Hinglish classifier
    #[serde(default)]
    pub local: LocalModelConfig,

    /// Route selection
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Lexicon fallback
    #[serde(default)]
    pub lexicon: LexiconConfig,
}

impl EngineConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> bhavna_core::Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> bhavna_core::Result<()> {
        if self.remote.model_id.trim().is_empty() {
            return Err(Error::config("remote.model_id must not be empty"));
        }
        if self.remote.timeout_ms == 0 {
            return Err(Error::config("remote.timeout_ms must be positive"));
        }
        if self.local.enabled && self.local.max_length == 0 {
            return Err(Error::config("local.max_length must be positive"));
        }
        if let Some((word, _)) = self
            .lexicon
            .extra_entries
            .iter()
            .find(|(_, valence)| !valence.is_finite())
        {
            return Err(Error::config(format!(
                "lexicon.extra_entries.{word} must be a finite number"
            )));
        }
        Ok(())
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> bhavna_core::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load from file if it exists, otherwise use defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> bhavna_core::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!("Config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }
}

/// Remote Inference API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL; the model id is appended as a path
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier passed to the API
    #[serde(default = "default_remote_model")]
    pub model_id: String,

    /// Per-call timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model_id: default_remote_model(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Local model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalModelConfig {
    /// Load the local model at startup
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Hugging Face Hub repository
    #[serde(default = "default_local_repo")]
    pub repo_id: String,

    /// Hub revision
    #[serde(default = "default_revision")]
    pub revision: String,

    /// Local model directory; takes precedence over the hub
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Maximum tokens fed to the model
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            repo_id: default_local_repo(),
            revision: default_revision(),
            path: None,
            max_length: default_max_length(),
        }
    }
}

/// Routing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Consult the language identifier before the keyword check
    #[serde(default = "default_true")]
    pub language_identification: bool,

    /// Replacement Hinglish vocabulary
    #[serde(default)]
    pub hinglish_keywords: Option<Vec<String>>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            language_identification: true,
            hinglish_keywords: None,
        }
    }
}

/// Lexicon settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Additional word valences in [-4, 4]
    #[serde(default)]
    pub extra_entries: HashMap<String, f64>,
}

fn default_base_url() -> String {
    "https://router.huggingface.co/hf-inference/models".to_string()
}

fn default_remote_model() -> String {
    "lxyuan/distilbert-base-multilingual-cased-sentiments-student".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_local_repo() -> String {
    "pascalrai/hinglish-twitter-roberta-base-sentiment".to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_max_length() -> usize {
    128
}

fn default_true() -> bool {
    true
}
