use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{retriever::DEFAULT_OVERFETCH_FACTOR, semantic::DEFAULT_MODEL};

const CONFIG_FILE: &str = "config.yaml";

pub const ENV_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_API_URL: &str = "GROQ_API_URL";
pub const ENV_MODEL: &str = "GROQ_MODEL";
pub const ENV_PORT: &str = "PORT";

const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_MAX_TOKENS: u32 = 1200;
const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful Indian travel assistant.";
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;

/// Context entries retrieved per itinerary request
const DEFAULT_TOP_K: usize = 6;
/// Context entries retrieved per `yatra query` question
const DEFAULT_QUERY_TOP_K: usize = 5;
const DEFAULT_BATCH_SIZE: usize = 32;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Data file locations. Relative paths are resolved against the base path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_catalog_path")]
    pub catalog: String,
    #[serde(default = "default_index_path")]
    pub index: String,
    #[serde(default = "default_labels_path")]
    pub labels: String,
    /// Embedding model cache
    #[serde(default = "default_models_path")]
    pub models: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog_path(),
            index: default_index_path(),
            labels: default_labels_path(),
            models: default_models_path(),
        }
    }
}

fn default_catalog_path() -> String {
    "data/india_monuments.json".to_string()
}

fn default_index_path() -> String {
    "embeddings/monuments.index".to_string()
}

fn default_labels_path() -> String {
    "embeddings/labels.json".to_string()
}

fn default_models_path() -> String {
    "embeddings/models".to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Model name for embeddings (e.g., "all-MiniLM-L6-v2")
    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default = "default_query_top_k")]
    pub query_top_k: usize,

    /// Index candidates fetched per requested result
    #[serde(default = "default_overfetch_factor")]
    pub overfetch_factor: usize,

    /// Texts per embedding call during `build-index`
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            top_k: default_top_k(),
            query_top_k: default_query_top_k(),
            overfetch_factor: default_overfetch_factor(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_embedding_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_query_top_k() -> usize {
    DEFAULT_QUERY_TOP_K
}

fn default_overfetch_factor() -> usize {
    DEFAULT_OVERFETCH_FACTOR
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Omitted from the request when unset
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Sent as the system message; empty disables it
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Whole-request timeout; `null` waits indefinitely
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: Option<u64>,

    /// Only ever read from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_llm_model(),
            max_tokens: default_max_tokens(),
            temperature: None,
            system_prompt: default_system_prompt(),
            timeout_secs: default_llm_timeout_secs(),
            api_key: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_llm_model() -> String {
    DEFAULT_LLM_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_llm_timeout_secs() -> Option<u64> {
    Some(DEFAULT_LLM_TIMEOUT_SECS)
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: PathBuf,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let retrieval = &self.retrieval;
        if retrieval.top_k == 0 {
            bail!("retrieval.top_k must be greater than 0");
        }
        if retrieval.query_top_k == 0 {
            bail!("retrieval.query_top_k must be greater than 0");
        }
        if retrieval.overfetch_factor == 0 {
            bail!("retrieval.overfetch_factor must be greater than 0");
        }
        if retrieval.batch_size == 0 {
            bail!("retrieval.batch_size must be greater than 0");
        }

        let llm = &self.llm;
        if llm.api_url.trim().is_empty() {
            bail!("llm.api_url must not be empty");
        }
        if llm.model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }
        if llm.max_tokens == 0 {
            bail!("llm.max_tokens must be greater than 0");
        }
        if llm.timeout_secs == Some(0) {
            bail!("llm.timeout_secs must be greater than 0 or null");
        }

        Ok(())
    }

    /// Load `config.yaml` from `base_path`, writing defaults when it does not exist.
    pub fn load_with(base_path: &str) -> anyhow::Result<Self> {
        let base = PathBuf::from(base_path);
        let path = base.join(CONFIG_FILE);

        if !path.exists() {
            std::fs::create_dir_all(&base)
                .with_context(|| format!("failed to create {}", base.display()))?;
            std::fs::write(&path, serde_yml::to_string(&Self::default())?)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote default config to {}", path.display());
        }

        let config_str = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let mut config: Self = serde_yml::from_str(&config_str)
            .with_context(|| format!("config {} is malformed", path.display()))?;

        config.base_path = base;
        config.validate()?;

        Ok(config)
    }

    /// Apply `GROQ_*` and `PORT` overrides from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = lookup(ENV_API_KEY) {
            self.llm.api_key = Some(key.trim().to_string());
        }
        if let Some(url) = lookup(ENV_API_URL) {
            self.llm.api_url = url;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.llm.model = model;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PORT} is not a valid port: {port:?}"))?;
        }

        Ok(())
    }

    pub fn apply_process_env(&mut self) -> anyhow::Result<()> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a configured path against the base path.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.resolve(&self.paths.catalog)
    }

    pub fn index_path(&self) -> PathBuf {
        self.resolve(&self.paths.index)
    }

    pub fn labels_path(&self) -> PathBuf {
        self.resolve(&self.paths.labels)
    }

    pub fn models_path(&self) -> PathBuf {
        self.resolve(&self.paths.models)
    }
}
