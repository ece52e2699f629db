use crate::{
    app::planner::ItineraryPlanner,
    catalog::Catalog,
    config::Config,
    llm::ChatCompletionClient,
    retriever::Retriever,
    semantic::{Embedder, EmbeddingModel, IndexStorage, LabelStorage},
};
use anyhow::{bail, Context, Result};
use std::sync::Arc;

/// Builds the process-wide read-only state once, at startup.
pub struct AppFactory;

impl AppFactory {
    /// Base directory holding `config.yaml` and relative data paths
    pub fn base_path() -> String {
        std::env::var("YATRA_BASE_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| ".".to_string())
    }

    /// Load config from `base_path` and apply environment overrides.
    pub fn load_config(base_path: &str) -> Result<Config> {
        let mut config = Config::load_with(base_path)?;
        config.apply_process_env()?;
        log::debug!("using config from {}", config.base_path().display());
        Ok(config)
    }

    pub fn create_embedder(config: &Config) -> Result<Arc<EmbeddingModel>> {
        let model = EmbeddingModel::new(&config.retrieval.model, config.models_path())
            .context("failed to load embedding model")?;
        Ok(Arc::new(model))
    }

    pub fn load_catalog(config: &Config) -> Result<Arc<Catalog>> {
        let catalog = Catalog::load(&config.catalog_path())
            .context("monument catalog not found - check paths.catalog")?;
        Ok(Arc::new(catalog))
    }

    /// Load catalog, index and labels from disk and wire them to `embedder`.
    pub fn create_retriever(config: &Config, embedder: Arc<dyn Embedder>) -> Result<Retriever> {
        let catalog = Self::load_catalog(config)?;

        let index_storage = IndexStorage::new(config.index_path());
        if !index_storage.exists() {
            bail!(
                "vector index {} not found - run `yatra build-index` first",
                index_storage.path().display()
            );
        }
        let index = index_storage
            .load(&embedder.model_id(), embedder.dimensions())
            .with_context(|| {
                format!(
                    "failed to load vector index {} - run `yatra build-index` first",
                    index_storage.path().display()
                )
            })?;

        let label_storage = LabelStorage::new(config.labels_path());
        let labels = label_storage
            .load()
            .context("failed to load index labels - run `yatra build-index` first")?;

        check_alignment(index.len(), labels.len())?;
        log::info!("loaded {} indexed monuments", index.len());

        Ok(
            Retriever::new(embedder, Arc::new(index), labels, catalog)
                .with_overfetch_factor(config.retrieval.overfetch_factor),
        )
    }

    pub fn create_llm(config: &Config) -> Result<ChatCompletionClient> {
        let client = ChatCompletionClient::new(config.llm.clone())
            .context("failed to build LLM http client")?;

        log::info!("LLM model {}", client.model());
        if !client.has_api_key() {
            log::warn!("GROQ_API_KEY is not set; itinerary requests will fail until it is");
        }

        Ok(client)
    }

    /// Everything the HTTP server and `yatra plan` need.
    pub fn create_planner(config: &Config) -> Result<ItineraryPlanner> {
        let embedder = Self::create_embedder(config)?;
        let retriever = Self::create_retriever(config, embedder)?;
        let llm = Self::create_llm(config)?;

        Ok(ItineraryPlanner::new(
            Arc::new(retriever),
            Arc::new(llm),
            config.retrieval.top_k,
        ))
    }
}

/// The index and its label file must describe the same monuments, position by position.
pub fn check_alignment(vectors: usize, labels: usize) -> Result<()> {
    if vectors != labels {
        bail!(
            "index has {vectors} vectors but label file has {labels} entries - rebuild with `yatra build-index`"
        );
    }
    Ok(())
}
