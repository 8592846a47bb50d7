//! Engine construction, shared by startup and the admin reload path.

use std::sync::Arc;

use domain_catalog::{CatalogService, OpenAIEmbeddings, QdrantCatalogRepository};
use domain_chat::{ChatEngine, GeminiProvider};
use tracing::info;

use crate::config::Config;
use crate::seed::seed_catalog;
use crate::state::Engine;

pub struct BootstrapReport {
    pub engine: Engine,
    pub products: u64,
}

/// Build a fully wired chat engine: vector store, embeddings, LLM, seeded
/// catalog, and vocabulary.
///
/// `force_seed` re-indexes the seed file even when the collection is already
/// populated; the admin reload path sets it.
pub async fn build_engine(config: &Config, force_seed: bool) -> eyre::Result<BootstrapReport> {
    let repository = QdrantCatalogRepository::new(
        config.qdrant.clone(),
        config.catalog.collection_name.clone(),
    )
    .await?;

    let embeddings = Arc::new(OpenAIEmbeddings::from_env()?);
    let catalog = CatalogService::new(Arc::new(repository), embeddings)
        .with_limits(config.catalog.limits.clone());

    catalog.ensure_ready().await?;
    seed_catalog(
        &catalog,
        &config.catalog.seed_path,
        force_seed || config.catalog.force_reload,
    )
    .await?;

    let products = catalog.count().await?;
    let vocabulary = catalog.vocabulary().await?;
    info!(products, "Catalog ready");

    let llm = Arc::new(GeminiProvider::from_env()?);
    let engine = ChatEngine::new(llm, catalog, vocabulary);

    Ok(BootstrapReport { engine, products })
}
