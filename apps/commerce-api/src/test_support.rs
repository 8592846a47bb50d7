//! Shared fixtures for app-level tests.

use std::sync::Arc;

use async_trait::async_trait;
use domain_catalog::{
    CatalogResult, CatalogService, EmbeddingProvider, QdrantCatalogRepository, QdrantConfig,
    SearchLimits, Vocabulary,
};
use domain_chat::{ChatEngine, ChatError, ChatResult, LlmProvider};

use crate::config::{CatalogConfig, Config};
use crate::state::{AppState, Engine};

/// LLM stub that always fails, exercising the deterministic fallbacks.
struct StubLlm;

#[async_trait]
impl LlmProvider for StubLlm {
    async fn complete(&self, _prompt: &str) -> ChatResult<String> {
        Err(ChatError::ProviderUnavailable("stub".to_string()))
    }

    async fn complete_vision(&self, _image_base64: &str, _prompt: &str) -> ChatResult<String> {
        Err(ChatError::ProviderUnavailable("stub".to_string()))
    }
}

struct StubEmbeddings;

#[async_trait]
impl EmbeddingProvider for StubEmbeddings {
    fn dimension(&self) -> u64 {
        4
    }

    async fn embed(&self, _text: &str) -> CatalogResult<Vec<f32>> {
        Ok(vec![0.0; 4])
    }

    async fn embed_batch(&self, texts: &[String]) -> CatalogResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.0; 4]).collect())
    }
}

/// Engine over a lazily connected local Qdrant client; nothing dials out
/// unless a test actually searches.
pub async fn stub_engine() -> Engine {
    let repository = QdrantCatalogRepository::new(QdrantConfig::default(), "test_products")
        .await
        .expect("client builds without connecting");
    let catalog = CatalogService::new(Arc::new(repository), Arc::new(StubEmbeddings));
    ChatEngine::new(Arc::new(StubLlm), catalog, Vocabulary::default())
}

pub async fn stub_state() -> AppState {
    let config = Config {
        app: core_config::app_info!(),
        server: Default::default(),
        environment: core_config::Environment::Development,
        qdrant: QdrantConfig::default(),
        catalog: CatalogConfig {
            collection_name: "test_products".to_string(),
            limits: SearchLimits::default(),
            seed_path: "data/catalog.json".into(),
            force_reload: false,
        },
    };

    AppState::new(stub_engine().await, config)
}
