use std::sync::Arc;

use domain_catalog::{CatalogRepository, CatalogService, Vocabulary};
use serde_json::json;
use tracing::instrument;

use crate::formatter::ResponseFormatter;
use crate::llm::LlmProvider;
use crate::models::{ChatRequest, ChatResponse, Intent, RoutedIntent};
use crate::router::IntentRouter;
use crate::vision::ImageDescriber;

const IMAGE_REPROMPT_MESSAGE: &str = "I couldn't read that image. Could you describe the item \
you're looking for in text instead?";

/// The full request pipeline: route, retrieve, format.
///
/// Immutable after construction; reload replaces the whole engine behind an
/// `Arc` swap at the app layer, so in-flight requests keep their snapshot.
/// Every external failure degrades to a lower-quality but valid response;
/// `handle` itself never fails.
pub struct ChatEngine<R: CatalogRepository> {
    router: IntentRouter,
    describer: ImageDescriber,
    formatter: ResponseFormatter,
    catalog: CatalogService<R>,
}

impl<R: CatalogRepository> ChatEngine<R> {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        catalog: CatalogService<R>,
        vocabulary: Vocabulary,
    ) -> Self {
        Self {
            router: IntentRouter::new(llm.clone(), vocabulary),
            describer: ImageDescriber::new(llm.clone()),
            formatter: ResponseFormatter::new(llm),
            catalog,
        }
    }

    #[instrument(skip(self, request))]
    pub async fn handle(&self, request: &ChatRequest) -> ChatResponse {
        let text = request.text();
        let routed = self.router.route(text, request.image().is_some()).await;

        tracing::debug!(intent = %routed.intent, confidence = routed.confidence, "Routed request");

        match routed.intent {
            Intent::GeneralChat => {
                let reply = self
                    .formatter
                    .general_reply(text.unwrap_or(""), &request.conversation_history)
                    .await;
                ChatResponse::conversational(reply, routed)
            }
            Intent::ProductSearch => {
                self.search_and_format(text.unwrap_or(""), routed).await
            }
            Intent::ImageSearch => self.handle_image(request, routed).await,
        }
    }

    async fn handle_image(&self, request: &ChatRequest, routed: RoutedIntent) -> ChatResponse {
        let Some(image) = request.image() else {
            // The router only picks image_search without an image when the
            // LLM verdict says so; fall back to the text path.
            return self.search_and_format(request.text().unwrap_or(""), routed).await;
        };

        match self.describer.describe(image).await {
            Ok(attributes) => {
                let query = attributes.to_query();
                self.search_and_format(&query, routed).await
            }
            Err(error) => {
                tracing::warn!(%error, "Vision extraction failed, asking for a text description");
                ChatResponse {
                    response: IMAGE_REPROMPT_MESSAGE.to_string(),
                    products: vec![],
                    intent: Intent::ImageSearch,
                    confidence: routed.confidence,
                    metadata: json!({}),
                }
            }
        }
    }

    /// Retrieve and narrate products. Store failures yield an empty result,
    /// not an error response.
    async fn search_and_format(&self, query: &str, routed: RoutedIntent) -> ChatResponse {
        let results = match self.catalog.search(query).await {
            Ok(results) => results,
            Err(error) => {
                tracing::error!(%error, "Retrieval failed, returning empty result");
                vec![]
            }
        };

        let reply = self.formatter.product_reply(query, &results).await;
        let products: Vec<_> = results.into_iter().map(|r| r.product).collect();
        let metadata = json!({
            "query": query,
            "result_count": products.len(),
        });

        ChatResponse {
            response: reply,
            products,
            intent: routed.intent,
            confidence: routed.confidence,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatError;
    use crate::llm::MockLlmProvider;
    use async_trait::async_trait;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use domain_catalog::{
        CatalogResult, EmbeddingProvider, Product, ProductAttributes, ScoredProduct,
    };

    mockall::mock! {
        CatalogRepo {}

        #[async_trait]
        impl CatalogRepository for CatalogRepo {
            async fn ensure_collection(&self, dimension: u64) -> CatalogResult<()>;
            async fn upsert(&self, products: Vec<(Product, Vec<f32>)>) -> CatalogResult<()>;
            async fn search(
                &self,
                embedding: Vec<f32>,
                limit: u64,
                score_threshold: Option<f32>,
            ) -> CatalogResult<Vec<ScoredProduct>>;
            async fn list(&self, limit: u32) -> CatalogResult<Vec<Product>>;
            async fn count(&self) -> CatalogResult<u64>;
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

    fn scored(id: &str, name: &str) -> ScoredProduct {
        ScoredProduct {
            product: Product {
                id: id.to_string(),
                name: name.to_string(),
                description: "desc".to_string(),
                price: 19.99,
                availability: true,
                category: vec!["tops".to_string()],
                attributes: ProductAttributes {
                    brand: "Northwind".to_string(),
                    color_family: "red".to_string(),
                    material: "cotton".to_string(),
                    size: vec![],
                },
            },
            score: 0.9,
        }
    }

    fn engine(llm: MockLlmProvider, repo: MockCatalogRepo) -> ChatEngine<MockCatalogRepo> {
        let catalog = CatalogService::new(Arc::new(repo), Arc::new(StubEmbeddings));
        ChatEngine::new(Arc::new(llm), catalog, Vocabulary::default())
    }

    fn text_request(text: &str) -> ChatRequest {
        ChatRequest {
            text_input: Some(text.to_string()),
            image_base64: None,
            conversation_history: vec![],
            conversation_context: None,
        }
    }

    fn image_request() -> ChatRequest {
        ChatRequest {
            text_input: None,
            image_base64: Some(BASE64.encode(b"image bytes")),
            conversation_history: vec![],
            conversation_context: None,
        }
    }

    fn unavailable_llm() -> MockLlmProvider {
        let mut llm = MockLlmProvider::new();
        llm.expect_complete()
            .returning(|_| Err(ChatError::ProviderUnavailable("quota".to_string())));
        llm.expect_complete_vision()
            .returning(|_, _| Err(ChatError::ProviderUnavailable("quota".to_string())));
        llm
    }

    #[tokio::test]
    async fn greeting_yields_general_chat_with_empty_products_and_metadata() {
        let engine = engine(unavailable_llm(), MockCatalogRepo::new());

        let response = engine.handle(&text_request("hi")).await;

        assert_eq!(response.intent, Intent::GeneralChat);
        assert!(response.products.is_empty());
        assert_eq!(response.metadata, json!({}));
        assert!(!response.response.is_empty());
    }

    #[tokio::test]
    async fn product_query_caps_products_at_three() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_search().returning(|_, _, _| {
            Ok(vec![
                scored("1", "Red Tee A"),
                scored("2", "Red Tee B"),
                scored("3", "Red Tee C"),
                scored("4", "Red Tee D"),
                scored("5", "Red Tee E"),
            ])
        });

        let engine = engine(unavailable_llm(), repo);
        let response = engine.handle(&text_request("red t shirt")).await;

        assert_eq!(response.intent, Intent::ProductSearch);
        assert_eq!(response.products.len(), 3);
        for product in &response.products {
            assert!(!product.name.is_empty());
            assert!(product.price > 0.0);
        }
        assert_eq!(response.metadata["result_count"], 3);
    }

    #[tokio::test]
    async fn vision_failure_yields_reprompt_with_image_search_intent() {
        let engine = engine(unavailable_llm(), MockCatalogRepo::new());

        let response = engine.handle(&image_request()).await;

        assert_eq!(response.intent, Intent::ImageSearch);
        assert!(response.products.is_empty());
        assert_eq!(response.response, IMAGE_REPROMPT_MESSAGE);
    }

    #[tokio::test]
    async fn vision_success_drives_text_retrieval() {
        let mut llm = MockLlmProvider::new();
        llm.expect_complete_vision().returning(|_, _| {
            Ok(r#"{"item_type": "t-shirt", "color": "red", "keywords": []}"#.to_string())
        });
        llm.expect_complete()
            .returning(|_| Err(ChatError::ProviderUnavailable("quota".to_string())));

        let mut repo = MockCatalogRepo::new();
        repo.expect_search()
            .returning(|_, _, _| Ok(vec![scored("1", "Classic Red T-Shirt")]));

        let engine = engine(llm, repo);
        let response = engine.handle(&image_request()).await;

        assert_eq!(response.intent, Intent::ImageSearch);
        assert_eq!(response.products.len(), 1);
        assert_eq!(response.metadata["query"], "red t-shirt");
    }

    #[tokio::test]
    async fn store_failure_degrades_to_empty_result() {
        use domain_catalog::CatalogError;

        let mut repo = MockCatalogRepo::new();
        repo.expect_search()
            .returning(|_, _, _| Err(CatalogError::Store("connection refused".to_string())));
        repo.expect_list()
            .returning(|_| Err(CatalogError::Store("connection refused".to_string())));

        let engine = engine(unavailable_llm(), repo);
        let response = engine.handle(&text_request("red t shirt")).await;

        assert_eq!(response.intent, Intent::ProductSearch);
        assert!(response.products.is_empty());
        assert!(response.response.contains("couldn't find"));
    }

    #[tokio::test]
    async fn image_wins_when_both_text_and_image_present() {
        let mut llm = MockLlmProvider::new();
        // routing must not consult the LLM when an image is attached
        llm.expect_complete().times(0);
        llm.expect_complete_vision()
            .returning(|_, _| Err(ChatError::ProviderUnavailable("quota".to_string())));

        let mut request = image_request();
        request.text_input = Some("blue jeans".to_string());

        let engine = engine(llm, MockCatalogRepo::new());
        let response = engine.handle(&request).await;

        assert_eq!(response.intent, Intent::ImageSearch);
    }
}
