use std::collections::HashSet;
use std::sync::Arc;

use tracing::instrument;

use crate::embedding::EmbeddingProvider;
use crate::error::CatalogResult;
use crate::models::{Product, ScoredProduct};
use crate::repository::CatalogRepository;
use crate::vocabulary::Vocabulary;

/// Hard cap on how many products a search may ever return.
pub const MAX_RESULTS: u64 = 3;

/// How many stored products the keyword fallback scans.
const FALLBACK_SCAN_LIMIT: u32 = 200;

/// Retrieval limits, env-driven at the app layer.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    pub top_k: u64,
    pub similarity_threshold: f32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            top_k: MAX_RESULTS,
            similarity_threshold: 0.7,
        }
    }
}

impl SearchLimits {
    /// `top_k` never exceeds [`MAX_RESULTS`], whatever the configuration says.
    pub fn clamped(mut self) -> Self {
        self.top_k = self.top_k.min(MAX_RESULTS).max(1);
        self
    }
}

/// Catalog service combining vector retrieval with embedding generation.
///
/// Semantic search is primary; when it returns nothing, a literal
/// keyword-overlap scan over stored products takes over.
pub struct CatalogService<R: CatalogRepository> {
    repository: Arc<R>,
    embeddings: Arc<dyn EmbeddingProvider>,
    limits: SearchLimits,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repository: Arc<R>, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            repository,
            embeddings,
            limits: SearchLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits.clamped();
        self
    }

    /// Create the backing collection sized for the embedding provider.
    pub async fn ensure_ready(&self) -> CatalogResult<()> {
        self.repository
            .ensure_collection(self.embeddings.dimension())
            .await
    }

    /// Embed and upsert products. Returns how many were indexed.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn index_products(&self, products: Vec<Product>) -> CatalogResult<usize> {
        if products.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = products.iter().map(Product::search_text).collect();
        let embeddings = self.embeddings.embed_batch(&texts).await?;

        let count = products.len();
        let pairs: Vec<(Product, Vec<f32>)> = products.into_iter().zip(embeddings).collect();
        self.repository.upsert(pairs).await?;

        Ok(count)
    }

    pub async fn count(&self) -> CatalogResult<u64> {
        self.repository.count().await
    }

    /// Build the router vocabulary from a catalog scan.
    pub async fn vocabulary(&self) -> CatalogResult<Vocabulary> {
        let products = self.repository.list(FALLBACK_SCAN_LIMIT).await?;
        Ok(Vocabulary::from_products(&products))
    }

    /// Retrieve up to [`MAX_RESULTS`] products for a text query.
    ///
    /// Primary path embeds the query and runs nearest-neighbor search with
    /// the configured similarity threshold. An empty result set triggers the
    /// keyword-overlap fallback; store and embedding errors propagate to the
    /// caller untouched.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> CatalogResult<Vec<ScoredProduct>> {
        let embedding = self.embeddings.embed(query).await?;

        let mut results = self
            .repository
            .search(
                embedding,
                self.limits.top_k,
                Some(self.limits.similarity_threshold),
            )
            .await?;
        results.truncate(MAX_RESULTS as usize);

        if !results.is_empty() {
            return Ok(results);
        }

        tracing::debug!("Semantic search empty, falling back to keyword overlap");
        self.keyword_fallback(query).await
    }

    /// Literal keyword-overlap scan, ranked by how many query tokens a
    /// product's search text contains. A whole-query substring match on the
    /// product name always qualifies.
    async fn keyword_fallback(&self, query: &str) -> CatalogResult<Vec<ScoredProduct>> {
        let products = self.repository.list(FALLBACK_SCAN_LIMIT).await?;

        let query_lower = query.to_lowercase();
        let tokens: HashSet<&str> = query_lower.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(vec![]);
        }

        let mut ranked: Vec<(usize, Product)> = products
            .into_iter()
            .filter_map(|product| {
                let haystack = product.search_text();
                let mut overlap = tokens
                    .iter()
                    .filter(|token| haystack.contains(*token))
                    .count();

                if product.name.to_lowercase().contains(&query_lower) {
                    overlap += tokens.len();
                }

                (overlap > 0).then_some((overlap, product))
            })
            .collect();

        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked.truncate(MAX_RESULTS as usize);

        Ok(ranked
            .into_iter()
            .map(|(overlap, product)| ScoredProduct {
                product,
                score: overlap as f32,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbeddingProvider;
    use crate::models::ProductAttributes;
    use crate::repository::MockCatalogRepository;

    fn product(id: &str, name: &str, description: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            price: 25.0,
            availability: true,
            category: vec!["tops".to_string()],
            attributes: ProductAttributes {
                brand: "Northwind".to_string(),
                color_family: "red".to_string(),
                material: "cotton".to_string(),
                size: vec!["M".to_string()],
            },
        }
    }

    fn scored(id: &str, score: f32) -> ScoredProduct {
        ScoredProduct {
            product: product(id, "Item", "desc"),
            score,
        }
    }

    fn embeddings_stub() -> Arc<dyn EmbeddingProvider> {
        let mut embeddings = MockEmbeddingProvider::new();
        embeddings.expect_dimension().return_const(4u64);
        embeddings
            .expect_embed()
            .returning(|_| Ok(vec![0.1, 0.2, 0.3, 0.4]));
        Arc::new(embeddings)
    }

    #[tokio::test]
    async fn search_caps_results_at_three() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_search().returning(|_, _, _| {
            Ok(vec![
                scored("a", 0.95),
                scored("b", 0.92),
                scored("c", 0.90),
                scored("d", 0.88),
                scored("e", 0.85),
            ])
        });

        let service = CatalogService::new(Arc::new(repo), embeddings_stub());
        let results = service.search("red t shirt").await.unwrap();

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.product.price > 0.0));
    }

    #[tokio::test]
    async fn empty_semantic_search_falls_back_to_keyword_overlap() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_search().returning(|_, _, _| Ok(vec![]));
        repo.expect_list().returning(|_| {
            Ok(vec![
                product("1", "Classic Red T-Shirt", "soft cotton tee"),
                product("2", "Blue Jeans", "denim"),
                product("3", "Leather Wallet", "bifold"),
            ])
        });

        let service = CatalogService::new(Arc::new(repo), embeddings_stub());
        let results = service.search("red t-shirt").await.unwrap();

        assert!(!results.is_empty());
        assert_eq!(results[0].product.id, "1");
    }

    #[tokio::test]
    async fn fallback_includes_whole_query_name_substring_match() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_search().returning(|_, _, _| Ok(vec![]));
        repo.expect_list().returning(|_| {
            Ok(vec![
                product("1", "Blue Jeans", "denim"),
                product("2", "Canvas Tote", "the word jeans appears here too"),
            ])
        });

        let service = CatalogService::new(Arc::new(repo), embeddings_stub());
        let results = service.search("blue jeans").await.unwrap();

        // the whole-query name match outranks a description token hit
        assert_eq!(results[0].product.id, "1");
    }

    #[tokio::test]
    async fn fallback_with_no_overlap_returns_empty() {
        let mut repo = MockCatalogRepository::new();
        repo.expect_search().returning(|_, _, _| Ok(vec![]));
        repo.expect_list()
            .returning(|_| Ok(vec![product("1", "Blue Jeans", "denim")]));

        let service = CatalogService::new(Arc::new(repo), embeddings_stub());
        let results = service.search("spaceship").await.unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        use crate::error::CatalogError;

        let mut repo = MockCatalogRepository::new();
        repo.expect_search()
            .returning(|_, _, _| Err(CatalogError::Store("connection refused".to_string())));

        let service = CatalogService::new(Arc::new(repo), embeddings_stub());
        assert!(service.search("anything").await.is_err());
    }

    #[test]
    fn limits_are_clamped() {
        let limits = SearchLimits {
            top_k: 50,
            similarity_threshold: 0.7,
        }
        .clamped();
        assert_eq!(limits.top_k, MAX_RESULTS);

        let limits = SearchLimits {
            top_k: 0,
            similarity_threshold: 0.7,
        }
        .clamped();
        assert_eq!(limits.top_k, 1);
    }
}
