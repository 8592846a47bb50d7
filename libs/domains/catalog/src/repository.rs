use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::models::{Product, ScoredProduct};

/// Repository trait for the product catalog backed by a vector store.
///
/// Abstracts the underlying vector database (Qdrant) so services and tests
/// never touch the client directly.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Create the backing collection if it does not exist yet.
    async fn ensure_collection(&self, dimension: u64) -> CatalogResult<()>;

    /// Upsert products with their precomputed embeddings.
    async fn upsert(&self, products: Vec<(Product, Vec<f32>)>) -> CatalogResult<()>;

    /// Nearest-neighbor search over product embeddings.
    ///
    /// Results below `score_threshold` are filtered out by the store.
    async fn search(
        &self,
        embedding: Vec<f32>,
        limit: u64,
        score_threshold: Option<f32>,
    ) -> CatalogResult<Vec<ScoredProduct>>;

    /// Scan stored products, up to `limit` records.
    ///
    /// Used by the keyword-overlap fallback when semantic search comes back
    /// empty.
    async fn list(&self, limit: u32) -> CatalogResult<Vec<Product>>;

    /// Number of products currently stored.
    async fn count(&self) -> CatalogResult<u64>;
}
