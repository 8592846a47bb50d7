//! Catalog seeding from a bundled JSON file.

use std::path::Path;

use domain_catalog::{CatalogRepository, CatalogService, Product};
use tracing::info;

/// Seed the catalog from `path`.
///
/// Skipped when the collection already holds products, unless `force` is set
/// (the admin reload path). Returns how many products were indexed.
pub async fn seed_catalog<R: CatalogRepository>(
    catalog: &CatalogService<R>,
    path: &Path,
    force: bool,
) -> eyre::Result<usize> {
    let existing = catalog.count().await?;
    if existing > 0 && !force {
        info!(existing, "Catalog already seeded, skipping");
        return Ok(0);
    }

    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| eyre::eyre!("Failed to read seed file {}: {}", path.display(), e))?;
    let products: Vec<Product> = serde_json::from_str(&raw)
        .map_err(|e| eyre::eyre!("Invalid seed file {}: {}", path.display(), e))?;

    let indexed = catalog.index_products(products).await?;
    info!(indexed, path = %path.display(), "Seeded catalog");

    Ok(indexed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domain_catalog::{CatalogResult, EmbeddingProvider, ScoredProduct};
    use std::sync::Arc;

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

    #[tokio::test]
    async fn skips_when_already_seeded() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_count().returning(|| Ok(6));
        repo.expect_upsert().times(0);

        let catalog = CatalogService::new(Arc::new(repo), Arc::new(StubEmbeddings));
        let seeded = seed_catalog(&catalog, Path::new("data/catalog.json"), false)
            .await
            .unwrap();

        assert_eq!(seeded, 0);
    }

    #[tokio::test]
    async fn force_reload_reseeds_from_file() {
        let dir = std::env::temp_dir().join("commerce-api-seed-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("catalog.json");
        std::fs::write(
            &path,
            r#"[{
                "id": "sku-1",
                "name": "Classic Red T-Shirt",
                "description": "Soft cotton tee",
                "price": 19.99,
                "availability": true,
                "category": ["tops"],
                "attributes": {
                    "brand": "Northwind",
                    "color_family": "red",
                    "material": "cotton",
                    "size": ["S", "M"]
                }
            }]"#,
        )
        .unwrap();

        let mut repo = MockCatalogRepo::new();
        repo.expect_count().returning(|| Ok(6));
        repo.expect_upsert().times(1).returning(|_| Ok(()));

        let catalog = CatalogService::new(Arc::new(repo), Arc::new(StubEmbeddings));
        let seeded = seed_catalog(&catalog, &path, true).await.unwrap();

        assert_eq!(seeded, 1);
    }

    #[tokio::test]
    async fn missing_seed_file_is_an_error() {
        let mut repo = MockCatalogRepo::new();
        repo.expect_count().returning(|| Ok(0));

        let catalog = CatalogService::new(Arc::new(repo), Arc::new(StubEmbeddings));
        let result = seed_catalog(&catalog, Path::new("does/not/exist.json"), false).await;

        assert!(result.is_err());
    }
}
