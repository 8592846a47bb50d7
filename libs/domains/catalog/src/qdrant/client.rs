use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    self, CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct,
    ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue,
    VectorParamsBuilder,
};
use qdrant_client::Qdrant;

use super::QdrantConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{Product, ScoredProduct};
use crate::repository::CatalogRepository;

/// Qdrant-backed implementation of [`CatalogRepository`].
///
/// All operations target a single named collection of product points with
/// cosine distance.
pub struct QdrantCatalogRepository {
    client: Qdrant,
    collection: String,
}

impl QdrantCatalogRepository {
    pub async fn new(config: QdrantConfig, collection: impl Into<String>) -> CatalogResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| CatalogError::Store(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            collection: collection.into(),
        })
    }

    pub fn from_client(client: Qdrant, collection: impl Into<String>) -> Self {
        Self {
            client,
            collection: collection.into(),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn payload_to_qdrant(payload: serde_json::Value) -> HashMap<String, QdrantValue> {
        let mut result = HashMap::new();

        if let serde_json::Value::Object(map) = payload {
            for (key, val) in map {
                if let Some(qdrant_val) = json_to_qdrant_value(val) {
                    result.insert(key, qdrant_val);
                }
            }
        }

        result
    }

    fn qdrant_to_payload(payload: HashMap<String, QdrantValue>) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, val) in payload {
            if let Some(json_val) = qdrant_value_to_json(val) {
                map.insert(key, json_val);
            }
        }

        serde_json::Value::Object(map)
    }
}

fn json_to_qdrant_value(val: serde_json::Value) -> Option<QdrantValue> {
    match val {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(QdrantValue::from(b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(QdrantValue::from(i))
            } else {
                n.as_f64().map(QdrantValue::from)
            }
        }
        serde_json::Value::String(s) => Some(QdrantValue::from(s)),
        _ => {
            // For complex types, serialize to string
            Some(QdrantValue::from(val.to_string()))
        }
    }
}

fn qdrant_value_to_json(val: QdrantValue) -> Option<serde_json::Value> {
    use qdrant::value::Kind;

    match val.kind {
        Some(Kind::NullValue(_)) => Some(serde_json::Value::Null),
        Some(Kind::BoolValue(b)) => Some(serde_json::Value::Bool(b)),
        Some(Kind::IntegerValue(i)) => Some(serde_json::Value::Number(i.into())),
        Some(Kind::DoubleValue(f)) => {
            serde_json::Number::from_f64(f).map(serde_json::Value::Number)
        }
        Some(Kind::StringValue(s)) => Some(serde_json::Value::String(s)),
        _ => None,
    }
}

#[async_trait]
impl CatalogRepository for QdrantCatalogRepository {
    async fn ensure_collection(&self, dimension: u64) -> CatalogResult<()> {
        if self.client.collection_exists(&self.collection).await? {
            return Ok(());
        }

        let builder = CreateCollectionBuilder::new(&self.collection)
            .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine));

        self.client.create_collection(builder).await?;
        tracing::info!(collection = %self.collection, dimension, "Created catalog collection");

        Ok(())
    }

    async fn upsert(&self, products: Vec<(Product, Vec<f32>)>) -> CatalogResult<()> {
        if products.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = products
            .into_iter()
            .map(|(product, embedding)| {
                let payload = Self::payload_to_qdrant(product.to_payload()?);
                Ok(PointStruct::new(
                    product.point_id().to_string(),
                    embedding,
                    payload,
                ))
            })
            .collect::<CatalogResult<_>>()?;

        let builder = UpsertPointsBuilder::new(&self.collection, points).wait(true);
        self.client.upsert_points(builder).await?;

        Ok(())
    }

    async fn search(
        &self,
        embedding: Vec<f32>,
        limit: u64,
        score_threshold: Option<f32>,
    ) -> CatalogResult<Vec<ScoredProduct>> {
        let mut builder = SearchPointsBuilder::new(&self.collection, embedding, limit);

        if let Some(threshold) = score_threshold {
            builder = builder.score_threshold(threshold);
        }

        builder = builder.with_payload(true);

        let results = self.client.search_points(builder).await?;

        results
            .result
            .into_iter()
            .map(|point| {
                let payload = Self::qdrant_to_payload(point.payload);
                let product = Product::from_payload(&payload)?;
                Ok(ScoredProduct {
                    product,
                    score: point.score,
                })
            })
            .collect()
    }

    async fn list(&self, limit: u32) -> CatalogResult<Vec<Product>> {
        let builder = ScrollPointsBuilder::new(&self.collection)
            .limit(limit)
            .with_payload(true);

        let results = self.client.scroll(builder).await?;

        results
            .result
            .into_iter()
            .map(|point| {
                let payload = Self::qdrant_to_payload(point.payload);
                Product::from_payload(&payload)
            })
            .collect()
    }

    async fn count(&self) -> CatalogResult<u64> {
        let builder = CountPointsBuilder::new(&self.collection).exact(true);
        let response = self.client.count(builder).await?;

        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }
}
