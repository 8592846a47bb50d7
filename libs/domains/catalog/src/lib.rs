//! Product catalog domain backed by a vector store.
//!
//! - [`models`]: product records and the flat payload codec
//! - [`repository`]: storage abstraction over Qdrant
//! - [`embedding`]: embedding providers (OpenAI)
//! - [`service`]: semantic search with keyword-overlap fallback
//! - [`vocabulary`]: catalog-derived term lookup for intent routing

pub mod embedding;
pub mod error;
pub mod models;
pub mod qdrant;
pub mod repository;
pub mod service;
pub mod vocabulary;

pub use embedding::{EmbeddingModel, EmbeddingProvider, OpenAIConfig, OpenAIEmbeddings};
pub use error::{CatalogError, CatalogResult};
pub use models::{Product, ProductAttributes, ScoredProduct};
pub use qdrant::{QdrantCatalogRepository, QdrantConfig};
pub use repository::CatalogRepository;
pub use service::{CatalogService, SearchLimits, MAX_RESULTS};
pub use vocabulary::Vocabulary;
