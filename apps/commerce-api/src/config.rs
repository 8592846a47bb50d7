//! Configuration for Commerce API

use core_config::{app_info, env_or_default, env_parse_or, server::ServerConfig, AppInfo, FromEnv};
use domain_catalog::{QdrantConfig, SearchLimits};
use std::path::PathBuf;

pub use core_config::Environment;

/// Catalog retrieval and seeding configuration.
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub collection_name: String,
    pub limits: SearchLimits,
    pub seed_path: PathBuf,
    pub force_reload: bool,
}

impl FromEnv for CatalogConfig {
    fn from_env() -> Result<Self, core_config::ConfigError> {
        let limits = SearchLimits {
            top_k: env_parse_or("SEARCH_TOP_K", 3u64)?,
            similarity_threshold: env_parse_or("SEARCH_SIMILARITY_THRESHOLD", 0.7f32)?,
        }
        .clamped();

        Ok(Self {
            collection_name: env_or_default("CATALOG_COLLECTION_NAME", "commerce_products"),
            limits,
            seed_path: PathBuf::from(env_or_default("CATALOG_SEED_PATH", "data/catalog.json")),
            force_reload: env_parse_or("CATALOG_FORCE_RELOAD", false)?,
        })
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub qdrant: QdrantConfig,
    pub catalog: CatalogConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let qdrant = QdrantConfig::from_env()?;
        let catalog = CatalogConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            qdrant,
            catalog,
        })
    }
}
