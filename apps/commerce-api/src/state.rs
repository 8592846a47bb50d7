//! Application state management

use std::sync::Arc;

use domain_catalog::QdrantCatalogRepository;
use domain_chat::ChatEngine;
use tokio::sync::RwLock;

use crate::config::Config;

pub type Engine = ChatEngine<QdrantCatalogRepository>;

/// Shared application state.
///
/// The engine sits behind an `Arc` swap: reload builds a fresh engine and
/// replaces the pointer, while in-flight requests keep serving from the
/// snapshot they already cloned.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<RwLock<Arc<Engine>>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(engine: Engine, config: Config) -> Self {
        Self {
            engine: Arc::new(RwLock::new(Arc::new(engine))),
            config: Arc::new(config),
        }
    }

    /// Current engine snapshot.
    pub async fn engine(&self) -> Arc<Engine> {
        self.engine.read().await.clone()
    }

    /// Atomically swap in a rebuilt engine.
    pub async fn replace_engine(&self, engine: Engine) {
        let mut guard = self.engine.write().await;
        *guard = Arc::new(engine);
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{stub_engine, stub_state};
    use domain_chat::{ChatRequest, Intent};
    use std::sync::Arc;

    #[tokio::test]
    async fn reload_swaps_engine_while_old_snapshot_survives() {
        let state = stub_state().await;
        let before = state.engine().await;

        state.replace_engine(stub_engine().await).await;
        let after = state.engine().await;

        assert!(!Arc::ptr_eq(&before, &after));

        // the pre-reload snapshot still serves requests
        let request = ChatRequest {
            text_input: Some("hi".to_string()),
            image_base64: None,
            conversation_history: vec![],
            conversation_context: None,
        };
        let response = before.handle(&request).await;
        assert_eq!(response.intent, Intent::GeneralChat);
    }
}
