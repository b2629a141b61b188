use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use crate::care::{GeminiClient, PlantOracle};
use crate::config::AppConfig;
use crate::plants::store::PlantStore;
use crate::storage::{CollectionStorage, JsonFileStorage};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<PlantStore>,
    pub oracle: Arc<dyn PlantOracle>,
    /// One creation flow at a time; concurrent attempts are rejected.
    pub(crate) creation_gate: Arc<Mutex<()>>,
}

impl AppState {
    pub async fn init() -> Self {
        let config = Arc::new(AppConfig::from_env());
        if config.gemini.api_key.is_empty() {
            warn!("GEMINI_API_KEY is not set; scan and search will fail");
        }

        let storage =
            Arc::new(JsonFileStorage::new(&config.store_path)) as Arc<dyn CollectionStorage>;
        let store = Arc::new(PlantStore::load(storage).await);
        let oracle = Arc::new(GeminiClient::new(&config.gemini)) as Arc<dyn PlantOracle>;

        Self {
            config,
            store,
            oracle,
            creation_gate: Arc::new(Mutex::new(())),
        }
    }

    /// State over in-memory storage and a caller-supplied oracle, for tests.
    #[cfg(test)]
    pub(crate) async fn fake(oracle: Arc<dyn PlantOracle>) -> Self {
        use crate::storage::MemoryStorage;

        let storage = Arc::new(MemoryStorage::new()) as Arc<dyn CollectionStorage>;
        let store = Arc::new(PlantStore::load(storage).await);
        Self {
            config: Arc::new(crate::config::test_config()),
            store,
            oracle,
            creation_gate: Arc::new(Mutex::new(())),
        }
    }
}
