//! Repository factory for creating repository instances
//!
//! This factory provides a centralized way to create repository instances
//! with the appropriate backend based on configuration.

use super::file::JsonFileStore;
use super::memory::{MemoryEntityStore, MemoryKeyValueStore};
use super::traits::{EntityStore, KeyValueStore};
use crate::config::{AppConfig, StoreBackend};
use crate::error::FeedbackResult;
use crate::fixtures;
use crate::models::{Question, Response};
use std::sync::Arc;

/// Shared handle to the question collection
pub type QuestionStore = Arc<dyn EntityStore<Question>>;
/// Shared handle to the response collection
pub type ResponseStore = Arc<dyn EntityStore<Response>>;

/// Repository factory for creating repository instances
///
/// Swapping to a persistent backend means adding a constructor here;
/// the repositories only see the traits.
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create the question collection, optionally seeded with fixtures
    pub fn create_question_store(seed: bool) -> QuestionStore {
        let items = if seed {
            fixtures::seed_questions()
        } else {
            Vec::new()
        };
        Arc::new(MemoryEntityStore::with_items(items))
    }

    /// Create the response collection, optionally seeded with fixtures
    pub fn create_response_store(seed: bool) -> ResponseStore {
        let items = if seed {
            fixtures::seed_responses()
        } else {
            Vec::new()
        };
        Arc::new(MemoryEntityStore::with_items(items))
    }

    /// Create the key-value store backing the session
    ///
    /// # Errors
    /// Returns an error if a configured store file exists but cannot be read
    pub fn create_key_value_store(backend: &StoreBackend) -> FeedbackResult<Arc<dyn KeyValueStore>> {
        let store: Arc<dyn KeyValueStore> = match backend {
            StoreBackend::Memory => Arc::new(MemoryKeyValueStore::new()),
            StoreBackend::File { path } => Arc::new(JsonFileStore::open(path.clone())?),
        };
        Ok(store)
    }

    /// Create all stores described by `config`
    pub fn create_all(
        config: &AppConfig,
    ) -> FeedbackResult<(QuestionStore, ResponseStore, Arc<dyn KeyValueStore>)> {
        Ok((
            Self::create_question_store(config.seed_fixtures),
            Self::create_response_store(config.seed_fixtures),
            Self::create_key_value_store(&config.store)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_factory_seeds_on_request() {
        assert_eq!(RepositoryFactory::create_question_store(true).count().unwrap(), 3);
        assert_eq!(RepositoryFactory::create_response_store(true).count().unwrap(), 3);
        assert_eq!(RepositoryFactory::create_question_store(false).count().unwrap(), 0);
        assert_eq!(RepositoryFactory::create_response_store(false).count().unwrap(), 0);
    }

    #[test]
    fn test_factory_creates_file_store() {
        let dir = TempDir::new().unwrap();
        let backend = StoreBackend::File {
            path: dir.path().join("session.json"),
        };

        let store = RepositoryFactory::create_key_value_store(&backend).unwrap();
        store.set("k", serde_json::json!(1)).unwrap();
        assert!(dir.path().join("session.json").exists());
    }

    #[test]
    fn test_factory_creates_all_from_config() {
        let config = AppConfig {
            store: StoreBackend::Memory,
            seed_fixtures: false,
            ..AppConfig::default()
        };

        let (questions, responses, kv) = RepositoryFactory::create_all(&config).unwrap();
        assert_eq!(questions.count().unwrap(), 0);
        assert_eq!(responses.count().unwrap(), 0);
        assert!(!kv.has("user").unwrap());
    }
}
