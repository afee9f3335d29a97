//! Repository trait definitions
//!
//! These traits define the abstract interfaces for data access operations.
//! Different implementations can provide different storage backends.

use crate::error::FeedbackResult;
use crate::models::User;

/// Anything stored by id in an [`EntityStore`]
pub trait Entity: Clone + Send + Sync {
    fn id(&self) -> &str;
}

/// Ordered collection of entities addressed by id
///
/// Implementations must serialize mutations of one collection; `update`
/// performs its read-modify-write without releasing that guard.
pub trait EntityStore<T: Entity>: Send + Sync {
    /// Look up one entity
    fn get(&self, id: &str) -> FeedbackResult<Option<T>>;

    /// All entities in insertion order
    fn list(&self) -> FeedbackResult<Vec<T>>;

    /// Insert, or replace in place when the id already exists
    fn put(&self, item: T) -> FeedbackResult<()>;

    /// Remove an entity, returning whether it existed
    fn delete(&self, id: &str) -> FeedbackResult<bool>;

    /// Mutate an entity in place and return the new value
    fn update(&self, id: &str, f: &mut dyn FnMut(&mut T)) -> FeedbackResult<Option<T>>;

    /// Check if an entity exists
    fn contains(&self, id: &str) -> FeedbackResult<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Count stored entities
    fn count(&self) -> FeedbackResult<usize> {
        Ok(self.list()?.len())
    }
}

/// Durable key-value storage holding JSON values
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> FeedbackResult<Option<serde_json::Value>>;

    fn set(&self, key: &str, value: serde_json::Value) -> FeedbackResult<()>;

    fn delete(&self, key: &str) -> FeedbackResult<()>;

    fn has(&self, key: &str) -> FeedbackResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Checks a login attempt and yields the matching user
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, email: &str, password: &str) -> Option<User>;
}
