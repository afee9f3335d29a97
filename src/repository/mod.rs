//! Repository Pattern Implementation
//!
//! This module provides abstract interfaces for data access, allowing easy
//! swapping of storage backends (memory, file, database, etc.).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │          Repository Traits               │
//! │  EntityStore<T> / KeyValueStore          │
//! └──────────────┬───────────────────────────┘
//!                │
//!        ┌───────┴─────────┬─────────────────┐
//!        │                 │                 │
//! ┌──────▼───────────┐ ┌───▼──────────┐ ┌────▼──────────┐
//! │MemoryEntityStore │ │JsonFileStore │ │DatabaseStore  │
//! │- questions       │ │- session     │ │(future)       │
//! │- responses       │ │- durable     │ │               │
//! └──────────────────┘ └──────────────┘ └───────────────┘
//! ```

pub mod factory;
pub mod file;
pub mod memory;
pub mod traits;

// Re-export main types
pub use factory::{QuestionStore, RepositoryFactory, ResponseStore};
pub use file::JsonFileStore;
pub use memory::{MemoryEntityStore, MemoryKeyValueStore};
pub use traits::{CredentialVerifier, Entity, EntityStore, KeyValueStore};
