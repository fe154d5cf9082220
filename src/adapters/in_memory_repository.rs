//! In-memory agent repository for testing.
//!
//! This adapter provides a pure in-memory implementation of AgentRepository,
//! enabling fast tests without any file system I/O.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, ports::AgentRepository, q_learning::SavedQAgent};

/// In-memory repository for testing.
///
/// Stores serialized agents in a shared HashMap keyed by path, so saving and
/// loading still exercise the MessagePack encoding.
///
/// # Thread Safety
///
/// This repository can be cloned and shared across threads. All clones share
/// the same underlying storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    /// Create a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get the number of agents currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    /// Clear all stored agents.
    pub fn clear(&self) {
        self.storage().clear();
    }

    /// Check if an agent exists at the given path.
    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(path.to_string_lossy().as_ref())
    }
}

impl AgentRepository for InMemoryRepository {
    fn save(&self, agent: &SavedQAgent, path: &Path) -> Result<()> {
        let key = path.to_string_lossy().to_string();

        let bytes = rmp_serde::to_vec_named(agent).map_err(|e| Error::SerializationContext {
            operation: "serialize agent for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(key, bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<SavedQAgent> {
        let key = path.to_string_lossy().to_string();
        let storage = self.storage();

        let bytes = storage.get(&key).ok_or_else(|| Error::Io {
            operation: format!("load agent from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize agent from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::{QLearningAgent, TrainingMetadata};

    fn saved() -> SavedQAgent {
        let agent = QLearningAgent::new(0.5, 0.5, 0.5).unwrap();
        SavedQAgent::from_agent(&agent, TrainingMetadata::default())
    }

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let path = Path::new("agent");

        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        repo.save(&saved(), path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(path));

        let loaded = repo.load(path).unwrap();
        assert_eq!(loaded.version, SavedQAgent::VERSION);
        assert_eq!(loaded.state_count(), 0);
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = InMemoryRepository::new();
        assert!(repo.load(Path::new("nonexistent")).is_err());
    }

    #[test]
    fn test_clear_removes_all() {
        let repo = InMemoryRepository::new();
        repo.save(&saved(), Path::new("a1")).unwrap();
        repo.save(&saved(), Path::new("a2")).unwrap();
        assert_eq!(repo.count(), 2);

        repo.clear();
        assert_eq!(repo.count(), 0);
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();
        let path = Path::new("shared");

        repo1.save(&saved(), path).unwrap();
        assert!(repo2.load(path).is_ok());
        assert_eq!(repo2.count(), 1);
    }
}
