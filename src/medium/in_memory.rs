use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{MediumError, StorageMedium};

/// In-memory medium backed by `Arc<RwLock<HashMap>>`.
///
/// Clone-friendly (cloning shares the same underlying storage). Used for
/// tests and development.
#[derive(Clone)]
pub struct InMemoryMedium {
    storage: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for InMemoryMedium {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMedium {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl StorageMedium for InMemoryMedium {
    fn get(&self, key: &str) -> Result<Option<String>, MediumError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| MediumError::LockPoisoned("medium read"))?;
        Ok(storage.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), MediumError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| MediumError::LockPoisoned("medium write"))?;
        storage.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), MediumError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| MediumError::LockPoisoned("medium write"))?;
        storage.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get() {
        let medium = InMemoryMedium::new();
        medium.put("k", "v").unwrap();
        assert_eq!(medium.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn get_missing_returns_none() {
        let medium = InMemoryMedium::new();
        assert!(medium.get("missing").unwrap().is_none());
    }

    #[test]
    fn put_overwrites() {
        let medium = InMemoryMedium::new();
        medium.put("k", "v1").unwrap();
        medium.put("k", "v2").unwrap();
        assert_eq!(medium.get("k").unwrap(), Some("v2".to_string()));
    }

    #[test]
    fn remove_existing() {
        let medium = InMemoryMedium::new();
        medium.put("k", "v").unwrap();
        medium.remove("k").unwrap();
        assert!(medium.get("k").unwrap().is_none());
    }

    #[test]
    fn remove_missing_is_noop() {
        let medium = InMemoryMedium::new();
        assert!(medium.remove("missing").is_ok());
    }

    #[test]
    fn clone_shares_storage() {
        let medium = InMemoryMedium::new();
        let clone = medium.clone();
        medium.put("k", "v").unwrap();
        assert_eq!(clone.get("k").unwrap(), Some("v".to_string()));
    }
}
