use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Slot holding the scoring service's raw answer, read by the results page.
pub const API_RESPONSE_KEY: &str = "apiResponse";
/// Slot holding the submitted questionnaire annotated with `isEligible`.
pub const ELIGIBILITY_DATA_KEY: &str = "elegibilityData";

/// Session-scoped key/value channel between the intake flow and the results page. Values are
/// serialized JSON documents.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store, one per visitor session.
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("session store mutex poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("session store mutex poisoned".to_string()))?;
        guard.insert(key.to_string(), value);
        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites_and_get_is_repeatable() {
        let store = InMemorySessionStore::new();
        assert!(store.get(API_RESPONSE_KEY).expect("get").is_none());

        store
            .set(API_RESPONSE_KEY, "{\"ok\":false}".to_string())
            .expect("set");
        store
            .set(API_RESPONSE_KEY, "{\"ok\":true}".to_string())
            .expect("overwrite");

        for _ in 0..2 {
            assert_eq!(
                store.get(API_RESPONSE_KEY).expect("get").as_deref(),
                Some("{\"ok\":true}")
            );
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clones_share_entries() {
        let store = InMemorySessionStore::new();
        let handle = store.clone();
        handle
            .set(ELIGIBILITY_DATA_KEY, "{}".to_string())
            .expect("set");
        assert!(!store.is_empty());
    }
}
