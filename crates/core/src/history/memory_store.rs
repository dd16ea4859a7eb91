use std::collections::HashMap;
use std::sync::RwLock;

use super::history_traits::BlobStoreTrait;
use crate::errors::{Error, Result};

/// Process-local blob store. History kept here does not survive a restart.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Unexpected("in-memory blob store lock poisoned".to_string())
}

impl BlobStoreTrait for InMemoryBlobStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().map_err(poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().map_err(poisoned)?;
        values.remove(key);
        Ok(())
    }
}
