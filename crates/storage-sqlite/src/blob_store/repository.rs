use chrono::Utc;
use diesel::prelude::*;
use log::debug;
use std::sync::Arc;

use super::model::KvEntryDB;
use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::kv_store::dsl::*;
use devquote_core::errors::Result;
use devquote_core::history::BlobStoreTrait;

pub struct SqliteBlobStore {
    pool: Arc<DbPool>,
}

impl SqliteBlobStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        SqliteBlobStore { pool }
    }
}

impl BlobStoreTrait for SqliteBlobStore {
    fn load(&self, key_param: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        let value = kv_store
            .filter(store_key.eq(key_param))
            .select(store_value)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(value)
    }

    fn save(&self, key_param: &str, value_param: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::replace_into(kv_store)
            .values(&KvEntryDB {
                store_key: key_param.to_string(),
                store_value: value_param.to_string(),
                updated_at: Utc::now().naive_utc(),
            })
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        debug!("Stored {} bytes under '{}'", value_param.len(), key_param);
        Ok(())
    }

    fn remove(&self, key_param: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::delete(kv_store.filter(store_key.eq(key_param)))
            .execute(&mut conn)
            .map_err(StorageError::from)?;
        Ok(())
    }
}
