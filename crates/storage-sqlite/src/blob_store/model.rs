//! Database model for key-value blob entries.

use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Database model for a single stored blob
#[derive(Queryable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::kv_store)]
pub struct KvEntryDB {
    pub store_key: String,
    pub store_value: String,
    pub updated_at: NaiveDateTime,
}
