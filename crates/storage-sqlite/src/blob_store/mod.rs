//! SQLite storage implementation for the key-value blob store.

mod model;
mod repository;

pub use model::KvEntryDB;
pub use repository::SqliteBlobStore;

// Re-export trait from core for convenience
pub use devquote_core::history::BlobStoreTrait;
