//! SQLite storage implementation for devquote.
//!
//! This crate provides the durable backend for the quote history using Diesel
//! ORM with SQLite. It implements `BlobStoreTrait` from `devquote-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The key-value blob repository
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!   core (pricing, history)
//!            │
//!            ▼
//!   storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```

pub mod blob_store;
pub mod db;
pub mod errors;
pub mod schema;

pub use blob_store::SqliteBlobStore;

// Re-export database utilities
pub use db::{create_pool, get_connection, get_db_path, init, run_migrations, DbConnection, DbPool};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from devquote-core for convenience
pub use devquote_core::errors::{DatabaseError, Error, Result};
