//! devquote Core - pricing engine, quote history, and reference catalog.
//!
//! This crate contains the business logic of the service-plan calculator.
//! It is storage-agnostic: history persistence goes through `BlobStoreTrait`,
//! which is implemented by the `storage-sqlite` crate.

pub mod catalog;
pub mod constants;
pub mod errors;
pub mod history;
pub mod pricing;
pub mod quoting;
pub mod settings;

pub use catalog::*;
pub use pricing::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
