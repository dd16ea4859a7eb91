//! History module - the bounded quote history and its persistence seam.

mod history_errors;
mod history_store;
mod history_traits;
mod memory_store;

pub use history_errors::HistoryError;
pub use history_store::{LoadOutcome, QuoteHistoryStore};
pub use history_traits::BlobStoreTrait;
pub use memory_store::InMemoryBlobStore;
