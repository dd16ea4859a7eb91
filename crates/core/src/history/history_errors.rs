use thiserror::Error;

/// Persistence failures of the quote history. Neither is fatal to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    /// The stored snapshot could not be read or was malformed.
    #[error("Failed to load quote history: {0}")]
    Load(String),

    /// The snapshot could not be written; in-memory history is unaffected.
    #[error("Failed to save quote history: {0}")]
    Save(String),
}
