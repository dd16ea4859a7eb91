use thiserror::Error;

/// Errors raised while loading or validating reference data.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse catalog document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid plan '{id}': {reason}")]
    InvalidPlan { id: String, reason: String },

    #[error("Invalid service '{id}': {reason}")]
    InvalidService { id: String, reason: String },

    #[error("Invalid discount for billing period '{period}': {rate}")]
    InvalidDiscount { period: String, rate: f64 },

    #[error("Invalid exchange rate for currency '{currency}': {rate}")]
    InvalidExchangeRate { currency: String, rate: f64 },

    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
}
