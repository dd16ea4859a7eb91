//! Pricing module - quote models and the pricing engine.

mod pricing_engine;
mod pricing_model;

pub use pricing_engine::{compute_breakdown, compute_quote};
pub use pricing_model::{
    NewQuote, Quote, QuoteBreakdown, QuoteOptions, QuoteRequest, QuoteSummary,
};
