//! Quoting module - the caller-held service tying catalog, pricing and history together.

mod quoting_service;

pub use quoting_service::QuoteService;
