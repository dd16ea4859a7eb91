//! Catalog module - plans, services, and the discount/currency lookup tables.

mod catalog_errors;
mod catalog_loader;
mod catalog_model;

pub use catalog_errors::CatalogError;
pub use catalog_model::{
    BillingPeriod, Catalog, CurrencyCode, CurrencyTable, DiscountTable, Plan, Service,
};
