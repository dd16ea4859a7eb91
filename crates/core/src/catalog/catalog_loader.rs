use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::catalog_errors::CatalogError;
use super::catalog_model::{Catalog, CurrencyTable, DiscountTable, Plan, Service};
use crate::constants::{PLANS_FILE_NAME, SERVICES_FILE_NAME};

const BUILTIN_PLANS_JSON: &str = include_str!("../../data/plans.json");
const BUILTIN_SERVICES_JSON: &str = include_str!("../../data/services.json");

/// Shape of `plans.json`.
#[derive(Deserialize)]
struct PlansDocument {
    plans: Vec<Plan>,
    #[serde(default)]
    currencies: CurrencyTable,
    #[serde(default)]
    discounts: DiscountTable,
}

/// Shape of `services.json`.
#[derive(Deserialize)]
struct ServicesDocument {
    services: Vec<Service>,
}

impl Catalog {
    /// Parses and validates the two reference documents.
    pub fn from_json(plans_json: &str, services_json: &str) -> Result<Self, CatalogError> {
        let plans_doc: PlansDocument = serde_json::from_str(plans_json)?;
        let services_doc: ServicesDocument = serde_json::from_str(services_json)?;

        let catalog = Catalog {
            plans: plans_doc.plans,
            services: services_doc.services,
            currencies: plans_doc.currencies,
            discounts: plans_doc.discounts,
        };
        catalog.validate()?;

        debug!(
            "Loaded catalog with {} plans and {} services",
            catalog.plans.len(),
            catalog.services.len()
        );
        Ok(catalog)
    }

    /// Reads `plans.json` and `services.json` from `dir`.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let plans_json = read_document(&dir.join(PLANS_FILE_NAME))?;
        let services_json = read_document(&dir.join(SERVICES_FILE_NAME))?;
        Self::from_json(&plans_json, &services_json)
    }

    /// Reference data bundled with the crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_PLANS_JSON, BUILTIN_SERVICES_JSON)
    }

    /// Checks the invariants the pricing engine relies on.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut plan_ids = HashSet::new();
        for plan in &self.plans {
            if !plan_ids.insert(plan.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    kind: "plan",
                    id: plan.id.clone(),
                });
            }
            if !is_positive(plan.base_hours) {
                return Err(CatalogError::InvalidPlan {
                    id: plan.id.clone(),
                    reason: format!("base hours must be positive, got {}", plan.base_hours),
                });
            }
            if !is_positive(plan.base_price_usd) {
                return Err(CatalogError::InvalidPlan {
                    id: plan.id.clone(),
                    reason: format!("base price must be positive, got {}", plan.base_price_usd),
                });
            }
        }

        let mut service_ids = HashSet::new();
        for service in &self.services {
            if !service_ids.insert(service.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    kind: "service",
                    id: service.id.clone(),
                });
            }
            if !is_positive(service.base_rate) {
                return Err(CatalogError::InvalidService {
                    id: service.id.clone(),
                    reason: format!("base rate must be positive, got {}", service.base_rate),
                });
            }
        }

        for (period, rate) in self.discounts.iter() {
            if !rate.is_finite() || *rate < 0.0 || *rate >= 1.0 {
                return Err(CatalogError::InvalidDiscount {
                    period: period.to_string(),
                    rate: *rate,
                });
            }
        }

        for (currency, rate) in self.currencies.iter() {
            if !is_positive(*rate) {
                return Err(CatalogError::InvalidExchangeRate {
                    currency: currency.to_string(),
                    rate: *rate,
                });
            }
        }

        if self.plans.is_empty() {
            warn!("Catalog has no plans");
        }
        if self.services.is_empty() {
            warn!("Catalog has no services");
        }

        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn read_document(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
