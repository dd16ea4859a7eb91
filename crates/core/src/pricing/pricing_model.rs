//! Pricing domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{BillingPeriod, CurrencyCode, Plan, Service};

/// Input model for a quote, as collected by the caller.
///
/// Plan and service are optional and hours is signed so that incomplete or
/// out-of-range input can be represented and rejected by validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuote {
    pub plan: Option<Plan>,
    pub service: Option<Service>,
    pub hours: i64,
    pub billing_period: BillingPeriod,
    pub currency: CurrencyCode,
    pub rush_order: bool,
    pub maintenance: bool,
}

/// Optional pricing modifiers chosen alongside plan, service and hours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteOptions {
    pub billing_period: BillingPeriod,
    pub currency: CurrencyCode,
    pub rush_order: bool,
    pub maintenance: bool,
}

/// A validated quote request: plan and service present, hours positive.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub plan: Plan,
    pub service: Service,
    pub hours: u32,
    pub billing_period: BillingPeriod,
    pub currency: CurrencyCode,
    pub rush_order: bool,
    pub maintenance: bool,
}

impl From<QuoteRequest> for NewQuote {
    fn from(request: QuoteRequest) -> Self {
        NewQuote {
            plan: Some(request.plan),
            service: Some(request.service),
            hours: i64::from(request.hours),
            billing_period: request.billing_period,
            currency: request.currency,
            rush_order: request.rush_order,
            maintenance: request.maintenance,
        }
    }
}

/// Every intermediate and final figure of a quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub base_hourly_rate: f64,
    pub service_multiplier: f64,
    pub adjusted_hourly_rate: f64,
    pub discount_rate: f64,
    pub discounted_rate: f64,
    pub final_hourly_rate: f64,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub rush_surcharge: f64,
    pub maintenance_cost: f64,
    pub total: f64,
    pub exchange_rate: f64,
    pub converted_total: f64,
}

impl QuoteBreakdown {
    fn figures(&self) -> [f64; 13] {
        [
            self.base_hourly_rate,
            self.service_multiplier,
            self.adjusted_hourly_rate,
            self.discount_rate,
            self.discounted_rate,
            self.final_hourly_rate,
            self.subtotal,
            self.discount_amount,
            self.rush_surcharge,
            self.maintenance_cost,
            self.total,
            self.exchange_rate,
            self.converted_total,
        ]
    }

    pub fn is_finite(&self) -> bool {
        self.figures().iter().all(|v| v.is_finite())
    }
}

/// A fully computed, itemized quote. Immutable once produced.
///
/// Snapshots written by older front-ends used `timestamp`, `calculations`
/// and numeric ids; those are accepted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(deserialize_with = "deserialize_quote_id")]
    pub id: String,
    #[serde(alias = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub plan: Plan,
    pub service: Service,
    pub hours: u32,
    pub billing_period: BillingPeriod,
    pub currency: CurrencyCode,
    pub rush_order: bool,
    pub maintenance: bool,
    #[serde(alias = "calculations")]
    pub breakdown: QuoteBreakdown,
}

impl Quote {
    /// The request this quote was computed from.
    pub fn request(&self) -> QuoteRequest {
        QuoteRequest {
            plan: self.plan.clone(),
            service: self.service.clone(),
            hours: self.hours,
            billing_period: self.billing_period.clone(),
            currency: self.currency.clone(),
            rush_order: self.rush_order,
            maintenance: self.maintenance,
        }
    }

    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            id: self.id.clone(),
            created_at: self.created_at,
            plan_name: self.plan.name.clone(),
            service_name: self.service.name.clone(),
            hours: self.hours,
            currency_symbol: self.currency.symbol().to_string(),
            currency: self.currency.clone(),
            converted_total: self.breakdown.converted_total,
        }
    }
}

/// Compact projection of a quote for history listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub plan_name: String,
    pub service_name: String,
    pub hours: u32,
    pub currency: CurrencyCode,
    pub currency_symbol: String,
    pub converted_total: f64,
}

fn deserialize_quote_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}
