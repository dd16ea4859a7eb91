//! Reference data models: plans, services and the lookup tables used for pricing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Subscription tier defining a base hour allotment and base price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub base_hours: f64,
    #[serde(rename = "basePriceUSD")]
    pub base_price_usd: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

impl Plan {
    /// Base hourly rate in USD. Not guarded; see `pricing::compute_breakdown`.
    pub fn hourly_rate(&self) -> f64 {
        self.base_price_usd / self.base_hours
    }
}

/// Category of work with a multiplier applied to the plan's hourly rate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub base_rate: f64,
}

/// Invoicing cadence. Unknown keys are kept verbatim and carry no discount.
///
/// Build values from strings with `From`; an `Other` holding a known key is
/// folded back to its named variant by `canonical` and by table lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillingPeriod {
    #[default]
    Monthly,
    Quarterly,
    Semiannual,
    Annual,
    Other(String),
}

impl BillingPeriod {
    pub const ALL: [BillingPeriod; 4] = [
        BillingPeriod::Monthly,
        BillingPeriod::Quarterly,
        BillingPeriod::Semiannual,
        BillingPeriod::Annual,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            BillingPeriod::Monthly => "monthly",
            BillingPeriod::Quarterly => "quarterly",
            BillingPeriod::Semiannual => "semiannual",
            BillingPeriod::Annual => "annual",
            BillingPeriod::Other(key) => key,
        }
    }

    pub fn display_name(&self) -> &str {
        if let BillingPeriod::Other(key) = self {
            return match BillingPeriod::from(key.as_str()) {
                BillingPeriod::Other(_) => key.as_str(),
                known => known.known_display_name(),
            };
        }
        self.known_display_name()
    }

    fn known_display_name(&self) -> &'static str {
        match self {
            BillingPeriod::Monthly => "Monthly billing",
            BillingPeriod::Quarterly => "Quarterly billing",
            BillingPeriod::Semiannual => "Semiannual billing",
            BillingPeriod::Annual => "Annual billing",
            BillingPeriod::Other(_) => "",
        }
    }

    /// Folds an `Other` that names a known period into that period.
    pub fn canonical(self) -> Self {
        match self {
            BillingPeriod::Other(key) => BillingPeriod::from(key),
            known => known,
        }
    }
}

impl From<String> for BillingPeriod {
    fn from(value: String) -> Self {
        match value.as_str() {
            "monthly" => BillingPeriod::Monthly,
            "quarterly" => BillingPeriod::Quarterly,
            "semiannual" => BillingPeriod::Semiannual,
            "annual" => BillingPeriod::Annual,
            _ => BillingPeriod::Other(value),
        }
    }
}

impl From<&str> for BillingPeriod {
    fn from(value: &str) -> Self {
        BillingPeriod::from(value.to_string())
    }
}

impl From<BillingPeriod> for String {
    fn from(value: BillingPeriod) -> Self {
        match value {
            BillingPeriod::Other(key) => key,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quote currency. Unknown codes are kept verbatim and behave as USD.
///
/// Same construction rule as `BillingPeriod`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CurrencyCode {
    #[default]
    Usd,
    Eur,
    Ars,
    Brl,
    Other(String),
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 4] = [
        CurrencyCode::Usd,
        CurrencyCode::Eur,
        CurrencyCode::Ars,
        CurrencyCode::Brl,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Ars => "ARS",
            CurrencyCode::Brl => "BRL",
            CurrencyCode::Other(code) => code,
        }
    }

    /// Display symbol; unknown codes fall back to `$`.
    pub fn symbol(&self) -> &'static str {
        match self {
            CurrencyCode::Usd | CurrencyCode::Ars => "$",
            CurrencyCode::Eur => "€",
            CurrencyCode::Brl => "R$",
            CurrencyCode::Other(code) => match CurrencyCode::from(code.as_str()) {
                CurrencyCode::Other(_) => "$",
                known => known.symbol(),
            },
        }
    }

    /// Folds an `Other` that names a known currency into that currency.
    pub fn canonical(self) -> Self {
        match self {
            CurrencyCode::Other(code) => CurrencyCode::from(code),
            known => known,
        }
    }
}

impl From<String> for CurrencyCode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "USD" => CurrencyCode::Usd,
            "EUR" => CurrencyCode::Eur,
            "ARS" => CurrencyCode::Ars,
            "BRL" => CurrencyCode::Brl,
            _ => CurrencyCode::Other(value),
        }
    }
}

impl From<&str> for CurrencyCode {
    fn from(value: &str) -> Self {
        CurrencyCode::from(value.to_string())
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        match value {
            CurrencyCode::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Billing period -> discount fraction in `[0, 1)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountTable(BTreeMap<BillingPeriod, f64>);

impl DiscountTable {
    pub fn new(rates: BTreeMap<BillingPeriod, f64>) -> Self {
        rates.into_iter().collect()
    }

    /// Discount for the period, `0.0` when the period has no entry.
    pub fn rate_for(&self, period: &BillingPeriod) -> f64 {
        self.0
            .get(&period.clone().canonical())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BillingPeriod, &f64)> {
        self.0.iter()
    }
}

impl FromIterator<(BillingPeriod, f64)> for DiscountTable {
    fn from_iter<I: IntoIterator<Item = (BillingPeriod, f64)>>(iter: I) -> Self {
        DiscountTable(iter.into_iter().map(|(k, v)| (k.canonical(), v)).collect())
    }
}

/// Currency -> multiplicative exchange rate relative to USD.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyTable(BTreeMap<CurrencyCode, f64>);

impl CurrencyTable {
    pub fn new(rates: BTreeMap<CurrencyCode, f64>) -> Self {
        rates.into_iter().collect()
    }

    /// Exchange rate for the currency, `1.0` (USD) when the currency has no entry.
    pub fn rate_for(&self, currency: &CurrencyCode) -> f64 {
        self.0
            .get(&currency.clone().canonical())
            .copied()
            .unwrap_or(1.0)
    }

    pub fn currencies(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, &f64)> {
        self.0.iter()
    }
}

impl FromIterator<(CurrencyCode, f64)> for CurrencyTable {
    fn from_iter<I: IntoIterator<Item = (CurrencyCode, f64)>>(iter: I) -> Self {
        CurrencyTable(iter.into_iter().map(|(k, v)| (k.canonical(), v)).collect())
    }
}

/// Read-only reference data loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub plans: Vec<Plan>,
    pub services: Vec<Service>,
    pub currencies: CurrencyTable,
    pub discounts: DiscountTable,
}

impl Catalog {
    pub fn find_plan(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id == plan_id)
    }

    pub fn find_service(&self, service_id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == service_id)
    }
}
