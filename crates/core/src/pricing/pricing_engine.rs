//! Quote computation.
//!
//! The breakdown is computed in a fixed order over `f64`. The discount amount
//! is taken from the subtotal after the rush multiplier has been applied; totals
//! stored by earlier releases depend on that order, so it must not change.

use chrono::Utc;
use log::debug;
use uuid::Uuid;

use super::pricing_model::{NewQuote, Quote, QuoteBreakdown, QuoteRequest};
use crate::catalog::{CurrencyTable, DiscountTable};
use crate::constants::{MAINTENANCE_RATE, RUSH_MULTIPLIER, RUSH_SURCHARGE_RATE};
use crate::errors::{Error, Result};

impl NewQuote {
    /// Checks presence of plan and service and that hours are positive.
    pub fn validate(&self) -> Result<QuoteRequest> {
        let plan = self
            .plan
            .as_ref()
            .ok_or_else(|| Error::InvalidRequest("a plan must be selected".to_string()))?;
        let service = self
            .service
            .as_ref()
            .ok_or_else(|| Error::InvalidRequest("a service must be selected".to_string()))?;

        if self.hours <= 0 {
            return Err(Error::InvalidRequest(format!(
                "hours must be positive, got {}",
                self.hours
            )));
        }
        let hours = u32::try_from(self.hours).map_err(|_| {
            Error::InvalidRequest(format!("hours out of range: {}", self.hours))
        })?;

        if !(plan.base_hours.is_finite() && plan.base_hours > 0.0) {
            return Err(Error::InvalidRequest(format!(
                "plan '{}' has non-positive base hours",
                plan.id
            )));
        }
        if !(plan.base_price_usd.is_finite() && plan.base_price_usd > 0.0) {
            return Err(Error::InvalidRequest(format!(
                "plan '{}' has non-positive base price",
                plan.id
            )));
        }
        if !(service.base_rate.is_finite() && service.base_rate > 0.0) {
            return Err(Error::InvalidRequest(format!(
                "service '{}' has non-positive base rate",
                service.id
            )));
        }

        Ok(QuoteRequest {
            plan: plan.clone(),
            service: service.clone(),
            hours,
            billing_period: self.billing_period.clone().canonical(),
            currency: self.currency.clone().canonical(),
            rush_order: self.rush_order,
            maintenance: self.maintenance,
        })
    }
}

/// Computes every figure of the breakdown for a validated request.
///
/// Fails with `InvalidRequest` if any figure comes out non-finite.
pub fn compute_breakdown(
    request: &QuoteRequest,
    discounts: &DiscountTable,
    currencies: &CurrencyTable,
) -> Result<QuoteBreakdown> {
    let base_hourly_rate = request.plan.base_price_usd / request.plan.base_hours;
    let service_multiplier = request.service.base_rate;
    let adjusted_hourly_rate = base_hourly_rate * service_multiplier;

    let discount_rate = discounts.rate_for(&request.billing_period);
    let discounted_rate = adjusted_hourly_rate * (1.0 - discount_rate);

    let rush_multiplier = if request.rush_order {
        RUSH_MULTIPLIER
    } else {
        1.0
    };
    let final_hourly_rate = discounted_rate * rush_multiplier;

    let subtotal = final_hourly_rate * f64::from(request.hours);
    let discount_amount = subtotal * discount_rate;
    let rush_surcharge = if request.rush_order {
        subtotal * RUSH_SURCHARGE_RATE
    } else {
        0.0
    };
    let maintenance_cost = if request.maintenance {
        subtotal * MAINTENANCE_RATE
    } else {
        0.0
    };
    let total = subtotal - discount_amount + rush_surcharge + maintenance_cost;

    let exchange_rate = currencies.rate_for(&request.currency);
    let converted_total = total * exchange_rate;

    let breakdown = QuoteBreakdown {
        base_hourly_rate,
        service_multiplier,
        adjusted_hourly_rate,
        discount_rate,
        discounted_rate,
        final_hourly_rate,
        subtotal,
        discount_amount,
        rush_surcharge,
        maintenance_cost,
        total,
        exchange_rate,
        converted_total,
    };

    if !breakdown.is_finite() {
        return Err(Error::InvalidRequest(format!(
            "quote for plan '{}' produced a non-finite amount",
            request.plan.id
        )));
    }

    Ok(breakdown)
}

/// Validates `new_quote` and produces a quote with a fresh id and timestamp.
pub fn compute_quote(
    new_quote: &NewQuote,
    discounts: &DiscountTable,
    currencies: &CurrencyTable,
) -> Result<Quote> {
    let request = new_quote.validate()?;
    let breakdown = compute_breakdown(&request, discounts, currencies)?;

    let quote = Quote {
        id: Uuid::new_v4().to_string(),
        created_at: Utc::now(),
        plan: request.plan,
        service: request.service,
        hours: request.hours,
        billing_period: request.billing_period,
        currency: request.currency,
        rush_order: request.rush_order,
        maintenance: request.maintenance,
        breakdown,
    };

    debug!(
        "Computed quote {} for plan '{}': {} {}",
        quote.id, quote.plan.id, quote.breakdown.converted_total, quote.currency
    );
    Ok(quote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BillingPeriod, CurrencyCode, Plan, Service};

    fn basic_plan() -> Plan {
        Plan {
            id: "basic".to_string(),
            name: "Basic Plan".to_string(),
            base_hours: 60.0,
            base_price_usd: 500.0,
            description: String::new(),
            features: vec![],
            popular: false,
        }
    }

    fn web_service(rate: f64) -> Service {
        Service {
            id: "web".to_string(),
            name: "Web Development".to_string(),
            base_rate: rate,
        }
    }

    fn discounts() -> DiscountTable {
        [
            (BillingPeriod::Monthly, 0.0),
            (BillingPeriod::Quarterly, 0.05),
            (BillingPeriod::Annual, 0.15),
        ]
        .into_iter()
        .collect()
    }

    fn currencies() -> CurrencyTable {
        [(CurrencyCode::Usd, 1.0), (CurrencyCode::Eur, 0.92)]
            .into_iter()
            .collect()
    }

    fn new_quote(hours: i64) -> NewQuote {
        NewQuote {
            plan: Some(basic_plan()),
            service: Some(web_service(1.0)),
            hours,
            ..Default::default()
        }
    }

    #[test]
    fn test_plain_quote_matches_plan_price() {
        let quote = compute_quote(&new_quote(60), &discounts(), &currencies()).unwrap();
        let b = quote.breakdown;

        assert_eq!(b.base_hourly_rate, 500.0 / 60.0);
        assert!((b.converted_total - 500.0).abs() < 1e-9);
        assert_eq!(b.discount_amount, 0.0);
        assert_eq!(b.rush_surcharge, 0.0);
        assert_eq!(b.maintenance_cost, 0.0);
        assert_eq!(b.exchange_rate, 1.0);
        assert_eq!(quote.hours, 60);
        assert!(!quote.id.is_empty());
    }

    #[test]
    fn test_rush_order_inflates_subtotal_and_adds_surcharge() {
        let plain = compute_quote(&new_quote(40), &discounts(), &currencies()).unwrap();
        let rush = compute_quote(
            &NewQuote {
                rush_order: true,
                ..new_quote(40)
            },
            &discounts(),
            &currencies(),
        )
        .unwrap();

        let expected_subtotal = plain.breakdown.subtotal * 1.2;
        assert!((rush.breakdown.subtotal - expected_subtotal).abs() < 1e-9);
        assert_eq!(rush.breakdown.rush_surcharge, rush.breakdown.subtotal * 0.2);
    }

    #[test]
    fn test_discount_is_taken_from_rush_inflated_subtotal() {
        let quote = compute_quote(
            &NewQuote {
                rush_order: true,
                billing_period: BillingPeriod::Annual,
                ..new_quote(60)
            },
            &discounts(),
            &currencies(),
        )
        .unwrap();
        let b = quote.breakdown;

        // 500 * 0.85 * 1.2 = 510
        assert!((b.subtotal - 510.0).abs() < 1e-9);
        assert_eq!(b.discount_amount, b.subtotal * 0.15);
        assert_eq!(
            b.total,
            b.subtotal - b.discount_amount + b.rush_surcharge + b.maintenance_cost
        );
    }

    #[test]
    fn test_maintenance_adds_fifteen_percent_of_subtotal() {
        let quote = compute_quote(
            &NewQuote {
                maintenance: true,
                billing_period: BillingPeriod::Quarterly,
                ..new_quote(10)
            },
            &discounts(),
            &currencies(),
        )
        .unwrap();
        let b = quote.breakdown;
        assert_eq!(b.maintenance_cost, b.subtotal * 0.15);
    }

    #[test]
    fn test_currency_conversion_and_unknown_currency_fallback() {
        let eur = compute_quote(
            &NewQuote {
                currency: CurrencyCode::Eur,
                ..new_quote(60)
            },
            &discounts(),
            &currencies(),
        )
        .unwrap();
        assert_eq!(eur.breakdown.exchange_rate, 0.92);
        assert_eq!(eur.breakdown.converted_total, eur.breakdown.total * 0.92);

        let unknown = compute_quote(
            &NewQuote {
                currency: CurrencyCode::from("JPY"),
                ..new_quote(60)
            },
            &discounts(),
            &currencies(),
        )
        .unwrap();
        assert_eq!(unknown.breakdown.exchange_rate, 1.0);
        assert_eq!(unknown.breakdown.converted_total, unknown.breakdown.total);
    }

    #[test]
    fn test_unknown_billing_period_has_no_discount() {
        let quote = compute_quote(
            &NewQuote {
                billing_period: BillingPeriod::from("biennial"),
                ..new_quote(60)
            },
            &discounts(),
            &currencies(),
        )
        .unwrap();
        assert_eq!(quote.breakdown.discount_rate, 0.0);
    }

    #[test]
    fn test_known_keys_wrapped_in_other_still_price() {
        let quote = compute_quote(
            &NewQuote {
                billing_period: BillingPeriod::Other("annual".to_string()),
                currency: CurrencyCode::Other("EUR".to_string()),
                ..new_quote(60)
            },
            &discounts(),
            &currencies(),
        )
        .unwrap();
        assert_eq!(quote.billing_period, BillingPeriod::Annual);
        assert_eq!(quote.currency, CurrencyCode::Eur);
        assert_eq!(quote.breakdown.discount_rate, 0.15);
        assert_eq!(quote.breakdown.exchange_rate, 0.92);
    }

    #[test]
    fn test_invalid_requests_are_rejected() {
        let tables = (discounts(), currencies());
        let cases = vec![
            new_quote(0),
            new_quote(-5),
            NewQuote {
                plan: None,
                ..new_quote(10)
            },
            NewQuote {
                service: None,
                ..new_quote(10)
            },
            NewQuote {
                hours: i64::from(u32::MAX) + 1,
                ..new_quote(10)
            },
        ];

        for case in cases {
            let err = compute_quote(&case, &tables.0, &tables.1).unwrap_err();
            assert!(matches!(err, Error::InvalidRequest(_)), "{:?}", case);
        }
    }

    #[test]
    fn test_zero_hour_plan_is_rejected() {
        let mut plan = basic_plan();
        plan.base_hours = 0.0;
        let err = compute_quote(
            &NewQuote {
                plan: Some(plan),
                ..new_quote(10)
            },
            &discounts(),
            &currencies(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_non_finite_exchange_rate_is_rejected() {
        let currencies: CurrencyTable = [(CurrencyCode::Eur, f64::INFINITY)].into_iter().collect();
        let err = compute_quote(
            &NewQuote {
                currency: CurrencyCode::Eur,
                ..new_quote(10)
            },
            &discounts(),
            &currencies,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_breakdown_is_deterministic() {
        let request = NewQuote {
            service: Some(web_service(1.3)),
            billing_period: BillingPeriod::Annual,
            currency: CurrencyCode::Eur,
            rush_order: true,
            maintenance: true,
            ..new_quote(37)
        }
        .validate()
        .unwrap();

        let first = compute_breakdown(&request, &discounts(), &currencies()).unwrap();
        let second = compute_breakdown(&request, &discounts(), &currencies()).unwrap();
        assert_eq!(
            first.converted_total.to_bits(),
            second.converted_total.to_bits()
        );
        assert_eq!(first, second);
    }
}
