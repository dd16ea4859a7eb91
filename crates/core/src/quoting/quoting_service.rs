use log::{info, warn};
use std::sync::Arc;

use crate::catalog::{Catalog, Plan, Service};
use crate::errors::Result;
use crate::history::{BlobStoreTrait, HistoryError, LoadOutcome, QuoteHistoryStore};
use crate::pricing::{compute_quote, NewQuote, Quote, QuoteOptions, QuoteSummary};
use crate::settings::Settings;

/// Entry point for a front-end: owns the reference catalog and the quote history.
pub struct QuoteService {
    catalog: Arc<Catalog>,
    history: QuoteHistoryStore,
}

impl QuoteService {
    pub fn new(catalog: Arc<Catalog>, history: QuoteHistoryStore) -> Self {
        QuoteService { catalog, history }
    }

    /// Loads the catalog named by `settings` and the persisted history.
    ///
    /// An unreadable history is logged and replaced with an empty one.
    pub fn from_settings(settings: &Settings, store: Arc<dyn BlobStoreTrait>) -> Result<Self> {
        let catalog = match &settings.data_dir {
            Some(dir) => {
                info!("Loading catalog from {}", dir.display());
                Catalog::load_from_dir(dir)?
            }
            None => Catalog::builtin()?,
        };

        let mut history = QuoteHistoryStore::from_settings(store, settings);
        if let LoadOutcome::Recovered(e) = history.load() {
            warn!("Starting with empty quote history: {}", e);
        }

        Ok(Self::new(Arc::new(catalog), history))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn plans(&self) -> &[Plan] {
        &self.catalog.plans
    }

    pub fn services(&self) -> &[Service] {
        &self.catalog.services
    }

    pub fn find_plan(&self, plan_id: &str) -> Option<&Plan> {
        self.catalog.find_plan(plan_id)
    }

    pub fn find_service(&self, service_id: &str) -> Option<&Service> {
        self.catalog.find_service(service_id)
    }

    /// Resolves ids against the catalog. Unknown ids leave plan or service
    /// empty, which `preview` then rejects.
    pub fn build_request(
        &self,
        plan_id: &str,
        service_id: &str,
        hours: i64,
        options: QuoteOptions,
    ) -> NewQuote {
        NewQuote {
            plan: self.find_plan(plan_id).cloned(),
            service: self.find_service(service_id).cloned(),
            hours,
            billing_period: options.billing_period,
            currency: options.currency,
            rush_order: options.rush_order,
            maintenance: options.maintenance,
        }
    }

    /// Computes a quote without recording it.
    pub fn preview(&self, new_quote: &NewQuote) -> Result<Quote> {
        compute_quote(
            new_quote,
            &self.catalog.discounts,
            &self.catalog.currencies,
        )
    }

    /// Computes a quote and records it in history.
    ///
    /// A failed history write does not fail the call; it is returned next to the quote.
    pub fn calculate_and_save(
        &mut self,
        new_quote: &NewQuote,
    ) -> Result<(Quote, Option<HistoryError>)> {
        let quote = self.preview(new_quote)?;
        let warning = self.history.add(quote.clone()).err();
        Ok((quote, warning))
    }

    pub fn save_quote(&mut self, quote: Quote) -> std::result::Result<(), HistoryError> {
        self.history.add(quote)
    }

    pub fn history(&self) -> &[Quote] {
        self.history.list()
    }

    pub fn history_summaries(&self) -> Vec<QuoteSummary> {
        self.history.summaries()
    }

    pub fn find_quote(&self, id: &str) -> Option<&Quote> {
        self.history.find_by_id(id)
    }

    pub fn delete_quote(&mut self, id: &str) -> std::result::Result<bool, HistoryError> {
        self.history.remove(id)
    }

    pub fn clear_history(&mut self) -> std::result::Result<(), HistoryError> {
        self.history.clear()
    }

    /// Rebuilds the request of a saved quote so it can be edited and recomputed.
    ///
    /// Current catalog entries win over the copies stored in the quote; a plan
    /// or service that left the catalog is taken from the quote itself.
    pub fn reload_request(&self, id: &str) -> Option<NewQuote> {
        let mut request = self.history.find_by_id(id)?.request();
        if let Some(plan) = self.find_plan(&request.plan.id) {
            request.plan = plan.clone();
        }
        if let Some(service) = self.find_service(&request.service.id) {
            request.service = service.clone();
        }
        Some(request.into())
    }
}
