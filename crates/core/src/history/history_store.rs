use log::{debug, warn};
use std::sync::Arc;

use super::history_errors::HistoryError;
use super::history_traits::BlobStoreTrait;
use crate::pricing::{Quote, QuoteSummary};
use crate::settings::Settings;

/// Result of reading a persisted snapshot into the store.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Nothing was stored.
    Empty,
    /// The snapshot was read; holds the number of quotes kept.
    Loaded(usize),
    /// The snapshot was unreadable and history was reset to empty.
    Recovered(HistoryError),
}

/// Most-recent-first list of computed quotes, optionally bounded.
///
/// Every mutation writes the full list to the blob store. A failed write is
/// reported to the caller but the in-memory change stays applied.
pub struct QuoteHistoryStore {
    store: Arc<dyn BlobStoreTrait>,
    key: String,
    cap: Option<usize>,
    quotes: Vec<Quote>,
}

impl QuoteHistoryStore {
    /// `cap` of `None` (or `Some(0)`) keeps every quote.
    pub fn new(store: Arc<dyn BlobStoreTrait>, key: impl Into<String>, cap: Option<usize>) -> Self {
        QuoteHistoryStore {
            store,
            key: key.into(),
            cap: cap.filter(|c| *c > 0),
            quotes: Vec::new(),
        }
    }

    pub fn from_settings(store: Arc<dyn BlobStoreTrait>, settings: &Settings) -> Self {
        Self::new(store, settings.history_key.clone(), settings.history_cap)
    }

    pub fn cap(&self) -> Option<usize> {
        self.cap
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn list(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn summaries(&self) -> Vec<QuoteSummary> {
        self.quotes.iter().map(Quote::summary).collect()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.id == id)
    }

    /// Inserts at the front, drops the oldest entries beyond the cap, persists.
    pub fn add(&mut self, quote: Quote) -> Result<(), HistoryError> {
        debug!("Adding quote {} to history", quote.id);
        self.quotes.insert(0, quote);
        self.enforce_cap();
        self.persist()
    }

    /// Removes the quote with `id`. Returns `Ok(false)` without persisting if absent.
    pub fn remove(&mut self, id: &str) -> Result<bool, HistoryError> {
        let before = self.quotes.len();
        self.quotes.retain(|q| q.id != id);
        if self.quotes.len() == before {
            debug!("Quote {} not in history, nothing to remove", id);
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Empties the history and deletes the stored snapshot.
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.quotes.clear();
        self.store.remove(&self.key).map_err(|e| {
            warn!("Failed to delete quote history: {}", e);
            HistoryError::Save(e.to_string())
        })
    }

    /// Reads the snapshot from the blob store and replaces in-memory state.
    pub fn load(&mut self) -> LoadOutcome {
        match self.store.load(&self.key) {
            Ok(Some(snapshot)) => self.load_from_external(&snapshot),
            Ok(None) => {
                self.quotes.clear();
                LoadOutcome::Empty
            }
            Err(e) => self.discard(HistoryError::Load(e.to_string())),
        }
    }

    /// Replaces in-memory state with a persisted snapshot.
    ///
    /// A snapshot that is not a JSON array of quotes is discarded and the
    /// history becomes empty.
    pub fn load_from_external(&mut self, snapshot: &str) -> LoadOutcome {
        match serde_json::from_str::<Option<Vec<Quote>>>(snapshot) {
            Ok(Some(quotes)) => {
                self.quotes = quotes;
                self.enforce_cap();
                debug!("Loaded {} quotes from history", self.quotes.len());
                LoadOutcome::Loaded(self.quotes.len())
            }
            Ok(None) => {
                self.quotes.clear();
                LoadOutcome::Empty
            }
            Err(e) => self.discard(HistoryError::Load(e.to_string())),
        }
    }

    /// The persisted form of the current list.
    pub fn snapshot(&self) -> Result<String, HistoryError> {
        serde_json::to_string(&self.quotes).map_err(|e| HistoryError::Save(e.to_string()))
    }

    fn discard(&mut self, err: HistoryError) -> LoadOutcome {
        warn!("Discarding quote history: {}", err);
        self.quotes.clear();
        LoadOutcome::Recovered(err)
    }

    fn enforce_cap(&mut self) {
        if let Some(cap) = self.cap {
            self.quotes.truncate(cap);
        }
    }

    fn persist(&self) -> Result<(), HistoryError> {
        let snapshot = self.snapshot()?;
        self.store.save(&self.key, &snapshot).map_err(|e| {
            warn!("Failed to persist quote history: {}", e);
            HistoryError::Save(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BillingPeriod, CurrencyCode, CurrencyTable, DiscountTable, Plan, Service};
    use crate::errors::{DatabaseError, Error, Result};
    use crate::history::InMemoryBlobStore;
    use crate::pricing::{compute_quote, NewQuote, QuoteBreakdown};
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    // ============== Mock Blob Store ==============

    #[derive(Default)]
    struct MockBlobStore {
        saved: Mutex<Option<String>>,
        saves: Mutex<usize>,
        fail_on_save: Mutex<bool>,
        fail_on_load: Mutex<bool>,
    }

    impl MockBlobStore {
        fn set_fail_on_save(&self, fail: bool) {
            *self.fail_on_save.lock().unwrap() = fail;
        }

        fn set_fail_on_load(&self, fail: bool) {
            *self.fail_on_load.lock().unwrap() = fail;
        }

        fn save_count(&self) -> usize {
            *self.saves.lock().unwrap()
        }
    }

    impl BlobStoreTrait for MockBlobStore {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            if *self.fail_on_load.lock().unwrap() {
                return Err(Error::Database(DatabaseError::QueryFailed(
                    "disk unavailable".to_string(),
                )));
            }
            Ok(self.saved.lock().unwrap().clone())
        }

        fn save(&self, _key: &str, value: &str) -> Result<()> {
            if *self.fail_on_save.lock().unwrap() {
                return Err(Error::Database(DatabaseError::QueryFailed(
                    "quota exceeded".to_string(),
                )));
            }
            *self.saves.lock().unwrap() += 1;
            *self.saved.lock().unwrap() = Some(value.to_string());
            Ok(())
        }

        fn remove(&self, _key: &str) -> Result<()> {
            *self.saved.lock().unwrap() = None;
            Ok(())
        }
    }

    fn make_quote(id: &str, hours: u32) -> Quote {
        let subtotal = 10.0 * f64::from(hours);
        Quote {
            id: id.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            plan: Plan {
                id: "basic".to_string(),
                name: "Basic Plan".to_string(),
                base_hours: 60.0,
                base_price_usd: 600.0,
                description: "Small projects".to_string(),
                features: vec!["Email support".to_string()],
                popular: false,
            },
            service: Service {
                id: "web".to_string(),
                name: "Web Development".to_string(),
                base_rate: 1.0,
            },
            hours,
            billing_period: BillingPeriod::Monthly,
            currency: CurrencyCode::Usd,
            rush_order: false,
            maintenance: false,
            breakdown: QuoteBreakdown {
                base_hourly_rate: 10.0,
                service_multiplier: 1.0,
                adjusted_hourly_rate: 10.0,
                discount_rate: 0.0,
                discounted_rate: 10.0,
                final_hourly_rate: 10.0,
                subtotal,
                discount_amount: 0.0,
                rush_surcharge: 0.0,
                maintenance_cost: 0.0,
                total: subtotal,
                exchange_rate: 1.0,
                converted_total: subtotal,
            },
        }
    }

    fn ids(store: &QuoteHistoryStore) -> Vec<&str> {
        store.list().iter().map(|q| q.id.as_str()).collect()
    }

    #[test]
    fn test_add_inserts_most_recent_first_and_persists() {
        let blob = Arc::new(MockBlobStore::default());
        let mut store = QuoteHistoryStore::new(blob.clone(), "history", None);

        store.add(make_quote("a", 1)).unwrap();
        store.add(make_quote("b", 2)).unwrap();

        assert_eq!(ids(&store), vec!["b", "a"]);
        assert_eq!(blob.save_count(), 2);
        let persisted: Vec<Quote> =
            serde_json::from_str(blob.saved.lock().unwrap().as_deref().unwrap()).unwrap();
        assert_eq!(persisted, store.list());
    }

    #[test]
    fn test_add_drops_oldest_beyond_cap() {
        let mut store = QuoteHistoryStore::new(Arc::new(InMemoryBlobStore::new()), "h", Some(3));
        for i in 0..5 {
            store.add(make_quote(&format!("q{}", i), i + 1)).unwrap();
            assert!(store.len() <= 3);
        }
        assert_eq!(ids(&store), vec!["q4", "q3", "q2"]);
    }

    #[test]
    fn test_zero_cap_means_unbounded() {
        let store = QuoteHistoryStore::new(Arc::new(InMemoryBlobStore::new()), "h", Some(0));
        assert_eq!(store.cap(), None);
    }

    #[test]
    fn test_find_by_id() {
        let mut store = QuoteHistoryStore::new(Arc::new(InMemoryBlobStore::new()), "h", None);
        store.add(make_quote("a", 5)).unwrap();
        assert_eq!(store.find_by_id("a").map(|q| q.hours), Some(5));
        assert!(store.find_by_id("missing").is_none());
    }

    #[test]
    fn test_remove_absent_id_is_a_no_op() {
        let blob = Arc::new(MockBlobStore::default());
        let mut store = QuoteHistoryStore::new(blob.clone(), "h", None);
        store.add(make_quote("a", 1)).unwrap();

        assert_eq!(store.remove("zzz"), Ok(false));
        assert_eq!(ids(&store), vec!["a"]);
        assert_eq!(blob.save_count(), 1);

        assert_eq!(store.remove("a"), Ok(true));
        assert!(store.is_empty());
        assert_eq!(blob.save_count(), 2);
    }

    #[test]
    fn test_clear_empties_and_deletes_snapshot() {
        let blob = Arc::new(MockBlobStore::default());
        let mut store = QuoteHistoryStore::new(blob.clone(), "h", None);
        store.add(make_quote("a", 1)).unwrap();
        store.clear().unwrap();

        assert!(store.is_empty());
        assert_eq!(*blob.saved.lock().unwrap(), None);

        let mut reloaded = QuoteHistoryStore::new(blob, "h", None);
        assert_eq!(reloaded.load(), LoadOutcome::Empty);
    }

    #[test]
    fn test_save_failure_keeps_in_memory_state() {
        let blob = Arc::new(MockBlobStore::default());
        let mut store = QuoteHistoryStore::new(blob.clone(), "h", None);
        blob.set_fail_on_save(true);

        let err = store.add(make_quote("a", 1)).unwrap_err();
        assert!(matches!(err, HistoryError::Save(_)));
        assert_eq!(ids(&store), vec!["a"]);
    }

    #[test]
    fn test_malformed_snapshot_yields_empty_history() {
        let mut store = QuoteHistoryStore::new(Arc::new(InMemoryBlobStore::new()), "h", None);
        store.add(make_quote("a", 1)).unwrap();

        for snapshot in ["{not json", "{\"id\":1}", "[{\"id\":\"x\"}]", "42"] {
            let outcome = store.load_from_external(snapshot);
            assert!(matches!(outcome, LoadOutcome::Recovered(HistoryError::Load(_))));
            assert!(store.is_empty());
        }
    }

    #[test]
    fn test_null_snapshot_is_empty_history() {
        let mut store = QuoteHistoryStore::new(Arc::new(InMemoryBlobStore::new()), "h", None);
        assert_eq!(store.load_from_external("null"), LoadOutcome::Empty);
    }

    #[test]
    fn test_loaded_snapshot_is_truncated_to_cap() {
        let quotes: Vec<Quote> = (0..5).map(|i| make_quote(&format!("q{}", i), 1)).collect();
        let snapshot = serde_json::to_string(&quotes).unwrap();

        let mut store = QuoteHistoryStore::new(Arc::new(InMemoryBlobStore::new()), "h", Some(2));
        assert_eq!(store.load_from_external(&snapshot), LoadOutcome::Loaded(2));
        assert_eq!(ids(&store), vec!["q0", "q1"]);
    }

    #[test]
    fn test_round_trip_through_blob_store() {
        let blob: Arc<dyn BlobStoreTrait> = Arc::new(InMemoryBlobStore::new());
        let mut store = QuoteHistoryStore::new(blob.clone(), "h", Some(20));
        store.add(make_quote("a", 3)).unwrap();
        store.add(make_quote("b", 7)).unwrap();

        let mut reloaded = QuoteHistoryStore::new(blob, "h", Some(20));
        assert_eq!(reloaded.load(), LoadOutcome::Loaded(2));
        assert_eq!(reloaded.list(), store.list());
    }

    #[test]
    fn test_round_trip_keeps_fractional_figures_bit_exact() {
        let new_quote = NewQuote {
            plan: Some(Plan {
                id: "odd".to_string(),
                name: "Odd Plan".to_string(),
                base_hours: 37.0,
                base_price_usd: 1234.567,
                description: String::new(),
                features: vec![],
                popular: false,
            }),
            service: Some(Service {
                id: "tuned".to_string(),
                name: "Tuned".to_string(),
                base_rate: 1.772_673_844_558_968_3,
            }),
            hours: 113,
            billing_period: BillingPeriod::Annual,
            currency: CurrencyCode::Brl,
            rush_order: true,
            maintenance: true,
        };
        let discounts: DiscountTable = [(BillingPeriod::Annual, 0.15)].into_iter().collect();
        let currencies: CurrencyTable = [(CurrencyCode::Brl, 4.95)].into_iter().collect();

        let blob: Arc<dyn BlobStoreTrait> = Arc::new(InMemoryBlobStore::new());
        let mut store = QuoteHistoryStore::new(blob.clone(), "h", None);
        for hours in [113, 7, 59] {
            let quote = compute_quote(
                &NewQuote { hours, ..new_quote.clone() },
                &discounts,
                &currencies,
            )
            .unwrap();
            store.add(quote).unwrap();
        }

        let mut reloaded = QuoteHistoryStore::new(blob, "h", None);
        assert_eq!(reloaded.load(), LoadOutcome::Loaded(3));
        for (before, after) in store.list().iter().zip(reloaded.list()) {
            assert_eq!(
                before.breakdown.service_multiplier.to_bits(),
                after.breakdown.service_multiplier.to_bits()
            );
            assert_eq!(
                before.breakdown.converted_total.to_bits(),
                after.breakdown.converted_total.to_bits()
            );
        }
        assert_eq!(reloaded.list(), store.list());
    }

    #[test]
    fn test_load_failure_recovers_as_empty() {
        let blob = Arc::new(MockBlobStore::default());
        blob.set_fail_on_load(true);
        let mut store = QuoteHistoryStore::new(blob, "h", None);

        assert!(matches!(store.load(), LoadOutcome::Recovered(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_with_nothing_stored_is_empty() {
        let mut store = QuoteHistoryStore::new(Arc::new(InMemoryBlobStore::new()), "h", None);
        assert_eq!(store.load(), LoadOutcome::Empty);
    }

    #[test]
    fn test_summaries_project_list_order() {
        let mut store = QuoteHistoryStore::new(Arc::new(InMemoryBlobStore::new()), "h", None);
        store.add(make_quote("a", 2)).unwrap();
        store.add(make_quote("b", 4)).unwrap();

        let summaries = store.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].id, "b");
        assert_eq!(summaries[0].converted_total, 40.0);
        assert_eq!(summaries[0].currency_symbol, "$");
        assert_eq!(summaries[1].plan_name, "Basic Plan");
    }
}
