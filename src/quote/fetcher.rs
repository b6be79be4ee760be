//! Last-request-wins quote fetcher
//!
//! Every amount edit issues a new request tag. Issuing is synchronous (the tag
//! and the pending state are published immediately); the lookup itself runs as
//! a [`QuoteTask`]. A completion only lands if its tag is still the latest one,
//! so an old response arriving late can never overwrite a newer request.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::client::QuoteSource;
use super::types::{Quote, QuoteData, QuoteError, QuoteStatus};
use crate::wizard::step::is_positive_amount;

struct Inner {
    source: Arc<dyn QuoteSource>,
    state: watch::Sender<Quote>,
    debounce: Duration,
}

/// Shared handle to the quote state; clones observe and drive the same quote
#[derive(Clone)]
pub struct QuoteFetcher {
    inner: Arc<Inner>,
}

impl QuoteFetcher {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self::with_debounce(source, Duration::ZERO)
    }

    /// With a non-zero debounce, a task waits before calling the service and
    /// skips the call entirely if it was superseded in the meantime.
    pub fn with_debounce(source: Arc<dyn QuoteSource>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(Quote::default());
        Self {
            inner: Arc::new(Inner {
                source,
                state,
                debounce,
            }),
        }
    }

    /// Snapshot of the displayed quote
    pub fn current(&self) -> Quote {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Quote> {
        self.inner.state.subscribe()
    }

    /// Tag of the most recently issued request
    pub fn latest_request_id(&self) -> u64 {
        self.inner.state.borrow().request_id
    }

    /// Issue a request for `amount`.
    ///
    /// Empty or non-positive amounts reset the quote to idle without touching
    /// the network and return `None`. They still take a tag, so anything in
    /// flight for an earlier amount is discarded when it completes.
    pub fn issue(&self, amount: &str) -> Option<QuoteTask> {
        let positive = is_positive_amount(amount);
        let mut request_id = 0;

        self.inner.state.send_modify(|quote| {
            quote.request_id += 1;
            request_id = quote.request_id;
            quote.amount = amount.to_string();
            if positive {
                quote.status = QuoteStatus::Pending;
            } else {
                quote.clear_figures();
            }
        });

        if !positive {
            debug!("Quote reset: amount={:?} is not positive", amount);
            return None;
        }

        debug!("Quote request #{} issued: amount={}", request_id, amount);
        Some(QuoteTask {
            fetcher: self.clone(),
            request_id,
            amount: amount.to_string(),
        })
    }

    /// Issue a request and wait for it; returns the quote state afterwards
    pub async fn fetch_quote(&self, amount: &str) -> Quote {
        if let Some(task) = self.issue(amount) {
            task.run().await;
        }
        self.current()
    }

    /// Apply a finished lookup unless a newer request has been issued since
    fn complete(&self, request_id: u64, result: Result<QuoteData, QuoteError>) -> bool {
        self.inner.state.send_if_modified(|quote| {
            if quote.request_id != request_id {
                debug!(
                    "Discarding stale quote #{} (latest is #{})",
                    request_id, quote.request_id
                );
                return false;
            }
            match result {
                Ok(data) => {
                    info!(
                        "Quote #{} ready: {} -> {} (rate {})",
                        request_id, data.from_amount, data.to_amount, data.rate
                    );
                    quote.apply(data);
                }
                Err(e) => {
                    warn!("Quote #{} failed: {}", request_id, e);
                    quote.clear_figures();
                    quote.status = QuoteStatus::Failed(e.user_message());
                }
            }
            true
        })
    }
}

/// One issued quote lookup
#[must_use = "a QuoteTask does nothing until it is run or spawned"]
pub struct QuoteTask {
    fetcher: QuoteFetcher,
    request_id: u64,
    amount: String,
}

impl QuoteTask {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Perform the lookup. Returns true if the result was applied.
    pub async fn run(self) -> bool {
        let inner = &self.fetcher.inner;

        if !inner.debounce.is_zero() {
            tokio::time::sleep(inner.debounce).await;
            if self.fetcher.latest_request_id() != self.request_id {
                debug!("Quote #{} superseded before sending", self.request_id);
                return false;
            }
        }

        let result = inner.source.quote(&self.amount).await;
        self.fetcher.complete(self.request_id, result)
    }

    pub fn spawn(self) -> JoinHandle<bool> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::oneshot;

    fn data_for(amount: &str) -> QuoteData {
        QuoteData {
            from_amount: amount.to_string(),
            to_amount: format!("{}000", amount),
            rate: "1000".to_string(),
            gas_estimate: "0.002".to_string(),
            eth_price_usd: Some("3400".to_string()),
            xlm_price_usd: Some("0.12".to_string()),
            source: Some("test".to_string()),
        }
    }

    /// Answers instantly, or with a configured error message
    #[derive(Default)]
    struct InstantSource {
        errors: HashMap<String, String>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QuoteSource for InstantSource {
        async fn quote(&self, amount: &str) -> Result<QuoteData, QuoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.errors.get(amount) {
                Some(msg) => Err(QuoteError::Service(msg.clone())),
                None => Ok(data_for(amount)),
            }
        }
    }

    /// Holds each response until the test releases it
    #[derive(Default)]
    struct GatedSource {
        gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    }

    impl GatedSource {
        fn gate(&self, amount: &str) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().insert(amount.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl QuoteSource for GatedSource {
        async fn quote(&self, amount: &str) -> Result<QuoteData, QuoteError> {
            let gate = self.gates.lock().remove(amount);
            if let Some(rx) = gate {
                let _ = rx.await;
            }
            Ok(data_for(amount))
        }
    }

    #[tokio::test]
    async fn test_fetch_quote_success() {
        let fetcher = QuoteFetcher::new(Arc::new(InstantSource::default()));

        let quote = fetcher.fetch_quote("1.5").await;
        assert_eq!(quote.status, QuoteStatus::Ready);
        assert_eq!(quote.to_amount, "1.5000");
        assert_eq!(quote.amount, "1.5");
        assert!(quote.fetched_at.is_some());
    }

    #[tokio::test]
    async fn test_issue_sets_pending() {
        let fetcher = QuoteFetcher::new(Arc::new(InstantSource::default()));

        let task = fetcher.issue("3").expect("positive amount issues a task");
        assert!(fetcher.current().is_loading());
        assert_eq!(task.amount(), "3");
        assert_eq!(task.request_id(), fetcher.latest_request_id());

        assert!(task.run().await);
        assert!(fetcher.current().is_ready());
    }

    #[tokio::test]
    async fn test_non_positive_amount_makes_no_call() {
        let source = Arc::new(InstantSource::default());
        let fetcher = QuoteFetcher::new(source.clone());

        for amount in ["0", "", "-1", "abc"] {
            let quote = fetcher.fetch_quote(amount).await;
            assert_eq!(quote.status, QuoteStatus::Idle);
            assert!(quote.error().is_none());
            assert!(quote.is_empty());
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_clears_previous_quote() {
        let fetcher = QuoteFetcher::new(Arc::new(InstantSource::default()));

        fetcher.fetch_quote("2").await;
        assert!(!fetcher.current().is_empty());

        let quote = fetcher.fetch_quote("0").await;
        assert!(quote.is_empty());
        assert!(!quote.is_loading());
    }

    #[tokio::test]
    async fn test_service_error_surfaces_message() {
        let mut source = InstantSource::default();
        source
            .errors
            .insert("1".to_string(), "rate unavailable".to_string());
        let fetcher = QuoteFetcher::new(Arc::new(source));

        let quote = fetcher.fetch_quote("1").await;
        assert_eq!(
            quote.status,
            QuoteStatus::Failed("rate unavailable".to_string())
        );
        assert_eq!(quote.error(), Some("rate unavailable"));

        // Next edit clears the error
        let quote = fetcher.fetch_quote("2").await;
        assert!(quote.error().is_none());
        assert!(quote.is_ready());
    }

    #[tokio::test]
    async fn test_late_older_response_is_discarded() {
        let fetcher = QuoteFetcher::new(Arc::new(InstantSource::default()));

        let first = fetcher.issue("1").unwrap();
        let second = fetcher.issue("2").unwrap();

        // "2" completes first, then the older "1" arrives
        assert!(second.run().await);
        assert!(!first.run().await);

        let quote = fetcher.current();
        assert_eq!(quote.from_amount, "2");
        assert_eq!(quote.amount, "2");
        assert!(quote.is_ready());
    }

    #[tokio::test]
    async fn test_stale_response_does_not_clobber_pending_request() {
        let fetcher = QuoteFetcher::new(Arc::new(InstantSource::default()));

        let first = fetcher.issue("1").unwrap();
        let _second = fetcher.issue("2").unwrap();

        assert!(!first.run().await);
        assert!(fetcher.current().is_loading());
    }

    #[tokio::test]
    async fn test_reset_discards_in_flight_request() {
        let fetcher = QuoteFetcher::new(Arc::new(InstantSource::default()));

        let task = fetcher.issue("5").unwrap();
        assert!(fetcher.issue("").is_none());

        assert!(!task.run().await);
        assert!(fetcher.current().is_empty());
        assert_eq!(fetcher.current().status, QuoteStatus::Idle);
    }

    #[tokio::test]
    async fn test_spawned_requests_resolve_last_issued_wins() {
        let source = Arc::new(GatedSource::default());
        let release_one = source.gate("1");
        let release_two = source.gate("2");
        let fetcher = QuoteFetcher::new(source.clone());
        let mut updates = fetcher.subscribe();

        let first = fetcher.issue("1").unwrap().spawn();
        let second = fetcher.issue("2").unwrap().spawn();

        release_two.send(()).unwrap();
        assert!(second.await.unwrap());
        updates.changed().await.unwrap();

        release_one.send(()).unwrap();
        assert!(!first.await.unwrap());

        assert_eq!(fetcher.current().from_amount, "2");
        assert_eq!(updates.borrow().from_amount, "2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_skips_superseded_requests() {
        let source = Arc::new(InstantSource::default());
        let fetcher = QuoteFetcher::with_debounce(source.clone(), Duration::from_millis(300));

        let first = fetcher.issue("1").unwrap().spawn();
        let second = fetcher.issue("12").unwrap().spawn();

        assert!(!first.await.unwrap());
        assert!(second.await.unwrap());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(fetcher.current().from_amount, "12");
    }
}
