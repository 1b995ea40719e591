use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use renewcast_models::config::CurrencyConfig;
use renewcast_models::keys;
use renewcast_models::{Metric, Window};
use renewcast_store::{EstimateCache, SubscriptionStore};
use tracing::{debug, info};

use crate::error::EstimateError;
use crate::format;

/// A presented estimate: a plain count for sales, a display-ready currency
/// string for revenue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EstimateValue {
    Sales(u64),
    Revenue(String),
}

impl fmt::Display for EstimateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateValue::Sales(count) => write!(f, "{count}"),
            EstimateValue::Revenue(amount) => f.write_str(amount),
        }
    }
}

/// Computes upcoming sales/revenue aggregates, serving cached values while
/// they are fresh.
///
/// Per call: one cache read, at most one store query, at most one cache
/// write. Store errors propagate unretried. A cache that never hits only
/// costs recomputation. Concurrent evaluations may race to fill the same
/// key; the overwrite is idempotent and tolerated.
pub struct Estimator {
    store: Arc<dyn SubscriptionStore>,
    cache: Arc<dyn EstimateCache>,
    key_prefix: String,
    ttl: Duration,
    currency: CurrencyConfig,
}

impl Estimator {
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        cache: Arc<dyn EstimateCache>,
        key_prefix: String,
        ttl: Duration,
        currency: CurrencyConfig,
    ) -> Self {
        Self {
            store,
            cache,
            key_prefix,
            ttl,
            currency,
        }
    }

    /// Count of active subscriptions expiring inside `window`.
    pub async fn sales(&self, window: Window) -> Result<u64, EstimateError> {
        let raw = self.raw_estimate(window, Metric::Sales).await?;
        // A junk cached value displays as zero rather than failing the render
        Ok(raw.trim().parse().unwrap_or(0))
    }

    /// Formatted sum of recurring amounts expiring inside `window`.
    pub async fn revenue(&self, window: Window) -> Result<String, EstimateError> {
        let raw = self.raw_estimate(window, Metric::Revenue).await?;
        Ok(format::display_amount(&raw, &self.currency))
    }

    /// Estimate `metric` over `window`, resolved against the current local
    /// time.
    pub async fn estimate(
        &self,
        window: Window,
        metric: Metric,
    ) -> Result<EstimateValue, EstimateError> {
        match metric {
            Metric::Sales => Ok(EstimateValue::Sales(self.sales(window).await?)),
            Metric::Revenue => Ok(EstimateValue::Revenue(self.revenue(window).await?)),
        }
    }

    /// Cached-or-computed raw aggregate, encoded as a string. A zero
    /// aggregate is cached like any other value.
    async fn raw_estimate(&self, window: Window, metric: Metric) -> Result<String, EstimateError> {
        let key = keys::estimate_key(&self.key_prefix, metric, window);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(%key, "serving cached estimate");
            return Ok(cached);
        }

        let range = window.resolve(Local::now().naive_local());
        let raw = match metric {
            Metric::Sales => self.store.count_expiring(&range).await?.to_string(),
            Metric::Revenue => self.store.sum_recurring_amount(&range).await?.to_string(),
        };

        info!(%key, value = %raw, "computed estimate");
        self.cache.set(&key, raw.clone(), self.ttl).await;
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use renewcast_models::window::WindowRange;
    use renewcast_store::{MemoryCache, NoopCache, StoreError};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Store double with fixed aggregates and query counters.
    struct CountingStore {
        count: u64,
        sum: Decimal,
        count_calls: AtomicU32,
        sum_calls: AtomicU32,
    }

    impl CountingStore {
        fn new(count: u64, sum: Decimal) -> Self {
            Self {
                count,
                sum,
                count_calls: AtomicU32::new(0),
                sum_calls: AtomicU32::new(0),
            }
        }

        fn queries(&self) -> u32 {
            self.count_calls.load(Ordering::SeqCst) + self.sum_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SubscriptionStore for CountingStore {
        async fn count_expiring(&self, _range: &WindowRange) -> Result<u64, StoreError> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.count)
        }

        async fn sum_recurring_amount(&self, _range: &WindowRange) -> Result<Decimal, StoreError> {
            self.sum_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.sum)
        }
    }

    struct FailingStore;

    #[async_trait]
    impl SubscriptionStore for FailingStore {
        async fn count_expiring(&self, _range: &WindowRange) -> Result<u64, StoreError> {
            Err(StoreError::Unavailable("store offline".to_string()))
        }

        async fn sum_recurring_amount(&self, _range: &WindowRange) -> Result<Decimal, StoreError> {
            Err(StoreError::Unavailable("store offline".to_string()))
        }
    }

    fn estimator(store: Arc<dyn SubscriptionStore>, cache: Arc<dyn EstimateCache>) -> Estimator {
        Estimator::new(
            store,
            cache,
            "test".to_string(),
            Duration::from_secs(300),
            CurrencyConfig::default(),
        )
    }

    #[tokio::test]
    async fn presents_sales_and_revenue() {
        let store = Arc::new(CountingStore::new(3, dec!(29.98)));
        let est = estimator(store, Arc::new(MemoryCache::new(100)));

        let sales = est.estimate(Window::ThisMonth, Metric::Sales).await.unwrap();
        let revenue = est.estimate(Window::ThisMonth, Metric::Revenue).await.unwrap();

        assert_eq!(sales, EstimateValue::Sales(3));
        assert_eq!(revenue, EstimateValue::Revenue("$29.98".to_string()));
    }

    #[tokio::test]
    async fn second_call_within_ttl_issues_no_query() {
        let store = Arc::new(CountingStore::new(3, dec!(29.98)));
        let est = estimator(store.clone(), Arc::new(MemoryCache::new(100)));

        let first = est.sales(Window::ThisWeek).await.unwrap();
        let second = est.sales(Window::ThisWeek).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.count_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_triggers_a_requery() {
        let store = Arc::new(CountingStore::new(1, Decimal::ZERO));
        let est = Estimator::new(
            store.clone(),
            Arc::new(MemoryCache::new(100)),
            "test".to_string(),
            Duration::from_millis(50),
            CurrencyConfig::default(),
        );

        est.sales(Window::Tomorrow).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        est.sales(Window::Tomorrow).await.unwrap();

        assert_eq!(store.count_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_aggregates_are_formatted_and_cached() {
        let store = Arc::new(CountingStore::new(0, Decimal::ZERO));
        let est = estimator(store.clone(), Arc::new(MemoryCache::new(100)));

        assert_eq!(est.sales(Window::NextYear).await.unwrap(), 0);
        assert_eq!(est.revenue(Window::NextYear).await.unwrap(), "$0.00");

        // Zeros come from the cache on the second pass
        est.sales(Window::NextYear).await.unwrap();
        est.revenue(Window::NextYear).await.unwrap();
        assert_eq!(store.queries(), 2);
    }

    #[tokio::test]
    async fn metrics_and_windows_cache_independently() {
        let store = Arc::new(CountingStore::new(2, dec!(10.00)));
        let est = estimator(store.clone(), Arc::new(MemoryCache::new(100)));

        est.sales(Window::ThisMonth).await.unwrap();
        est.revenue(Window::ThisMonth).await.unwrap();
        est.sales(Window::NextMonth).await.unwrap();

        assert_eq!(store.count_calls.load(Ordering::SeqCst), 2);
        assert_eq!(store.sum_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_cache_backend_recomputes_every_call() {
        let store = Arc::new(CountingStore::new(5, dec!(99.95)));
        let est = estimator(store.clone(), Arc::new(NoopCache));

        for _ in 0..3 {
            assert_eq!(est.sales(Window::ThisYear).await.unwrap(), 5);
        }
        assert_eq!(store.count_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let est = estimator(Arc::new(FailingStore), Arc::new(MemoryCache::new(100)));

        let result = est.sales(Window::ThisMonth).await;
        assert!(matches!(
            result,
            Err(EstimateError::Store(StoreError::Unavailable(_)))
        ));
    }

    #[tokio::test]
    async fn junk_cached_count_displays_as_zero_without_requery() {
        let store = Arc::new(CountingStore::new(7, Decimal::ZERO));
        let cache = Arc::new(MemoryCache::new(100));
        cache
            .set(
                &keys::estimate_key("test", Metric::Sales, Window::Tomorrow),
                "garbage".to_string(),
                Duration::from_secs(300),
            )
            .await;

        let est = estimator(store.clone(), cache);
        assert_eq!(est.sales(Window::Tomorrow).await.unwrap(), 0);
        assert_eq!(store.count_calls.load(Ordering::SeqCst), 0);
    }
}
