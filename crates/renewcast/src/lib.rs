//! Renewcast — upcoming recurring sales and revenue estimates.
//!
//! Aggregates active subscriptions expiring inside fixed relative time
//! windows, caches each aggregate briefly, and renders the results as a
//! two-table dashboard.
//!
//! # Library Usage
//!
//! ```rust,no_run
//! use renewcast::models::{Metric, RenewcastConfig, Window};
//! use renewcast::estimator::{Estimator, EstimateValue};
//! use renewcast::store::{MemoryCache, SqliteSubscriptionStore};
//! ```

pub use renewcast_estimator as estimator;
pub use renewcast_models as models;
pub use renewcast_store as store;

pub mod report;

use std::sync::Arc;
use std::time::Duration;

use renewcast_estimator::Estimator;
use renewcast_models::RenewcastConfig;
use renewcast_store::{MemoryCache, SqliteSubscriptionStore};

/// Build an Estimator from configuration.
pub fn build_estimator(config: &RenewcastConfig) -> Result<Estimator, anyhow::Error> {
    let store = SqliteSubscriptionStore::open(&config.store.sqlite_path)?;
    let cache = MemoryCache::new(config.cache.memory_max_capacity);

    Ok(Estimator::new(
        Arc::new(store),
        Arc::new(cache),
        config.cache.key_prefix.clone(),
        Duration::from_secs(config.cache.ttl_seconds),
        config.currency.clone(),
    ))
}
