//! Injected collaborators for the estimator: the read-only subscription
//! store and the TTL estimate cache.

pub mod cache;
pub mod error;
pub mod subscriptions;

pub use cache::{EstimateCache, MemoryCache, NoopCache};
pub use error::StoreError;
pub use subscriptions::{SqliteSubscriptionStore, SubscriptionStore};
