//! Shared data types for renewcast: time windows, metrics, the subscription
//! table schema, cache key conventions, and configuration.

pub mod config;
pub mod keys;
pub mod metric;
pub mod subscription;
pub mod window;

pub use config::RenewcastConfig;
pub use metric::Metric;
pub use subscription::{Subscription, SubscriptionStatus};
pub use window::{Window, WindowRange};
