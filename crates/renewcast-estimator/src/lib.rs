//! The renewcast estimator: cached aggregates over the subscription store,
//! plus the amount presentation pipeline.

pub mod error;
pub mod estimator;
pub mod format;

pub use error::EstimateError;
pub use estimator::{EstimateValue, Estimator};
