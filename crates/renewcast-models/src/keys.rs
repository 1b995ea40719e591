//! Cache key conventions.
//!
//! Estimates are cached under `<prefix>_<metric>_<window_tag>`, e.g.
//! `renewcast_estimated_revenue_this_month`. The prefix is configurable so
//! multiple deployments can share one cache backend without colliding.

use crate::metric::Metric;
use crate::window::Window;

pub const DEFAULT_KEY_PREFIX: &str = "renewcast_estimated";

pub fn estimate_key(prefix: &str, metric: Metric, window: Window) -> String {
    format!("{prefix}_{}_{}", metric.tag(), window.tag())
}
