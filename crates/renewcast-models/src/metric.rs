use std::fmt;

use serde::{Deserialize, Serialize};

/// Which aggregate to compute over matching subscriptions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Count of active subscriptions expiring in the window.
    Sales,
    /// Sum of `recurring_amount` over those subscriptions.
    Revenue,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Sales, Metric::Revenue];

    pub fn tag(&self) -> &'static str {
        match self {
            Metric::Sales => "sales",
            Metric::Revenue => "revenue",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
