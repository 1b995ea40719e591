use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Timestamp format used in the subscriptions table (`created`, `expiration`).
/// Lexicographic order matches chronological order, so range predicates can
/// compare the TEXT column directly.
pub const SQL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lifecycle states of a subscription. Only `Active` rows count toward
/// upcoming sales/revenue aggregates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Pending,
    Active,
    Cancelled,
    Expired,
    Trialling,
    Failing,
    Completed,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Trialling => "trialling",
            SubscriptionStatus::Failing => "failing",
            SubscriptionStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The schema this component expects of the shared subscriptions table.
///
/// The billing pipeline owns and writes this table; renewcast only reads it.
///
/// ```sql
/// CREATE TABLE IF NOT EXISTS subscriptions (
///     id               INTEGER PRIMARY KEY,
///     customer_id      INTEGER NOT NULL,
///     product_id       INTEGER NOT NULL,
///     period           TEXT NOT NULL,
///     initial_amount   NUMERIC NOT NULL,
///     recurring_amount NUMERIC NOT NULL,
///     created          TEXT NOT NULL,
///     expiration       TEXT NOT NULL,
///     status           TEXT NOT NULL
/// );
/// ```
pub const SUBSCRIPTIONS_TABLE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS subscriptions (
    id               INTEGER PRIMARY KEY,
    customer_id      INTEGER NOT NULL,
    product_id       INTEGER NOT NULL,
    period           TEXT NOT NULL,
    initial_amount   NUMERIC NOT NULL,
    recurring_amount NUMERIC NOT NULL,
    created          TEXT NOT NULL,
    expiration       TEXT NOT NULL,
    status           TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_subscriptions_expiration ON subscriptions(expiration);
CREATE INDEX IF NOT EXISTS idx_subscriptions_status ON subscriptions(status);
";

/// A subscription row as the billing pipeline writes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subscription {
    pub id: i64,
    pub customer_id: i64,
    pub product_id: i64,
    /// Billing period, e.g. "month" or "year".
    pub period: String,
    pub initial_amount: Decimal,
    pub recurring_amount: Decimal,
    pub created: NaiveDateTime,
    pub expiration: NaiveDateTime,
    pub status: SubscriptionStatus,
}
