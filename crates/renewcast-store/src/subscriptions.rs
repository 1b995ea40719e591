use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use renewcast_models::subscription::{Subscription, SQL_DATETIME_FORMAT, SUBSCRIPTIONS_TABLE_DDL};
use renewcast_models::window::WindowRange;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::StoreError;

/// Read access to the shared subscriptions table.
///
/// Both aggregates cover active subscriptions whose `expiration` falls inside
/// the inclusive range. Mockable for testing.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn count_expiring(&self, range: &WindowRange) -> Result<u64, StoreError>;

    /// Sum of `recurring_amount`. No matching rows sums to zero.
    async fn sum_recurring_amount(&self, range: &WindowRange) -> Result<Decimal, StoreError>;
}

/// SQLite-backed subscription store.
///
/// The subscriptions table is written by the billing pipeline; this component
/// only reads it. Access is synchronized via `Mutex` since
/// `rusqlite::Connection` is not `Sync`.
pub struct SqliteSubscriptionStore {
    conn: Mutex<Connection>,
}

impl SqliteSubscriptionStore {
    /// Open a read-only connection to the shared database.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database with the schema created. The in-memory DB
    /// is writable so tests can seed data.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SUBSCRIPTIONS_TABLE_DDL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert a subscription row. In production the billing pipeline writes
    /// the table; this method is available for testing and seeding.
    pub fn insert(&self, sub: &Subscription) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO subscriptions \
             (id, customer_id, product_id, period, initial_amount, recurring_amount, \
              created, expiration, status) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                sub.id,
                sub.customer_id,
                sub.product_id,
                sub.period,
                sub.initial_amount.to_string(),
                sub.recurring_amount.to_string(),
                sql_datetime(sub.created),
                sql_datetime(sub.expiration),
                sub.status.as_str(),
            ],
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("connection mutex poisoned: {e}")))
    }
}

#[async_trait]
impl SubscriptionStore for SqliteSubscriptionStore {
    async fn count_expiring(&self, range: &WindowRange) -> Result<u64, StoreError> {
        let begin = sql_datetime(range.begin);
        let end = sql_datetime(range.end);
        debug!(%begin, %end, "counting expiring subscriptions");

        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(
            "SELECT COUNT(*) FROM subscriptions \
             WHERE expiration >= ?1 AND expiration <= ?2 AND status = 'active'",
        )?;
        let count: i64 = stmt.query_row(rusqlite::params![begin, end], |row| row.get(0))?;
        Ok(count as u64)
    }

    async fn sum_recurring_amount(&self, range: &WindowRange) -> Result<Decimal, StoreError> {
        let begin = sql_datetime(range.begin);
        let end = sql_datetime(range.end);
        debug!(%begin, %end, "summing expiring recurring amounts");

        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(
            "SELECT SUM(recurring_amount) FROM subscriptions \
             WHERE expiration >= ?1 AND expiration <= ?2 AND status = 'active'",
        )?;
        let sum: Option<f64> = stmt.query_row(rusqlite::params![begin, end], |row| row.get(0))?;

        // SUM over zero rows is NULL, which counts as zero here
        match sum {
            Some(total) => Decimal::try_from(total)
                .map_err(|e| StoreError::Amount(format!("sum {total} not representable: {e}"))),
            None => Ok(Decimal::ZERO),
        }
    }
}

fn sql_datetime(ts: NaiveDateTime) -> String {
    ts.format(SQL_DATETIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use renewcast_models::subscription::SubscriptionStatus;
    use rust_decimal_macros::dec;

    fn ts(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn make_sub(
        id: i64,
        amount: Decimal,
        expiration: NaiveDateTime,
        status: SubscriptionStatus,
    ) -> Subscription {
        Subscription {
            id,
            customer_id: 100 + id,
            product_id: 1,
            period: "month".to_string(),
            initial_amount: amount,
            recurring_amount: amount,
            created: ts(2024, 1, 1, 9),
            expiration,
            status,
        }
    }

    fn march_range() -> WindowRange {
        WindowRange {
            begin: ts(2024, 3, 1, 0),
            end: NaiveDate::from_ymd_opt(2024, 3, 31)
                .unwrap()
                .and_hms_opt(23, 59, 59)
                .unwrap(),
        }
    }

    #[tokio::test]
    async fn count_includes_only_active_rows_in_range() {
        let store = SqliteSubscriptionStore::open_in_memory().unwrap();
        store
            .insert(&make_sub(1, dec!(10.25), ts(2024, 3, 15, 12), SubscriptionStatus::Active))
            .unwrap();
        store
            .insert(&make_sub(2, dec!(10.25), ts(2024, 3, 16, 12), SubscriptionStatus::Cancelled))
            .unwrap();
        store
            .insert(&make_sub(3, dec!(10.25), ts(2024, 4, 2, 12), SubscriptionStatus::Active))
            .unwrap();

        let count = store.count_expiring(&march_range()).await.unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn sum_adds_recurring_amounts() {
        let store = SqliteSubscriptionStore::open_in_memory().unwrap();
        store
            .insert(&make_sub(1, dec!(10.25), ts(2024, 3, 10, 12), SubscriptionStatus::Active))
            .unwrap();
        store
            .insert(&make_sub(2, dec!(5.50), ts(2024, 3, 20, 12), SubscriptionStatus::Active))
            .unwrap();
        store
            .insert(&make_sub(3, dec!(99.00), ts(2024, 3, 25, 12), SubscriptionStatus::Expired))
            .unwrap();

        let sum = store.sum_recurring_amount(&march_range()).await.unwrap();
        assert_eq!(sum, dec!(15.75));
    }

    #[tokio::test]
    async fn sum_with_no_matching_rows_is_zero() {
        let store = SqliteSubscriptionStore::open_in_memory().unwrap();
        let sum = store.sum_recurring_amount(&march_range()).await.unwrap();
        assert_eq!(sum, Decimal::ZERO);
    }

    #[tokio::test]
    async fn range_bounds_are_inclusive() {
        let store = SqliteSubscriptionStore::open_in_memory().unwrap();
        let range = march_range();
        store
            .insert(&make_sub(1, dec!(1.00), range.begin, SubscriptionStatus::Active))
            .unwrap();
        store
            .insert(&make_sub(2, dec!(1.00), range.end, SubscriptionStatus::Active))
            .unwrap();
        // One second past the end
        store
            .insert(&make_sub(3, dec!(1.00), ts(2024, 4, 1, 0), SubscriptionStatus::Active))
            .unwrap();

        let count = store.count_expiring(&range).await.unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn insert_replaces_existing_id() {
        let store = SqliteSubscriptionStore::open_in_memory().unwrap();
        let mut sub = make_sub(1, dec!(10.25), ts(2024, 3, 15, 12), SubscriptionStatus::Active);
        store.insert(&sub).unwrap();

        sub.status = SubscriptionStatus::Cancelled;
        store.insert(&sub).unwrap();

        let count = store.count_expiring(&march_range()).await.unwrap();
        assert_eq!(count, 0);
    }
}
