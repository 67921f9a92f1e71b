//! Record store seam used by the budget evaluator and notification deduplicator
//!
//! The evaluator only needs a handful of lookups, so it depends on this trait
//! rather than on `Database` directly. `Database` is the production
//! implementation; tests can substitute stores that fail on purpose.

use crate::db::ExpenseFilter;
use crate::error::Result;
use crate::models::{Budget, BudgetPeriod, Expense, NewNotification};
use crate::notify::AlertKey;

pub trait RecordStore: Send + Sync {
    /// The user's budget for a (category, month, year) period, if one exists
    fn find_budget(&self, user_id: &str, period: BudgetPeriod) -> Result<Option<Budget>>;

    /// The user's expenses matching a filter
    fn find_expenses(&self, user_id: &str, filter: &ExpenseFilter<'_>) -> Result<Vec<Expense>>;

    /// Id of the unread notification carrying this alert key, if any
    fn find_unread_alert(&self, user_id: &str, key: &AlertKey) -> Result<Option<i64>>;

    /// Insert a keyed notification.
    ///
    /// Returns `None` when an unread notification with the same key already
    /// exists (the insert is suppressed rather than failing).
    fn insert_alert(
        &self,
        user_id: &str,
        key: &AlertKey,
        notification: &NewNotification,
    ) -> Result<Option<i64>>;
}

impl RecordStore for crate::db::Database {
    fn find_budget(&self, user_id: &str, period: BudgetPeriod) -> Result<Option<Budget>> {
        self.find_budget_for_period(user_id, period)
    }

    fn find_expenses(&self, user_id: &str, filter: &ExpenseFilter<'_>) -> Result<Vec<Expense>> {
        self.list_expenses(user_id, filter)
    }

    fn find_unread_alert(&self, user_id: &str, key: &AlertKey) -> Result<Option<i64>> {
        self.find_unread_alert_notification(user_id, key)
    }

    fn insert_alert(
        &self,
        user_id: &str,
        key: &AlertKey,
        notification: &NewNotification,
    ) -> Result<Option<i64>> {
        self.insert_alert_notification(user_id, key, notification)
    }
}
