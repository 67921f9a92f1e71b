//! Notification deduplication for budget alerts
//!
//! For a given (user, category, month, year, severity) at most one unread
//! notification exists. Marking it read releases the key, so a later breach
//! of the same period alerts again.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::{BudgetPeriod, Category, NewNotification, NotificationType};
use crate::store::RecordStore;

/// Which threshold a budget alert reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    NearLimit,
    Exceeded,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NearLimit => "near_limit",
            Self::Exceeded => "exceeded",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::NearLimit => "Budget Alert",
            Self::Exceeded => "Budget Exceeded",
        }
    }

    pub fn notification_type(&self) -> NotificationType {
        match self {
            Self::NearLimit => NotificationType::Info,
            Self::Exceeded => NotificationType::Warning,
        }
    }
}

/// Dedup key for budget alerts (the user is passed alongside)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AlertKey {
    pub category: Category,
    pub month: u32,
    pub year: i32,
    pub severity: AlertSeverity,
}

impl AlertKey {
    pub fn new(period: BudgetPeriod, severity: AlertSeverity) -> Self {
        Self {
            category: period.category,
            month: period.month,
            year: period.year,
            severity,
        }
    }
}

/// Create the notification unless an unread one with the same key exists.
///
/// Returns `true` when a notification was created.
pub fn notify_once<S: RecordStore + ?Sized>(
    store: &S,
    user_id: &str,
    key: &AlertKey,
    payload: &NewNotification,
) -> Result<bool> {
    if let Some(existing) = store.find_unread_alert(user_id, key)? {
        debug!(
            user_id,
            category = key.category.as_str(),
            severity = key.severity.as_str(),
            existing,
            "Unread alert already open, skipping"
        );
        return Ok(false);
    }

    // A concurrent writer can still win between the lookup and the insert;
    // the store suppresses that duplicate instead of erroring.
    match store.insert_alert(user_id, key, payload)? {
        Some(id) => {
            debug!(user_id, id, severity = key.severity.as_str(), "Created budget alert");
            Ok(true)
        }
        None => Ok(false),
    }
}
