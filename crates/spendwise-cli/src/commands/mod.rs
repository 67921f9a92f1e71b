//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Database init and shared utilities (open_db)
//! - `serve` - Web server command
//! - `expenses` - Expense commands (list, add, delete)
//! - `income` - Income commands (list, add, delete)
//! - `budgets` - Budget commands (list, set, delete)
//! - `notifications` - Notification commands (list, read, read-all, delete)
//! - `reports` - Dashboard, trend, category, window and activity reports
//! - `data` - JSON/CSV export and JSON import

pub mod budgets;
pub mod core;
pub mod data;
pub mod expenses;
pub mod income;
pub mod notifications;
pub mod reports;
pub mod serve;

// Re-export command functions for main.rs
pub use budgets::*;
pub use core::*;
pub use data::*;
pub use expenses::*;
pub use income::*;
pub use notifications::*;
pub use reports::*;
pub use serve::*;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use spendwise_core::analytics::TimeWindow;
use spendwise_core::models::Category;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Parse a YYYY-MM-DD argument, defaulting to `today`
pub fn parse_date_arg(date: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| anyhow!("Invalid date '{}' (use YYYY-MM-DD)", s)),
        None => Ok(today),
    }
}

pub fn parse_category_arg(category: &str) -> Result<Category> {
    category.parse::<Category>().map_err(|e| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        anyhow!("{} (expected one of: {})", e, known.join(", "))
    })
}

pub fn parse_window_arg(window: &str) -> Result<TimeWindow> {
    window.parse::<TimeWindow>().map_err(|e| anyhow!(e))
}
