//! Analytics result types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::window::TimeWindow;
use crate::models::Category;

/// Spend attributed to one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: f64,
}

/// Current calendar month vs the previous one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_expenses: f64,
    pub total_income: f64,
    pub savings: f64,
    /// Percent of income saved; 0 when there is no income
    pub savings_rate: f64,
    /// Percent change vs previous month; 0 when the previous month is empty
    pub expense_change: f64,
    pub income_change: f64,
    pub highest_category: CategoryTotal,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Warning,
    Info,
}

/// A short observation shown next to the dashboard stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: InsightKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub insights: Vec<Insight>,
}

/// One month of the trend series, amounts rounded to whole units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// Short month name ("Jan")
    pub month: String,
    pub year: i32,
    pub expenses: i64,
    pub income: i64,
}

/// One slice of a category breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: Category,
    /// Display name ("Food & Dining")
    pub name: String,
    pub amount: f64,
    /// Share of the grouped total, one decimal
    pub percentage: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorthySummary {
    pub worthy_total: f64,
    pub not_worthy_total: f64,
    pub worthy_count: usize,
    pub not_worthy_count: usize,
    pub worthy_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSummary {
    pub total: f64,
    pub recurring: f64,
    pub one_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub amount: f64,
}

/// Totals for one reporting window compared with the window before it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowAnalytics {
    pub window: TimeWindow,
    /// First day covered (None for all-time)
    pub start: Option<NaiveDate>,
    pub total_expenses: f64,
    pub total_income: f64,
    pub net: f64,
    pub expense_change: f64,
    pub income_change: f64,
    pub transaction_count: usize,
    pub categories: Vec<CategoryShare>,
    pub worthy: WorthySummary,
    pub income: IncomeSummary,
}
