//! Derived analytics over fetched expense and income collections
//!
//! Everything here is a pure function of its inputs. "Now" is passed in as
//! `today` so results are reproducible.
//!
//! - `dashboard` - Current vs previous calendar month, insights
//! - `trend` - Monthly trend and daily activity series
//! - `breakdown` - Category, worthy and income breakdowns
//! - `window` - Reporting windows (this-month, 7d, 30d, 90d, 1y, all)

pub mod breakdown;
pub mod dashboard;
pub mod trend;
pub mod types;
pub mod window;

pub use breakdown::{category_breakdown, income_summary, worthy_summary};
pub use dashboard::{dashboard, dashboard_stats, insights};
pub use trend::{
    daily_activity, monthly_trend, DEFAULT_ACTIVITY_DAYS, DEFAULT_TREND_MONTHS, MAX_ACTIVITY_DAYS,
    MAX_TREND_MONTHS,
};
pub use types::{
    CategoryShare, CategoryTotal, DailyPoint, Dashboard, DashboardStats, IncomeSummary, Insight,
    InsightKind, MonthlyPoint, WindowAnalytics, WorthySummary,
};
pub use window::{window_analytics, DateSpan, TimeWindow};

/// Percent change from `previous` to `current`; 0 when `previous` is 0
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// The zero-based (year, month) before the given one
pub(crate) fn previous_month(year: i32, month0: u32) -> (i32, u32) {
    if month0 == 0 {
        (year - 1, 11)
    } else {
        (year, month0 - 1)
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(150.0, 100.0), 50.0);
        assert_eq!(percent_change(50.0, 100.0), -50.0);
        assert_eq!(percent_change(1000.0, 0.0), 0.0);
    }

    #[test]
    fn test_previous_month_wraps() {
        assert_eq!(previous_month(2024, 0), (2023, 11));
        assert_eq!(previous_month(2024, 5), (2024, 4));
    }
}
