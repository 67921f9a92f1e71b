//! Reporting windows and windowed analytics

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::breakdown::{category_breakdown, income_summary, worthy_summary};
use super::types::WindowAnalytics;
use super::{percent_change, previous_month};
use crate::db::ExpenseFilter;
use crate::models::{month_range, Expense, Income};

/// Time filter used by the expense list and the reports view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TimeWindow {
    #[serde(rename = "this-month")]
    ThisMonth,
    #[serde(rename = "7d")]
    Last7Days,
    #[default]
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "1y")]
    LastYear,
    #[serde(rename = "all")]
    All,
}

/// An inclusive date span; `None` bounds are open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateSpan {
    pub const UNBOUNDED: DateSpan = DateSpan {
        start: None,
        end: None,
    };

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThisMonth => "this-month",
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
            Self::Last90Days => "90d",
            Self::LastYear => "1y",
            Self::All => "all",
        }
    }

    /// Length of a day-count window
    pub fn days(&self) -> Option<i64> {
        match self {
            Self::Last7Days => Some(7),
            Self::Last30Days => Some(30),
            Self::Last90Days => Some(90),
            Self::LastYear => Some(365),
            Self::ThisMonth | Self::All => None,
        }
    }

    /// The span this window covers as of `today`.
    ///
    /// Day-count windows start at `today - N days` and stay open-ended.
    pub fn current_span(&self, today: NaiveDate) -> DateSpan {
        if let Some(days) = self.days() {
            return DateSpan {
                start: Some(today - Duration::days(days)),
                end: None,
            };
        }
        match self {
            Self::ThisMonth => match month_range(today.year(), today.month0()) {
                Ok((start, end)) => DateSpan {
                    start: Some(start),
                    end: Some(end),
                },
                Err(_) => DateSpan::UNBOUNDED,
            },
            _ => DateSpan::UNBOUNDED,
        }
    }

    /// The comparison span: the equal-length window just before a day-count
    /// window, the previous calendar month for `this-month`, nothing for `all`.
    pub fn previous_span(&self, today: NaiveDate) -> Option<DateSpan> {
        if let Some(days) = self.days() {
            let cutoff = today - Duration::days(days);
            return Some(DateSpan {
                start: Some(cutoff - Duration::days(days)),
                end: cutoff.pred_opt(),
            });
        }
        match self {
            Self::ThisMonth => {
                let (year, month) = previous_month(today.year(), today.month0());
                month_range(year, month).ok().map(|(start, end)| DateSpan {
                    start: Some(start),
                    end: Some(end),
                })
            }
            _ => None,
        }
    }

    /// Apply the window to an expense query
    pub fn apply<'q>(&self, filter: ExpenseFilter<'q>, today: NaiveDate) -> ExpenseFilter<'q> {
        let span = self.current_span(today);
        match (span.start, span.end) {
            (Some(start), Some(end)) => filter.date_range(Some((start, end))),
            (Some(start), None) => filter.since(Some(start)),
            _ => filter,
        }
    }
}

impl std::str::FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "this-month" => Ok(Self::ThisMonth),
            "7d" => Ok(Self::Last7Days),
            "30d" => Ok(Self::Last30Days),
            "90d" => Ok(Self::Last90Days),
            "1y" => Ok(Self::LastYear),
            "all" => Ok(Self::All),
            _ => Err(format!(
                "Unknown window: {} (expected this-month, 7d, 30d, 90d, 1y or all)",
                s
            )),
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Totals, breakdowns and period-over-period deltas for a window
pub fn window_analytics(
    expenses: &[Expense],
    income: &[Income],
    window: TimeWindow,
    today: NaiveDate,
) -> WindowAnalytics {
    let current = window.current_span(today);
    let current_expenses: Vec<Expense> = expenses
        .iter()
        .filter(|e| current.contains(e.date))
        .cloned()
        .collect();
    let current_income: Vec<Income> = income
        .iter()
        .filter(|i| current.contains(i.date))
        .cloned()
        .collect();

    let total_expenses: f64 = current_expenses.iter().map(|e| e.amount).sum();
    let total_income: f64 = current_income.iter().map(|i| i.amount).sum();

    let (expense_change, income_change) = match window.previous_span(today) {
        Some(previous) => {
            let prev_expenses: f64 = expenses
                .iter()
                .filter(|e| previous.contains(e.date))
                .map(|e| e.amount)
                .sum();
            let prev_income: f64 = income
                .iter()
                .filter(|i| previous.contains(i.date))
                .map(|i| i.amount)
                .sum();
            (
                percent_change(total_expenses, prev_expenses),
                percent_change(total_income, prev_income),
            )
        }
        None => (0.0, 0.0),
    };

    WindowAnalytics {
        window,
        start: current.start,
        total_expenses,
        total_income,
        net: total_income - total_expenses,
        expense_change,
        income_change,
        transaction_count: current_expenses.len(),
        categories: category_breakdown(&current_expenses),
        worthy: worthy_summary(&current_expenses),
        income: income_summary(&current_income),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{expense, income};
    use crate::models::Category;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_parse_windows() {
        for window in [
            TimeWindow::ThisMonth,
            TimeWindow::Last7Days,
            TimeWindow::Last30Days,
            TimeWindow::Last90Days,
            TimeWindow::LastYear,
            TimeWindow::All,
        ] {
            assert_eq!(window.as_str().parse::<TimeWindow>().unwrap(), window);
        }
        assert!("2w".parse::<TimeWindow>().is_err());
    }

    #[test]
    fn test_day_window_spans() {
        let today = d(2024, 3, 15);
        let current = TimeWindow::Last7Days.current_span(today);
        assert_eq!(current.start, Some(d(2024, 3, 8)));
        assert!(current.contains(d(2024, 3, 8)));
        assert!(!current.contains(d(2024, 3, 7)));

        let previous = TimeWindow::Last7Days.previous_span(today).unwrap();
        assert_eq!(previous.start, Some(d(2024, 3, 1)));
        assert_eq!(previous.end, Some(d(2024, 3, 7)));
    }

    #[test]
    fn test_this_month_compares_previous_calendar_month() {
        let today = d(2024, 1, 10);
        let current = TimeWindow::ThisMonth.current_span(today);
        assert_eq!(current.start, Some(d(2024, 1, 1)));
        assert_eq!(current.end, Some(d(2024, 1, 31)));

        let previous = TimeWindow::ThisMonth.previous_span(today).unwrap();
        assert_eq!(previous.start, Some(d(2023, 12, 1)));
        assert_eq!(previous.end, Some(d(2023, 12, 31)));
    }

    #[test]
    fn test_window_analytics_changes() {
        let today = d(2024, 3, 15);
        let expenses = vec![
            expense(150.0, Category::Food, d(2024, 3, 10)),
            expense(100.0, Category::Food, d(2024, 3, 3)),
            expense(999.0, Category::Travel, d(2023, 1, 1)),
        ];
        let incomes = vec![income(1000.0, d(2024, 3, 9), false)];

        let result = window_analytics(&expenses, &incomes, TimeWindow::Last7Days, today);
        assert_eq!(result.total_expenses, 150.0);
        assert_eq!(result.expense_change, 50.0);
        // No income in the previous window
        assert_eq!(result.income_change, 0.0);
        assert_eq!(result.net, 850.0);
        assert_eq!(result.transaction_count, 1);

        let all = window_analytics(&expenses, &incomes, TimeWindow::All, today);
        assert_eq!(all.total_expenses, 1249.0);
        assert_eq!(all.expense_change, 0.0);
        assert_eq!(all.start, None);
    }
}
