//! Monthly trend and daily activity series

use chrono::{Datelike, Duration, NaiveDate};

use super::previous_month;
use super::types::{DailyPoint, MonthlyPoint};
use crate::models::{Expense, Income};

/// Default number of months in the trend series
pub const DEFAULT_TREND_MONTHS: u32 = 6;

/// Default number of days in the daily activity series
pub const DEFAULT_ACTIVITY_DAYS: u32 = 30;

/// Longest trend series computed; larger requests are capped
pub const MAX_TREND_MONTHS: u32 = 60;

/// Longest daily activity series computed; larger requests are capped
pub const MAX_ACTIVITY_DAYS: u32 = 366;

const SHORT_MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Expense and income totals for the trailing `months` calendar months,
/// oldest first, ending with the month containing `today`.
///
/// `months` is capped at [`MAX_TREND_MONTHS`].
pub fn monthly_trend(
    expenses: &[Expense],
    income: &[Income],
    today: NaiveDate,
    months: u32,
) -> Vec<MonthlyPoint> {
    let months = months.min(MAX_TREND_MONTHS);
    let mut periods = Vec::with_capacity(months as usize);
    let (mut year, mut month) = (today.year(), today.month0());
    for _ in 0..months {
        periods.push((year, month));
        (year, month) = previous_month(year, month);
    }
    periods.reverse();

    periods
        .into_iter()
        .map(|(year, month)| {
            let spent: f64 = expenses
                .iter()
                .filter(|e| e.date.year() == year && e.date.month0() == month)
                .map(|e| e.amount)
                .sum();
            let earned: f64 = income
                .iter()
                .filter(|i| i.date.year() == year && i.date.month0() == month)
                .map(|i| i.amount)
                .sum();

            MonthlyPoint {
                month: SHORT_MONTHS[month as usize].to_string(),
                year,
                expenses: spent.round() as i64,
                income: earned.round() as i64,
            }
        })
        .collect()
}

/// Spend per day for the last `days` days, oldest first, ending today
///
/// `days` is capped at [`MAX_ACTIVITY_DAYS`]; days before the earliest
/// representable date are dropped.
pub fn daily_activity(expenses: &[Expense], today: NaiveDate, days: u32) -> Vec<DailyPoint> {
    let days = days.min(MAX_ACTIVITY_DAYS);
    (0..i64::from(days))
        .rev()
        .filter_map(|offset| today.checked_sub_signed(Duration::days(offset)))
        .map(|date| {
            let amount = expenses
                .iter()
                .filter(|e| e.date == date)
                .map(|e| e.amount)
                .sum();
            DailyPoint { date, amount }
        })
        .collect()
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
    fn test_trend_spans_year_boundary() {
        let today = d(2024, 2, 10);
        let expenses = vec![
            expense(10.4, Category::Food, d(2024, 2, 1)),
            expense(20.6, Category::Food, d(2023, 12, 24)),
            expense(500.0, Category::Food, d(2023, 8, 1)),
        ];
        let incomes = vec![income(1500.5, d(2024, 1, 1), true)];

        let trend = monthly_trend(&expenses, &incomes, today, DEFAULT_TREND_MONTHS);
        let labels: Vec<&str> = trend.iter().map(|p| p.month.as_str()).collect();
        assert_eq!(labels, vec!["Sep", "Oct", "Nov", "Dec", "Jan", "Feb"]);
        assert_eq!(trend[0].year, 2023);
        assert_eq!(trend[3].expenses, 21);
        assert_eq!(trend[4].income, 1501);
        assert_eq!(trend[5].expenses, 10);
        // August is outside the window
        assert_eq!(trend.iter().map(|p| p.expenses).sum::<i64>(), 31);
    }

    #[test]
    fn test_daily_activity() {
        let today = d(2024, 3, 15);
        let expenses = vec![
            expense(5.0, Category::Food, d(2024, 3, 15)),
            expense(7.5, Category::Food, d(2024, 3, 15)),
            expense(3.0, Category::Food, d(2024, 3, 13)),
        ];

        let series = daily_activity(&expenses, today, 3);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, d(2024, 3, 13));
        assert_eq!(series[0].amount, 3.0);
        assert_eq!(series[1].amount, 0.0);
        assert_eq!(series[2].amount, 12.5);
    }

    #[test]
    fn test_daily_activity_caps_huge_day_counts() {
        let today = d(2024, 3, 15);
        let series = daily_activity(&[], today, 100_000_000);
        assert_eq!(series.len(), MAX_ACTIVITY_DAYS as usize);
        assert_eq!(series.last().unwrap().date, today);
    }

    #[test]
    fn test_daily_activity_near_min_date() {
        let series = daily_activity(&[], NaiveDate::MIN, 5);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, NaiveDate::MIN);
    }

    #[test]
    fn test_trend_caps_huge_month_counts() {
        let trend = monthly_trend(&[], &[], d(2024, 3, 15), u32::MAX);
        assert_eq!(trend.len(), MAX_TREND_MONTHS as usize);
        assert_eq!(trend.last().unwrap().month, "Mar");
        assert_eq!(trend[0].year, 2019);
    }
}
