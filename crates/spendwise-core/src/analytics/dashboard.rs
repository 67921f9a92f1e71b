//! Dashboard stats and insights

use chrono::{Datelike, NaiveDate};

use super::breakdown::category_totals;
use super::types::{CategoryTotal, Dashboard, DashboardStats, Insight, InsightKind};
use super::{percent_change, previous_month};
use crate::models::{Category, Expense, Income};

fn in_month(date: NaiveDate, year: i32, month0: u32) -> bool {
    date.year() == year && date.month0() == month0
}

/// Current calendar month vs previous calendar month
pub fn dashboard_stats(expenses: &[Expense], income: &[Income], today: NaiveDate) -> DashboardStats {
    let (year, month) = (today.year(), today.month0());
    let (prev_year, prev_month) = previous_month(year, month);

    let current_expenses: Vec<Expense> = expenses
        .iter()
        .filter(|e| in_month(e.date, year, month))
        .cloned()
        .collect();

    let total_expenses: f64 = current_expenses.iter().map(|e| e.amount).sum();
    let total_income: f64 = income
        .iter()
        .filter(|i| in_month(i.date, year, month))
        .map(|i| i.amount)
        .sum();
    let prev_expenses: f64 = expenses
        .iter()
        .filter(|e| in_month(e.date, prev_year, prev_month))
        .map(|e| e.amount)
        .sum();
    let prev_income: f64 = income
        .iter()
        .filter(|i| in_month(i.date, prev_year, prev_month))
        .map(|i| i.amount)
        .sum();

    let savings = total_income - total_expenses;
    let savings_rate = if total_income > 0.0 {
        savings / total_income * 100.0
    } else {
        0.0
    };

    // Strictly greater so ties go to the first category encountered
    let highest_category = category_totals(&current_expenses).into_iter().fold(
        CategoryTotal {
            category: Category::Other,
            amount: 0.0,
        },
        |max, (category, amount)| {
            if amount > max.amount {
                CategoryTotal { category, amount }
            } else {
                max
            }
        },
    );

    DashboardStats {
        total_expenses,
        total_income,
        savings,
        savings_rate,
        expense_change: percent_change(total_expenses, prev_expenses),
        income_change: percent_change(total_income, prev_income),
        highest_category,
        transaction_count: current_expenses.len(),
    }
}

/// Observations derived from the stats
pub fn insights(stats: &DashboardStats) -> Vec<Insight> {
    let mut insights = Vec::new();

    if stats.savings_rate > 20.0 {
        insights.push(Insight {
            title: "Great savings rate!".to_string(),
            description: format!(
                "You're saving {:.0}% of your income this month.",
                stats.savings_rate
            ),
            kind: InsightKind::Positive,
        });
    } else if stats.savings_rate < 0.0 {
        insights.push(Insight {
            title: "Spending exceeds income".to_string(),
            description: format!(
                "You've spent ${:.2} more than earned.",
                stats.savings.abs()
            ),
            kind: InsightKind::Warning,
        });
    }

    if stats.expense_change > 10.0 {
        insights.push(Insight {
            title: "Spending increased".to_string(),
            description: format!(
                "Your expenses are up {:.1}% from last month.",
                stats.expense_change
            ),
            kind: InsightKind::Warning,
        });
    } else if stats.expense_change < -10.0 {
        insights.push(Insight {
            title: "Spending decreased".to_string(),
            description: format!(
                "Great job! Expenses are down {:.1}%.",
                stats.expense_change.abs()
            ),
            kind: InsightKind::Positive,
        });
    }

    if stats.highest_category.amount > 0.0 {
        let name = stats.highest_category.category.display_name();
        insights.push(Insight {
            title: format!("Highest spending: {}", name),
            description: format!(
                "You've spent ${:.2} on {}.",
                stats.highest_category.amount,
                name.to_lowercase()
            ),
            kind: InsightKind::Info,
        });
    }

    insights
}

/// Stats plus insights in one payload
pub fn dashboard(expenses: &[Expense], income: &[Income], today: NaiveDate) -> Dashboard {
    let stats = dashboard_stats(expenses, income, today);
    let insights = insights(&stats);
    Dashboard { stats, insights }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{expense, income};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_dashboard_stats_month_over_month() {
        let today = d(2024, 3, 20);
        let expenses = vec![
            expense(300.0, Category::Food, d(2024, 3, 2)),
            expense(200.0, Category::Rent, d(2024, 3, 5)),
            expense(400.0, Category::Food, d(2024, 2, 10)),
            // Same month number, different year: ignored
            expense(999.0, Category::Food, d(2023, 3, 5)),
        ];
        let incomes = vec![
            income(2000.0, d(2024, 3, 1), true),
            income(1000.0, d(2024, 2, 1), true),
        ];

        let stats = dashboard_stats(&expenses, &incomes, today);
        assert_eq!(stats.total_expenses, 500.0);
        assert_eq!(stats.total_income, 2000.0);
        assert_eq!(stats.savings, 1500.0);
        assert_eq!(stats.savings_rate, 75.0);
        assert_eq!(stats.expense_change, 25.0);
        assert_eq!(stats.income_change, 100.0);
        assert_eq!(stats.highest_category.category, Category::Food);
        assert_eq!(stats.highest_category.amount, 300.0);
        assert_eq!(stats.transaction_count, 2);
    }

    #[test]
    fn test_zero_previous_month_means_no_change() {
        let today = d(2024, 3, 20);
        let expenses = vec![expense(500.0, Category::Food, d(2024, 3, 2))];

        let stats = dashboard_stats(&expenses, &[], today);
        assert_eq!(stats.expense_change, 0.0);
        assert_eq!(stats.savings_rate, 0.0);
    }

    #[test]
    fn test_january_compares_with_december() {
        let today = d(2024, 1, 15);
        let expenses = vec![
            expense(100.0, Category::Food, d(2024, 1, 3)),
            expense(200.0, Category::Food, d(2023, 12, 30)),
        ];
        let stats = dashboard_stats(&expenses, &[], today);
        assert_eq!(stats.expense_change, -50.0);
    }

    #[test]
    fn test_empty_month_defaults_to_other() {
        let stats = dashboard_stats(&[], &[], d(2024, 3, 1));
        assert_eq!(stats.highest_category.category, Category::Other);
        assert_eq!(stats.highest_category.amount, 0.0);
        assert!(insights(&stats).is_empty());
    }

    #[test]
    fn test_insights() {
        let today = d(2024, 3, 20);
        let expenses = vec![
            expense(3000.0, Category::Travel, d(2024, 3, 2)),
            expense(1000.0, Category::Travel, d(2024, 2, 2)),
        ];
        let incomes = vec![income(2000.0, d(2024, 3, 1), false)];

        let result = dashboard(&expenses, &incomes, today);
        let kinds: Vec<InsightKind> = result.insights.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![InsightKind::Warning, InsightKind::Warning, InsightKind::Info]
        );
        assert_eq!(result.insights[0].title, "Spending exceeds income");
        assert_eq!(result.insights[2].title, "Highest spending: Travel");
    }
}
