//! Category, worthy and income breakdowns

use super::round_to;
use super::types::{CategoryShare, IncomeSummary, WorthySummary};
use crate::models::{Category, Expense, Income};

/// Per-category totals in first-encountered order
pub(crate) fn category_totals(expenses: &[Expense]) -> Vec<(Category, f64)> {
    let mut totals: Vec<(Category, f64)> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|(c, _)| *c == expense.category) {
            Some((_, amount)) => *amount += expense.amount,
            None => totals.push((expense.category, expense.amount)),
        }
    }
    totals
}

/// Group expenses by category, sorted by amount descending.
///
/// Percentages are of the grouped total with one decimal; all zero when the
/// total is zero. Equal amounts keep first-encountered order.
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryShare> {
    let totals = category_totals(expenses);
    let grand_total: f64 = totals.iter().map(|(_, amount)| amount).sum();

    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category,
            name: category.display_name().to_string(),
            amount,
            percentage: if grand_total > 0.0 {
                round_to(amount / grand_total * 100.0, 1)
            } else {
                0.0
            },
            color: category.color().to_string(),
        })
        .collect();

    // sort_by is stable
    shares.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    shares
}

/// Worthy vs not-worthy spend
pub fn worthy_summary(expenses: &[Expense]) -> WorthySummary {
    let (worthy, not_worthy): (Vec<&Expense>, Vec<&Expense>) =
        expenses.iter().partition(|e| e.is_worthy);

    let worthy_total: f64 = worthy.iter().map(|e| e.amount).sum();
    let not_worthy_total: f64 = not_worthy.iter().map(|e| e.amount).sum();
    let total = worthy_total + not_worthy_total;

    WorthySummary {
        worthy_total,
        not_worthy_total,
        worthy_count: worthy.len(),
        not_worthy_count: not_worthy.len(),
        worthy_percentage: if total > 0.0 {
            worthy_total / total * 100.0
        } else {
            0.0
        },
    }
}

/// Total, recurring and one-time income
pub fn income_summary(income: &[Income]) -> IncomeSummary {
    let total: f64 = income.iter().map(|i| i.amount).sum();
    let recurring: f64 = income
        .iter()
        .filter(|i| i.is_recurring)
        .map(|i| i.amount)
        .sum();

    IncomeSummary {
        total,
        recurring,
        one_time: total - recurring,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{expense, income};
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_transport_food_breakdown() {
        let expenses = vec![
            expense(40.0, Category::Food, day()),
            expense(100.0, Category::Transport, day()),
            expense(50.0, Category::Transport, day()),
            expense(10.0, Category::Food, day()),
            expense(25.0, Category::Transport, day()),
        ];

        let breakdown = category_breakdown(&expenses);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, Category::Transport);
        assert_eq!(breakdown[0].amount, 175.0);
        assert_eq!(breakdown[0].percentage, 77.8);
        assert_eq!(breakdown[0].color, "hsl(238, 84%, 67%)");
        assert_eq!(breakdown[1].category, Category::Food);
        assert_eq!(breakdown[1].amount, 50.0);
        assert_eq!(breakdown[1].percentage, 22.2);
        assert_eq!(breakdown[1].name, "Food & Dining");
    }

    #[test]
    fn test_breakdown_percentages_sum_to_100() {
        let expenses = vec![
            expense(33.0, Category::Food, day()),
            expense(33.0, Category::Shopping, day()),
            expense(34.0, Category::Travel, day()),
        ];
        let total: f64 = category_breakdown(&expenses).iter().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() <= 0.2);
    }

    #[test]
    fn test_breakdown_ties_keep_first_encountered() {
        let expenses = vec![
            expense(20.0, Category::Shopping, day()),
            expense(20.0, Category::Food, day()),
        ];
        let breakdown = category_breakdown(&expenses);
        assert_eq!(breakdown[0].category, Category::Shopping);
        assert_eq!(breakdown[1].category, Category::Food);
    }

    #[test]
    fn test_empty_breakdown() {
        assert!(category_breakdown(&[]).is_empty());
    }

    #[test]
    fn test_worthy_summary() {
        let mut skipped = expense(25.0, Category::Entertainment, day());
        skipped.is_worthy = false;
        let expenses = vec![expense(75.0, Category::Food, day()), skipped];

        let summary = worthy_summary(&expenses);
        assert_eq!(summary.worthy_total, 75.0);
        assert_eq!(summary.not_worthy_total, 25.0);
        assert_eq!(summary.worthy_percentage, 75.0);
        assert_eq!(summary.not_worthy_count, 1);

        assert_eq!(worthy_summary(&[]).worthy_percentage, 0.0);
    }

    #[test]
    fn test_income_summary() {
        let incomes = vec![income(3000.0, day(), true), income(200.0, day(), false)];
        let summary = income_summary(&incomes);
        assert_eq!(summary.total, 3200.0);
        assert_eq!(summary.recurring, 3000.0);
        assert_eq!(summary.one_time, 200.0);
    }
}
