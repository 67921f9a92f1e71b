//! Budget evaluation
//!
//! After an expense write, the evaluator recomputes the month's spend for the
//! expense's category from scratch, classifies it against the budget and
//! raises a deduplicated alert. Evaluation is best-effort: failures are logged
//! and reported as [`Evaluation::Failed`], never returned as errors.

use tracing::{debug, warn};

use crate::db::ExpenseFilter;
use crate::error::Result;
use crate::models::{Budget, BudgetPeriod, BudgetStatus, BudgetWithSpent, Expense, NewNotification};
use crate::notify::{notify_once, AlertKey, AlertSeverity};
use crate::store::RecordStore;

/// Classify spend against a limit using strict comparisons.
///
/// `Exceeded` when spent > limit, `NearLimit` when spent > 0.9 × limit.
/// A zero limit is exceeded by any positive spend.
pub fn classify(spent: f64, limit: f64) -> BudgetStatus {
    if spent > limit {
        BudgetStatus::Exceeded
    } else if spent > 0.9 * limit {
        BudgetStatus::NearLimit
    } else {
        BudgetStatus::Ok
    }
}

/// Attach recomputed spend to a budget
pub fn summarize(budget: Budget, spent: f64) -> BudgetWithSpent {
    let percentage = if budget.amount > 0.0 {
        (spent / budget.amount * 100.0).min(100.0)
    } else if spent > 0.0 {
        100.0
    } else {
        0.0
    };
    let status = classify(spent, budget.amount);

    BudgetWithSpent {
        remaining: budget.amount - spent,
        spent,
        percentage,
        status,
        budget,
    }
}

/// Alert text for a budget breach
pub fn alert_message(severity: AlertSeverity, budget: &Budget, spent: f64) -> String {
    let period = budget.period();
    match severity {
        AlertSeverity::Exceeded => format!(
            "You have exceeded your {} budget for {}. Budget: {}, Spent: {}",
            budget.category,
            period.label(),
            budget.amount,
            spent
        ),
        AlertSeverity::NearLimit => format!(
            "You are close to your {} budget for {}. Budget: {}, Spent: {}",
            budget.category,
            period.label(),
            budget.amount,
            spent
        ),
    }
}

/// Outcome of one evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// No budget declared for the period
    NoBudget,
    Evaluated {
        status: BudgetStatus,
        spent: f64,
        limit: f64,
        /// Whether a new notification was created
        notified: bool,
    },
    /// A lookup or write failed; already logged
    Failed,
}

impl Evaluation {
    pub fn status(&self) -> Option<BudgetStatus> {
        match self {
            Self::Evaluated { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn notified(&self) -> bool {
        matches!(self, Self::Evaluated { notified: true, .. })
    }
}

/// Evaluates budgets against a record store
pub struct BudgetEvaluator<'a, S: RecordStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> BudgetEvaluator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Evaluate the budget for a period. Never fails.
    pub fn evaluate(&self, user_id: &str, period: BudgetPeriod) -> Evaluation {
        match self.try_evaluate(user_id, period) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    user_id,
                    category = period.category.as_str(),
                    month = period.month,
                    year = period.year,
                    error = %e,
                    "Budget evaluation failed"
                );
                Evaluation::Failed
            }
        }
    }

    /// Evaluate the period an expense falls into
    pub fn evaluate_expense(&self, expense: &Expense) -> Evaluation {
        self.evaluate(
            &expense.user_id,
            BudgetPeriod::containing(expense.category, expense.date),
        )
    }

    fn try_evaluate(&self, user_id: &str, period: BudgetPeriod) -> Result<Evaluation> {
        let Some(budget) = self.store.find_budget(user_id, period)? else {
            return Ok(Evaluation::NoBudget);
        };

        let range = period.date_range()?;
        let filter = ExpenseFilter::new()
            .category(Some(period.category))
            .date_range(Some(range));
        let spent: f64 = self
            .store
            .find_expenses(user_id, &filter)?
            .iter()
            .map(|e| e.amount)
            .sum();

        let status = classify(spent, budget.amount);
        debug!(
            user_id,
            category = period.category.as_str(),
            spent,
            limit = budget.amount,
            status = status.as_str(),
            "Evaluated budget"
        );

        let severity = match status {
            BudgetStatus::Exceeded => AlertSeverity::Exceeded,
            BudgetStatus::NearLimit => AlertSeverity::NearLimit,
            BudgetStatus::Ok => {
                return Ok(Evaluation::Evaluated {
                    status,
                    spent,
                    limit: budget.amount,
                    notified: false,
                })
            }
        };

        let payload = NewNotification {
            title: severity.title().to_string(),
            message: alert_message(severity, &budget, spent),
            notification_type: severity.notification_type(),
        };
        let notified = notify_once(self.store, user_id, &AlertKey::new(period, severity), &payload)?;

        Ok(Evaluation::Evaluated {
            status,
            spent,
            limit: budget.amount,
            notified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::models::Category;
    use chrono::Utc;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(520.0, 500.0), BudgetStatus::Exceeded);
        assert_eq!(classify(500.0, 500.0), BudgetStatus::NearLimit);
        assert_eq!(classify(460.0, 500.0), BudgetStatus::NearLimit);
        assert_eq!(classify(450.0, 500.0), BudgetStatus::Ok);
        assert_eq!(classify(0.0, 500.0), BudgetStatus::Ok);
    }

    #[test]
    fn test_classify_zero_budget() {
        assert_eq!(classify(0.01, 0.0), BudgetStatus::Exceeded);
        assert_eq!(classify(0.0, 0.0), BudgetStatus::Ok);
    }

    fn budget(amount: f64) -> Budget {
        let now = Utc::now();
        Budget {
            id: 1,
            user_id: "alice".to_string(),
            category: Category::Food,
            amount,
            month: 2,
            year: 2024,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_alert_messages() {
        assert_eq!(
            alert_message(AlertSeverity::NearLimit, &budget(500.0), 460.0),
            "You are close to your food budget for 3/2024. Budget: 500, Spent: 460"
        );
        assert_eq!(
            alert_message(AlertSeverity::Exceeded, &budget(500.0), 520.5),
            "You have exceeded your food budget for 3/2024. Budget: 500, Spent: 520.5"
        );
    }

    #[test]
    fn test_summarize_caps_percentage() {
        let summary = summarize(budget(100.0), 150.0);
        assert_eq!(summary.percentage, 100.0);
        assert_eq!(summary.remaining, -50.0);
        assert_eq!(summary.status, BudgetStatus::Exceeded);

        let summary = summarize(budget(200.0), 50.0);
        assert_eq!(summary.percentage, 25.0);
        assert_eq!(summary.status, BudgetStatus::Ok);
    }

    /// Store whose every lookup fails
    struct BrokenStore;

    impl RecordStore for BrokenStore {
        fn find_budget(&self, _: &str, _: BudgetPeriod) -> Result<Option<Budget>> {
            Err(Error::InvalidData("store offline".to_string()))
        }
        fn find_expenses(&self, _: &str, _: &ExpenseFilter<'_>) -> Result<Vec<Expense>> {
            Err(Error::InvalidData("store offline".to_string()))
        }
        fn find_unread_alert(&self, _: &str, _: &AlertKey) -> Result<Option<i64>> {
            Err(Error::InvalidData("store offline".to_string()))
        }
        fn insert_alert(&self, _: &str, _: &AlertKey, _: &NewNotification) -> Result<Option<i64>> {
            Err(Error::InvalidData("store offline".to_string()))
        }
    }

    #[test]
    fn test_evaluate_swallows_store_errors() {
        let evaluator = BudgetEvaluator::new(&BrokenStore);
        let outcome = evaluator.evaluate("alice", BudgetPeriod::new(Category::Food, 2, 2024));
        assert_eq!(outcome, Evaluation::Failed);
        assert!(!outcome.notified());
    }
}
