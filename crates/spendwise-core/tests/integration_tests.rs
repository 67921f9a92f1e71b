//! Integration tests for spendwise-core
//!
//! These tests exercise the expense → evaluate → notify workflow and the
//! analytics over stored records.

use chrono::NaiveDate;
use spendwise_core::{
    analytics,
    db::{Database, ExpenseFilter},
    models::{
        BudgetPeriod, BudgetStatus, BudgetUpdate, Category, ExpenseUpdate, NewBudget, NewExpense,
        NotificationType,
    },
    BudgetEvaluator, Evaluation,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn food(amount: f64, date: NaiveDate) -> NewExpense {
    NewExpense {
        amount,
        category: Category::Food,
        description: "Groceries".to_string(),
        date,
        notes: None,
        is_worthy: true,
        tags: vec![],
    }
}

/// Insert an expense and evaluate its budget, the way the API does
fn record(db: &Database, user: &str, expense: NewExpense) -> Evaluation {
    let stored = db.insert_expense(user, &expense).expect("insert expense");
    BudgetEvaluator::new(db).evaluate_expense(&stored)
}

fn march_food_budget(db: &Database, user: &str) {
    db.insert_budget(
        user,
        &NewBudget {
            category: Category::Food,
            amount: 500.0,
            month: 2,
            year: 2024,
        },
    )
    .expect("insert budget");
}

// =============================================================================
// Budget alert workflow
// =============================================================================

#[test]
fn test_near_limit_then_exceeded() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    march_food_budget(&db, "alice");

    // 460 of 500 → near limit
    record(&db, "alice", food(300.0, d(2024, 3, 2)));
    let outcome = record(&db, "alice", food(160.0, d(2024, 3, 12)));
    assert_eq!(outcome.status(), Some(BudgetStatus::NearLimit));
    assert!(outcome.notified());

    let notifications = db.list_notifications("alice", false).unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Budget Alert");
    assert_eq!(notifications[0].notification_type, NotificationType::Info);
    assert_eq!(
        notifications[0].message,
        "You are close to your food budget for 3/2024. Budget: 500, Spent: 460"
    );

    // Re-evaluating without change does not duplicate the alert
    let again = BudgetEvaluator::new(&db).evaluate("alice", BudgetPeriod::new(Category::Food, 2, 2024));
    assert_eq!(again.status(), Some(BudgetStatus::NearLimit));
    assert!(!again.notified());

    // 520 of 500 → exceeded, in addition to the open near-limit alert
    let outcome = record(&db, "alice", food(60.0, d(2024, 3, 20)));
    assert_eq!(outcome.status(), Some(BudgetStatus::Exceeded));
    assert!(outcome.notified());

    let notifications = db.list_notifications("alice", false).unwrap();
    assert_eq!(notifications.len(), 2);
    let exceeded = notifications
        .iter()
        .find(|n| n.title == "Budget Exceeded")
        .expect("exceeded alert");
    assert_eq!(exceeded.notification_type, NotificationType::Warning);
    assert_eq!(
        exceeded.message,
        "You have exceeded your food budget for 3/2024. Budget: 500, Spent: 520"
    );

    // Further spend while the exceeded alert is unread stays quiet
    let outcome = record(&db, "alice", food(5.0, d(2024, 3, 21)));
    assert!(!outcome.notified());
    assert_eq!(db.list_notifications("alice", false).unwrap().len(), 2);
}

#[test]
fn test_realert_after_mark_read() {
    let db = Database::in_memory().unwrap();
    march_food_budget(&db, "alice");

    record(&db, "alice", food(600.0, d(2024, 3, 2)));
    assert_eq!(db.mark_all_notifications_read("alice").unwrap(), 1);

    let outcome = record(&db, "alice", food(1.0, d(2024, 3, 3)));
    assert!(outcome.notified());
    assert_eq!(db.list_notifications("alice", false).unwrap().len(), 2);
    assert_eq!(db.list_notifications("alice", true).unwrap().len(), 1);
}

#[test]
fn test_exact_budget_is_near_limit_not_exceeded() {
    let db = Database::in_memory().unwrap();
    march_food_budget(&db, "alice");

    let outcome = record(&db, "alice", food(500.0, d(2024, 3, 31)));
    assert_eq!(outcome.status(), Some(BudgetStatus::NearLimit));
    let notifications = db.list_notifications("alice", false).unwrap();
    assert_eq!(notifications[0].title, "Budget Alert");
}

#[test]
fn test_expenses_outside_budget_period_are_ignored() {
    let db = Database::in_memory().unwrap();
    march_food_budget(&db, "alice");

    // April and other categories have no budget
    assert_eq!(record(&db, "alice", food(900.0, d(2024, 4, 1))), Evaluation::NoBudget);
    let mut taxi = food(900.0, d(2024, 3, 5));
    taxi.category = Category::Transport;
    assert_eq!(record(&db, "alice", taxi), Evaluation::NoBudget);

    // Another user's spend never counts against alice's budget
    assert_eq!(record(&db, "bob", food(900.0, d(2024, 3, 5))), Evaluation::NoBudget);

    let outcome = BudgetEvaluator::new(&db).evaluate("alice", BudgetPeriod::new(Category::Food, 2, 2024));
    assert_eq!(outcome.status(), Some(BudgetStatus::Ok));
    assert!(db.list_notifications("alice", false).unwrap().is_empty());
}

#[test]
fn test_zero_budget_alerts_on_any_spend() {
    let db = Database::in_memory().unwrap();
    db.insert_budget(
        "alice",
        &NewBudget {
            category: Category::Entertainment,
            amount: 0.0,
            month: 2,
            year: 2024,
        },
    )
    .unwrap();

    let mut movie = food(0.01, d(2024, 3, 5));
    movie.category = Category::Entertainment;
    let outcome = record(&db, "alice", movie);
    assert_eq!(outcome.status(), Some(BudgetStatus::Exceeded));
}

#[test]
fn test_update_moving_expense_into_budget_period() {
    let db = Database::in_memory().unwrap();
    march_food_budget(&db, "alice");

    let stored = db.insert_expense("alice", &food(700.0, d(2024, 2, 10))).unwrap();
    assert_eq!(BudgetEvaluator::new(&db).evaluate_expense(&stored), Evaluation::NoBudget);

    let moved = db
        .update_expense(
            "alice",
            stored.id,
            &ExpenseUpdate {
                date: Some(d(2024, 3, 10)),
                ..Default::default()
            },
        )
        .unwrap();
    let outcome = BudgetEvaluator::new(&db).evaluate_expense(&moved);
    assert_eq!(outcome.status(), Some(BudgetStatus::Exceeded));
}

#[test]
fn test_budget_update_recomputes_status() {
    let db = Database::in_memory().unwrap();
    march_food_budget(&db, "alice");
    record(&db, "alice", food(400.0, d(2024, 3, 2)));

    let budget = &db.list_budgets("alice", None, None).unwrap()[0];
    let lowered = db
        .update_budget(
            "alice",
            budget.id,
            &BudgetUpdate {
                amount: Some(300.0),
                ..Default::default()
            },
        )
        .unwrap();

    let outcome = BudgetEvaluator::new(&db).evaluate("alice", lowered.period());
    assert_eq!(outcome.status(), Some(BudgetStatus::Exceeded));
    assert!(outcome.notified());
}

// =============================================================================
// Analytics over stored records
// =============================================================================

#[test]
fn test_analytics_from_database() {
    let db = Database::in_memory().unwrap();
    for (amount, category) in [
        (100.0, Category::Transport),
        (50.0, Category::Transport),
        (25.0, Category::Transport),
        (40.0, Category::Food),
        (10.0, Category::Food),
    ] {
        let mut expense = food(amount, d(2024, 3, 10));
        expense.category = category;
        db.insert_expense("alice", &expense).unwrap();
    }

    let expenses = db.list_expenses("alice", &ExpenseFilter::new()).unwrap();
    let breakdown = analytics::category_breakdown(&expenses);
    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].category, Category::Transport);
    assert_eq!(breakdown[0].amount, 175.0);
    assert_eq!(breakdown[0].percentage, 77.8);
    assert_eq!(breakdown[1].category, Category::Food);
    assert_eq!(breakdown[1].percentage, 22.2);

    let stats = analytics::dashboard_stats(&expenses, &[], d(2024, 3, 31));
    assert_eq!(stats.total_expenses, 225.0);
    assert_eq!(stats.transaction_count, 5);
    assert_eq!(stats.expense_change, 0.0);
    assert_eq!(stats.highest_category.category, Category::Transport);
}
