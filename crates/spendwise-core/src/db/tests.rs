//! Database tests

use super::*;
use crate::models::*;
use chrono::NaiveDate;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn new_expense(amount: f64, category: Category, date: NaiveDate) -> NewExpense {
    NewExpense {
        amount,
        category,
        description: format!("{} purchase", category),
        date,
        notes: None,
        is_worthy: true,
        tags: vec![],
    }
}

fn new_budget(category: Category, amount: f64, month: u32, year: i32) -> NewBudget {
    NewBudget {
        category,
        amount,
        month,
        year,
    }
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert!(db.list_expenses("alice", &ExpenseFilter::new()).unwrap().is_empty());
    assert!(db.list_budgets("alice", None, None).unwrap().is_empty());
}

#[test]
fn test_schema_has_open_alert_index() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_notifications_open_alert'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn test_expense_crud() {
    let db = Database::in_memory().unwrap();

    let mut input = new_expense(12.5, Category::Food, d(2024, 3, 5));
    input.tags = vec!["lunch".to_string(), "work".to_string()];
    input.notes = Some("with team".to_string());
    let created = db.insert_expense("alice", &input).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.user_id, "alice");
    assert_eq!(created.tags, vec!["lunch", "work"]);
    assert_eq!(created.notes.as_deref(), Some("with team"));
    assert!(created.is_worthy);

    let update = ExpenseUpdate {
        amount: Some(15.0),
        is_worthy: Some(false),
        ..Default::default()
    };
    let updated = db.update_expense("alice", created.id, &update).unwrap();
    assert_eq!(updated.amount, 15.0);
    assert!(!updated.is_worthy);
    assert_eq!(updated.description, created.description);

    db.delete_expense("alice", created.id).unwrap();
    assert!(db.get_expense(created.id).unwrap().is_none());
}

#[test]
fn test_expense_ownership() {
    let db = Database::in_memory().unwrap();
    let created = db
        .insert_expense("alice", &new_expense(10.0, Category::Food, d(2024, 3, 5)))
        .unwrap();

    assert!(matches!(
        db.get_expense_for_user("bob", created.id),
        Err(Error::Unauthorized(_))
    ));
    assert!(matches!(
        db.delete_expense("bob", created.id),
        Err(Error::Unauthorized(_))
    ));
    assert!(matches!(
        db.get_expense_for_user("alice", 9999),
        Err(Error::NotFound(_))
    ));
    // Still there
    assert!(db.get_expense(created.id).unwrap().is_some());
}

#[test]
fn test_invalid_expense_rejected() {
    let db = Database::in_memory().unwrap();
    let result = db.insert_expense("alice", &new_expense(-1.0, Category::Food, d(2024, 3, 5)));
    assert!(matches!(result, Err(Error::InvalidData(_))));
}

#[test]
fn test_list_expenses_filters() {
    let db = Database::in_memory().unwrap();
    let mut coffee = new_expense(4.0, Category::Food, d(2024, 3, 1));
    coffee.description = "Morning coffee".to_string();
    db.insert_expense("alice", &coffee).unwrap();
    db.insert_expense("alice", &new_expense(40.0, Category::Transport, d(2024, 3, 10)))
        .unwrap();
    db.insert_expense("alice", &new_expense(22.0, Category::Food, d(2024, 4, 2)))
        .unwrap();
    db.insert_expense("bob", &new_expense(99.0, Category::Food, d(2024, 3, 2)))
        .unwrap();

    let all = db.list_expenses("alice", &ExpenseFilter::new()).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].date, d(2024, 4, 2));

    let food = db
        .list_expenses("alice", &ExpenseFilter::new().category(Some(Category::Food)))
        .unwrap();
    assert_eq!(food.len(), 2);

    let march_food = db
        .list_expenses(
            "alice",
            &ExpenseFilter::new()
                .category(Some(Category::Food))
                .date_range(Some((d(2024, 3, 1), d(2024, 3, 31)))),
        )
        .unwrap();
    assert_eq!(march_food.len(), 1);

    let search = db
        .list_expenses("alice", &ExpenseFilter::new().search(Some("COFFEE")))
        .unwrap();
    assert_eq!(search.len(), 1);
    assert_eq!(search[0].description, "Morning coffee");

    let since = db
        .list_expenses("alice", &ExpenseFilter::new().since(Some(d(2024, 3, 10))))
        .unwrap();
    assert_eq!(since.len(), 2);
}

#[test]
fn test_sum_expenses_inclusive_month() {
    let db = Database::in_memory().unwrap();
    db.insert_expense("alice", &new_expense(100.0, Category::Food, d(2024, 3, 1)))
        .unwrap();
    db.insert_expense("alice", &new_expense(50.0, Category::Food, d(2024, 3, 31)))
        .unwrap();
    db.insert_expense("alice", &new_expense(70.0, Category::Food, d(2024, 4, 1)))
        .unwrap();

    let total = db
        .sum_expenses("alice", Category::Food, d(2024, 3, 1), d(2024, 3, 31))
        .unwrap();
    assert_eq!(total, 150.0);
}

#[test]
fn test_income_crud() {
    let db = Database::in_memory().unwrap();
    let created = db
        .insert_income(
            "alice",
            &NewIncome {
                amount: 3000.0,
                source: "Employer".to_string(),
                description: "Salary".to_string(),
                date: d(2024, 3, 1),
                is_recurring: true,
                recurring_frequency: Some(RecurringFrequency::Monthly),
            },
        )
        .unwrap();
    assert_eq!(created.recurring_frequency, Some(RecurringFrequency::Monthly));

    let updated = db
        .update_income(
            "alice",
            created.id,
            &IncomeUpdate {
                is_recurring: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(!updated.is_recurring);
    assert_eq!(updated.recurring_frequency, None);

    assert!(matches!(
        db.update_income("bob", created.id, &IncomeUpdate::default()),
        Err(Error::Unauthorized(_))
    ));

    let listed = db
        .list_income("alice", Some((d(2024, 3, 1), d(2024, 3, 31))))
        .unwrap();
    assert_eq!(listed.len(), 1);

    db.delete_income("alice", created.id).unwrap();
    assert!(db.list_income("alice", None).unwrap().is_empty());
}

#[test]
fn test_budget_uniqueness_per_period() {
    let db = Database::in_memory().unwrap();
    db.insert_budget("alice", &new_budget(Category::Food, 500.0, 2, 2024))
        .unwrap();

    let dup = db.insert_budget("alice", &new_budget(Category::Food, 600.0, 2, 2024));
    assert!(matches!(dup, Err(Error::Conflict(_))));

    // Other users and other periods are independent
    db.insert_budget("bob", &new_budget(Category::Food, 500.0, 2, 2024))
        .unwrap();
    db.insert_budget("alice", &new_budget(Category::Food, 500.0, 3, 2024))
        .unwrap();
}

#[test]
fn test_upsert_budget() {
    let db = Database::in_memory().unwrap();

    let first = db
        .upsert_budget("alice", &new_budget(Category::Food, 500.0, 2, 2024))
        .unwrap();
    assert!(first.created);

    let second = db
        .upsert_budget("alice", &new_budget(Category::Food, 650.0, 2, 2024))
        .unwrap();
    assert!(!second.created);
    assert_eq!(second.budget.id, first.budget.id);
    assert_eq!(second.budget.amount, 650.0);
    assert_eq!(db.list_budgets("alice", None, None).unwrap().len(), 1);
}

#[test]
fn test_update_budget_collision() {
    let db = Database::in_memory().unwrap();
    db.insert_budget("alice", &new_budget(Category::Food, 500.0, 2, 2024))
        .unwrap();
    let other = db
        .insert_budget("alice", &new_budget(Category::Travel, 300.0, 2, 2024))
        .unwrap();

    let result = db.update_budget(
        "alice",
        other.id,
        &BudgetUpdate {
            category: Some(Category::Food),
            ..Default::default()
        },
    );
    assert!(matches!(result, Err(Error::Conflict(_))));

    // Updating without moving the period is fine
    let updated = db
        .update_budget(
            "alice",
            other.id,
            &BudgetUpdate {
                amount: Some(350.0),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(updated.amount, 350.0);
}

#[test]
fn test_budgets_with_spent() {
    let db = Database::in_memory().unwrap();
    db.insert_budget("alice", &new_budget(Category::Food, 200.0, 2, 2024))
        .unwrap();
    db.insert_budget("alice", &new_budget(Category::Rent, 1000.0, 1, 2024))
        .unwrap();
    db.insert_expense("alice", &new_expense(190.0, Category::Food, d(2024, 3, 10)))
        .unwrap();
    db.insert_expense("alice", &new_expense(50.0, Category::Food, d(2024, 2, 10)))
        .unwrap();

    let march = db.list_budgets_with_spent("alice", Some(2), Some(2024)).unwrap();
    assert_eq!(march.len(), 1);
    assert_eq!(march[0].spent, 190.0);
    assert_eq!(march[0].remaining, 10.0);
    assert!((march[0].percentage - 95.0).abs() < 1e-9);
    assert_eq!(march[0].status, BudgetStatus::NearLimit);

    let all = db.list_budgets_with_spent("alice", None, None).unwrap();
    assert_eq!(all.len(), 2);
    let rent = all.iter().find(|b| b.budget.category == Category::Rent).unwrap();
    assert_eq!(rent.spent, 0.0);
    assert_eq!(rent.status, BudgetStatus::Ok);
}

#[test]
fn test_notifications_lifecycle() {
    let db = Database::in_memory().unwrap();
    let first = db
        .insert_notification(
            "alice",
            &NewNotification {
                title: "Welcome".to_string(),
                message: "Hello".to_string(),
                notification_type: NotificationType::Success,
            },
        )
        .unwrap();
    let second = db
        .insert_notification(
            "alice",
            &NewNotification {
                title: "Reminder".to_string(),
                message: "Log your expenses".to_string(),
                notification_type: NotificationType::Info,
            },
        )
        .unwrap();

    let listed = db.list_notifications("alice", false).unwrap();
    assert_eq!(listed.len(), 2);
    // Newest first
    assert_eq!(listed[0].id, second.id);
    assert_eq!(db.count_unread_notifications("alice").unwrap(), 2);

    let read = db.mark_notification_read("alice", first.id).unwrap();
    assert!(read.is_read);
    assert_eq!(db.list_notifications("alice", true).unwrap().len(), 1);

    assert!(matches!(
        db.mark_notification_read("bob", second.id),
        Err(Error::Unauthorized(_))
    ));

    assert_eq!(db.mark_all_notifications_read("alice").unwrap(), 1);
    assert_eq!(db.count_unread_notifications("alice").unwrap(), 0);

    db.delete_notification("alice", first.id).unwrap();
    assert_eq!(db.list_notifications("alice", false).unwrap().len(), 1);
}

#[test]
fn test_audit_log() {
    let db = Database::in_memory().unwrap();
    db.log_audit("alice", "create", Some("expense"), Some(1), None)
        .unwrap();
    db.log_audit("alice", "list", Some("expenses"), None, Some("count=3"))
        .unwrap();
    db.log_audit("bob", "list", Some("expenses"), None, None)
        .unwrap();

    let entries = db.list_audit_log("alice", 10).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "list");
    assert_eq!(entries[0].details.as_deref(), Some("count=3"));

    assert_eq!(db.list_audit_log("alice", 1).unwrap().len(), 1);
}

#[test]
fn test_key_derivation_is_deterministic() {
    let key1 = derive_key("my-secret").unwrap();
    let key2 = derive_key("my-secret").unwrap();
    assert_eq!(key1, key2);
    assert_ne!(key1, derive_key("other-secret").unwrap());
}

#[test]
fn test_encrypted_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("encrypted.db");
    let path = path.to_str().unwrap();

    {
        let db = Database::new_with_key(path, Some("test-passphrase")).unwrap();
        db.insert_expense("alice", &new_expense(10.0, Category::Food, d(2024, 3, 5)))
            .unwrap();
    }

    {
        let db = Database::new_with_key(path, Some("test-passphrase")).unwrap();
        assert_eq!(db.list_expenses("alice", &ExpenseFilter::new()).unwrap().len(), 1);
    }

    assert!(
        Database::new_with_key(path, None).is_err(),
        "Should fail to open encrypted db without key"
    );
    assert!(
        Database::new_with_key(path, Some("wrong-passphrase")).is_err(),
        "Should fail to open encrypted db with wrong key"
    );
}

#[test]
fn test_unencrypted_database_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.db");
    let path = path.to_str().unwrap();

    {
        let db = Database::new_unencrypted(path).unwrap();
        db.insert_budget("alice", &new_budget(Category::Food, 500.0, 2, 2024))
            .unwrap();
    }

    let db = Database::new_unencrypted(path).unwrap();
    assert_eq!(db.path(), path);
    assert_eq!(db.list_budgets("alice", None, None).unwrap().len(), 1);
}
