//! Expense command implementations

use anyhow::Result;
use chrono::NaiveDate;
use spendwise_core::models::{BudgetStatus, NewExpense};
use spendwise_core::{BudgetEvaluator, Database, Evaluation, ExpenseFilter};

use super::{parse_category_arg, parse_date_arg, parse_window_arg, truncate};

/// Arguments for `spendwise expenses add`
pub struct ExpenseArgs<'a> {
    pub amount: f64,
    pub category: &'a str,
    pub description: &'a str,
    pub date: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub not_worthy: bool,
    pub tags: Option<&'a str>,
}

pub fn cmd_expenses_list(
    db: &Database,
    user: &str,
    category: Option<&str>,
    window: Option<&str>,
    search: Option<&str>,
    limit: usize,
    today: NaiveDate,
) -> Result<()> {
    let category = category.map(parse_category_arg).transpose()?;
    let mut filter = ExpenseFilter::new().category(category).search(search);
    if let Some(window) = window {
        filter = parse_window_arg(window)?.apply(filter, today);
    }

    let expenses = db.list_expenses(user, &filter)?;

    if expenses.is_empty() {
        println!("No expenses found. Record one with:");
        println!("  spendwise expenses add 12.50 -c food -d Lunch");
        return Ok(());
    }

    let total: f64 = expenses.iter().map(|e| e.amount).sum();

    println!();
    println!("💸 Expenses ({} total, ${:.2})", expenses.len(), total);
    println!("   ─────────────────────────────────────────────────────────────");

    for expense in expenses.iter().take(limit) {
        let worthy = if expense.is_worthy { " " } else { "✗" };
        println!(
            "   [{}] {} │ {:>10} │ {:<14} │ {} {}",
            expense.id,
            expense.date,
            format!("${:.2}", expense.amount),
            expense.category.display_name(),
            worthy,
            truncate(&expense.description, 35)
        );
    }

    if expenses.len() > limit {
        println!("   ... and {} more", expenses.len() - limit);
    }

    Ok(())
}

pub fn cmd_expenses_add(
    db: &Database,
    user: &str,
    args: ExpenseArgs<'_>,
    today: NaiveDate,
) -> Result<()> {
    let tags = args
        .tags
        .map(|t| {
            t.split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let new_expense = NewExpense {
        amount: args.amount,
        category: parse_category_arg(args.category)?,
        description: args.description.to_string(),
        date: parse_date_arg(args.date, today)?,
        notes: args.notes.map(String::from),
        is_worthy: !args.not_worthy,
        tags,
    };

    let expense = db.insert_expense(user, &new_expense)?;
    println!(
        "✅ Recorded expense #{}: ${:.2} {} on {}",
        expense.id,
        expense.amount,
        expense.category.display_name(),
        expense.date
    );

    match BudgetEvaluator::new(db).evaluate_expense(&expense) {
        Evaluation::Evaluated {
            status,
            spent,
            limit,
            notified,
        } => {
            let icon = match status {
                BudgetStatus::Ok => "🟢",
                BudgetStatus::NearLimit => "🟡",
                BudgetStatus::Exceeded => "🔴",
            };
            println!(
                "   {} Budget: ${:.2} of ${:.2} spent this month",
                icon, spent, limit
            );
            if notified {
                println!("   🔔 New budget alert. Run 'spendwise notifications' to see it.");
            }
        }
        Evaluation::NoBudget => {}
        Evaluation::Failed => {
            println!("   ⚠️  Budget check failed (see logs)");
        }
    }

    Ok(())
}

pub fn cmd_expenses_delete(db: &Database, user: &str, id: i64) -> Result<()> {
    db.delete_expense(user, id)?;
    println!("🗑️  Deleted expense #{}", id);
    Ok(())
}
