//! Budget command implementations
//!
//! Months are entered and shown one-based (1 = January) here; the store and
//! API use zero-based months.

use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use spendwise_core::models::{BudgetStatus, NewBudget};
use spendwise_core::{BudgetEvaluator, Database};

use super::parse_category_arg;

/// Convert a one-based month argument to the stored zero-based month
fn month_arg(month: u32) -> Result<u32> {
    if !(1..=12).contains(&month) {
        bail!("Month must be between 1 and 12 (got {})", month);
    }
    Ok(month - 1)
}

pub fn cmd_budgets_list(
    db: &Database,
    user: &str,
    month: Option<u32>,
    year: Option<i32>,
) -> Result<()> {
    let month = month.map(month_arg).transpose()?;
    let budgets = db.list_budgets_with_spent(user, month, year)?;

    if budgets.is_empty() {
        println!("No budgets set. Create one with:");
        println!("  spendwise budgets set food 500");
        return Ok(());
    }

    println!();
    println!("📊 Budgets");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in &budgets {
        let icon = match entry.status {
            BudgetStatus::Ok => "🟢",
            BudgetStatus::NearLimit => "🟡",
            BudgetStatus::Exceeded => "🔴",
        };
        println!(
            "   [{}] {:>7} │ {:<16} │ {} ${:>9.2} / ${:<9.2} ({:.0}%)",
            entry.budget.id,
            entry.budget.period().label(),
            entry.budget.category.display_name(),
            icon,
            entry.spent,
            entry.budget.amount,
            entry.percentage
        );
    }

    Ok(())
}

pub fn cmd_budgets_set(
    db: &Database,
    user: &str,
    category: &str,
    amount: f64,
    month: Option<u32>,
    year: Option<i32>,
    today: NaiveDate,
) -> Result<()> {
    let new_budget = NewBudget {
        category: parse_category_arg(category)?,
        amount,
        month: match month {
            Some(m) => month_arg(m)?,
            None => today.month0(),
        },
        year: year.unwrap_or_else(|| today.year()),
    };

    let upsert = db.upsert_budget(user, &new_budget)?;
    let verb = if upsert.created { "Created" } else { "Updated" };
    println!(
        "✅ {} {} budget for {}: ${:.2}",
        verb,
        upsert.budget.category.display_name(),
        upsert.budget.period().label(),
        upsert.budget.amount
    );

    // New budgets are checked by the next expense recorded in their period
    if !upsert.created {
        let outcome = BudgetEvaluator::new(db).evaluate(user, upsert.budget.period());
        if outcome.notified() {
            println!("   🔔 Spending already crosses this budget. Run 'spendwise notifications'.");
        }
    }

    Ok(())
}

pub fn cmd_budgets_delete(db: &Database, user: &str, id: i64) -> Result<()> {
    db.delete_budget(user, id)?;
    println!("🗑️  Deleted budget #{}", id);
    Ok(())
}
