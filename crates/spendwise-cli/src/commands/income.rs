//! Income command implementations

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use spendwise_core::models::{NewIncome, RecurringFrequency};
use spendwise_core::Database;

use super::{parse_date_arg, truncate};

pub fn cmd_income_list(db: &Database, user: &str) -> Result<()> {
    let income = db.list_income(user, None)?;

    if income.is_empty() {
        println!("No income recorded. Add some with:");
        println!("  spendwise income add 3000 -s Employer -d Salary --recurring monthly");
        return Ok(());
    }

    println!();
    println!("💰 Income");
    println!("   ─────────────────────────────────────────────────────────────");

    for entry in &income {
        let recurring = entry
            .recurring_frequency
            .map(|f| format!(" ({})", f.as_str()))
            .unwrap_or_default();
        println!(
            "   [{}] {} │ \x1b[32m+${:.2}\x1b[0m │ {}: {}{}",
            entry.id,
            entry.date,
            entry.amount,
            truncate(&entry.source, 20),
            truncate(&entry.description, 30),
            recurring
        );
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_income_add(
    db: &Database,
    user: &str,
    amount: f64,
    source: &str,
    description: &str,
    date: Option<&str>,
    recurring: Option<&str>,
    today: NaiveDate,
) -> Result<()> {
    let recurring_frequency = recurring
        .map(|f| f.parse::<RecurringFrequency>().map_err(|e| anyhow!(e)))
        .transpose()?;

    let new_income = NewIncome {
        amount,
        source: source.to_string(),
        description: description.to_string(),
        date: parse_date_arg(date, today)?,
        is_recurring: recurring_frequency.is_some(),
        recurring_frequency,
    };

    let income = db.insert_income(user, &new_income)?;
    println!(
        "✅ Recorded income #{}: ${:.2} from {} on {}",
        income.id, income.amount, income.source, income.date
    );

    Ok(())
}

pub fn cmd_income_delete(db: &Database, user: &str, id: i64) -> Result<()> {
    db.delete_income(user, id)?;
    println!("🗑️  Deleted income #{}", id);
    Ok(())
}
