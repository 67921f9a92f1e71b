//! Report command implementations

use anyhow::Result;
use chrono::{Duration, NaiveDate};
use spendwise_core::analytics::{self, InsightKind, MAX_ACTIVITY_DAYS, MAX_TREND_MONTHS};
use spendwise_core::models::{Expense, Income};
use spendwise_core::{Database, ExpenseFilter};

use super::parse_window_arg;

fn load_records(db: &Database, user: &str) -> Result<(Vec<Expense>, Vec<Income>)> {
    let expenses = db.list_expenses(user, &ExpenseFilter::new())?;
    let income = db.list_income(user, None)?;
    Ok((expenses, income))
}

/// Render a signed percentage change
fn change(value: f64) -> String {
    if value > 0.0 {
        format!("↑ {:.1}%", value)
    } else if value < 0.0 {
        format!("↓ {:.1}%", value.abs())
    } else {
        "–".to_string()
    }
}

/// Horizontal bar scaled to `max`
fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

pub fn cmd_report_dashboard(db: &Database, user: &str, today: NaiveDate) -> Result<()> {
    let (expenses, income) = load_records(db, user)?;
    let dashboard = analytics::dashboard(&expenses, &income, today);
    let stats = &dashboard.stats;

    println!();
    println!("📊 Dashboard for {}", today.format("%B %Y"));
    println!("   ─────────────────────────────");
    println!(
        "   Expenses:     ${:>10.2}  {}",
        stats.total_expenses,
        change(stats.expense_change)
    );
    println!(
        "   Income:       ${:>10.2}  {}",
        stats.total_income,
        change(stats.income_change)
    );
    println!("   Savings:      ${:>10.2}", stats.savings);
    println!("   Savings rate:  {:>10.1}%", stats.savings_rate);
    println!("   Transactions:  {:>10}", stats.transaction_count);
    if stats.highest_category.amount > 0.0 {
        println!(
            "   Top category:  {} (${:.2})",
            stats.highest_category.category.display_name(),
            stats.highest_category.amount
        );
    }

    if !dashboard.insights.is_empty() {
        println!();
        println!("💡 Insights");
        for insight in &dashboard.insights {
            let icon = match insight.kind {
                InsightKind::Positive => "✅",
                InsightKind::Warning => "⚠️ ",
                InsightKind::Info => "ℹ️ ",
            };
            println!("   {} {}: {}", icon, insight.title, insight.description);
        }
    }

    Ok(())
}

pub fn cmd_report_trend(db: &Database, user: &str, months: u32, today: NaiveDate) -> Result<()> {
    let (expenses, income) = load_records(db, user)?;
    let trend = analytics::monthly_trend(
        &expenses,
        &income,
        today,
        months.clamp(1, MAX_TREND_MONTHS),
    );

    let max = trend
        .iter()
        .map(|p| p.expenses.max(p.income))
        .max()
        .unwrap_or(0) as f64;

    println!();
    println!("📈 Monthly Trend");
    println!("   ─────────────────────────────────────────────────────────────");
    for point in &trend {
        println!(
            "   {} {} │ out ${:>8} {:<20} │ in ${:>8} {}",
            point.month,
            point.year,
            point.expenses,
            bar(point.expenses as f64, max, 20),
            point.income,
            bar(point.income as f64, max, 20)
        );
    }

    Ok(())
}

pub fn cmd_report_categories(
    db: &Database,
    user: &str,
    window: &str,
    today: NaiveDate,
) -> Result<()> {
    let window = parse_window_arg(window)?;
    let filter = window.apply(ExpenseFilter::new(), today);
    let expenses = db.list_expenses(user, &filter)?;
    let breakdown = analytics::category_breakdown(&expenses);

    if breakdown.is_empty() {
        println!("No spending in window {}", window);
        return Ok(());
    }

    println!();
    println!("🗂️  Spending by Category ({})", window);
    println!("   ─────────────────────────────────────────────────────────────");
    for share in &breakdown {
        println!(
            "   {:<16} ${:>10.2} {:>6.1}% {}",
            share.name,
            share.amount,
            share.percentage,
            bar(share.percentage, 100.0, 25)
        );
    }

    Ok(())
}

pub fn cmd_report_window(db: &Database, user: &str, window: &str, today: NaiveDate) -> Result<()> {
    let window = parse_window_arg(window)?;
    let (expenses, income) = load_records(db, user)?;
    let report = analytics::window_analytics(&expenses, &income, window, today);

    println!();
    match report.start {
        Some(start) => println!("🗓️  Window {} (since {})", window, start),
        None => println!("🗓️  Window {}", window),
    }
    println!("   ─────────────────────────────");
    println!(
        "   Expenses:  ${:>10.2}  {}",
        report.total_expenses,
        change(report.expense_change)
    );
    println!(
        "   Income:    ${:>10.2}  {}",
        report.total_income,
        change(report.income_change)
    );
    println!("   Net:       ${:>10.2}", report.net);
    println!("   Transactions: {}", report.transaction_count);
    println!();
    println!(
        "   Worth it:     ${:.2} ({} expenses, {:.1}%)",
        report.worthy.worthy_total, report.worthy.worthy_count, report.worthy.worthy_percentage
    );
    println!(
        "   Not worth it: ${:.2} ({} expenses)",
        report.worthy.not_worthy_total, report.worthy.not_worthy_count
    );
    println!(
        "   Income:       ${:.2} recurring, ${:.2} one-time",
        report.income.recurring, report.income.one_time
    );

    Ok(())
}

pub fn cmd_report_activity(db: &Database, user: &str, days: u32, today: NaiveDate) -> Result<()> {
    let days = days.clamp(1, MAX_ACTIVITY_DAYS);
    let since = today.checked_sub_signed(Duration::days(i64::from(days)));
    let expenses = db.list_expenses(user, &ExpenseFilter::new().since(since))?;
    let activity = analytics::daily_activity(&expenses, today, days);

    let max = activity.iter().map(|p| p.amount).fold(0.0, f64::max);

    println!();
    println!("📅 Daily Activity (last {} days)", days);
    println!("   ─────────────────────────────────────────────────────────────");
    for point in &activity {
        println!(
            "   {} │ ${:>9.2} {}",
            point.date,
            point.amount,
            bar(point.amount, max, 30)
        );
    }

    Ok(())
}
