//! Spendwise CLI - Personal finance tracker
//!
//! Usage:
//!   spendwise init                          Initialize database
//!   spendwise expenses add 12.50 -c food -d Lunch
//!   spendwise budgets set food 500          Budget for the current month
//!   spendwise report dashboard              This month at a glance
//!   spendwise serve --port 3000             Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use spendwise_core::{Clock, SystemClock};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let today = SystemClock.today();
    let user = cli.user.as_str();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                cli.no_encrypt,
                static_dir.as_deref(),
            )
            .await
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_expenses_list(&db, user, None, None, None, 20, today),
                Some(ExpensesAction::List {
                    category,
                    window,
                    search,
                    limit,
                }) => commands::cmd_expenses_list(
                    &db,
                    user,
                    category.as_deref(),
                    window.as_deref(),
                    search.as_deref(),
                    limit,
                    today,
                ),
                Some(ExpensesAction::Add {
                    amount,
                    category,
                    description,
                    date,
                    notes,
                    not_worthy,
                    tags,
                }) => commands::cmd_expenses_add(
                    &db,
                    user,
                    commands::ExpenseArgs {
                        amount,
                        category: &category,
                        description: &description,
                        date: date.as_deref(),
                        notes: notes.as_deref(),
                        not_worthy,
                        tags: tags.as_deref(),
                    },
                    today,
                ),
                Some(ExpensesAction::Delete { id }) => commands::cmd_expenses_delete(&db, user, id),
            }
        }
        Commands::Income { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(IncomeAction::List) => commands::cmd_income_list(&db, user),
                Some(IncomeAction::Add {
                    amount,
                    source,
                    description,
                    date,
                    recurring,
                }) => commands::cmd_income_add(
                    &db,
                    user,
                    amount,
                    &source,
                    &description,
                    date.as_deref(),
                    recurring.as_deref(),
                    today,
                ),
                Some(IncomeAction::Delete { id }) => commands::cmd_income_delete(&db, user, id),
            }
        }
        Commands::Budgets { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_budgets_list(&db, user, None, None),
                Some(BudgetsAction::List { month, year }) => {
                    commands::cmd_budgets_list(&db, user, month, year)
                }
                Some(BudgetsAction::Set {
                    category,
                    amount,
                    month,
                    year,
                }) => commands::cmd_budgets_set(&db, user, &category, amount, month, year, today),
                Some(BudgetsAction::Delete { id }) => commands::cmd_budgets_delete(&db, user, id),
            }
        }
        Commands::Notifications { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_notifications_list(&db, user, false),
                Some(NotificationsAction::List { unread }) => {
                    commands::cmd_notifications_list(&db, user, unread)
                }
                Some(NotificationsAction::Read { id }) => {
                    commands::cmd_notifications_read(&db, user, id)
                }
                Some(NotificationsAction::ReadAll) => {
                    commands::cmd_notifications_read_all(&db, user)
                }
                Some(NotificationsAction::Delete { id }) => {
                    commands::cmd_notifications_delete(&db, user, id)
                }
            }
        }
        Commands::Report { report_type } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match report_type {
                ReportType::Dashboard => commands::cmd_report_dashboard(&db, user, today),
                ReportType::Trend { months } => {
                    commands::cmd_report_trend(&db, user, months, today)
                }
                ReportType::Categories { window } => {
                    commands::cmd_report_categories(&db, user, &window, today)
                }
                ReportType::Window { window } => {
                    commands::cmd_report_window(&db, user, &window, today)
                }
                ReportType::Activity { days } => {
                    commands::cmd_report_activity(&db, user, days, today)
                }
            }
        }
        Commands::Export { format, output } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_export(&db, user, &format, output.as_deref())
        }
        Commands::Import { file } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_import(&db, user, &file)
        }
    }
}
