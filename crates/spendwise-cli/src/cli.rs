//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendwise - Track expenses, income and budgets
#[derive(Parser)]
#[command(name = "spendwise")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "spendwise.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SPENDWISE_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    /// User whose records are read and written
    #[arg(long, default_value = "local-dev", global = true)]
    pub user: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        #[arg(long)]
        no_auth: bool,

        /// Directory with the built browser client to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Manage expenses
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Manage income
    Income {
        #[command(subcommand)]
        action: Option<IncomeAction>,
    },

    /// Manage monthly budgets
    Budgets {
        #[command(subcommand)]
        action: Option<BudgetsAction>,
    },

    /// Show and manage notifications
    Notifications {
        #[command(subcommand)]
        action: Option<NotificationsAction>,
    },

    /// Generate reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Export all data for the user
    Export {
        /// Output format: json or csv
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import expenses, income and budgets from a JSON export
    Import {
        /// JSON file to import
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List expenses, newest first
    List {
        /// Filter by category (food, transport, ...)
        #[arg(long)]
        category: Option<String>,

        /// Time window: this-month, 7d, 30d, 90d, 1y, all
        #[arg(long)]
        window: Option<String>,

        /// Search description, category and notes
        #[arg(long)]
        search: Option<String>,

        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Record an expense
    Add {
        /// Amount spent
        amount: f64,

        /// Category (food, transport, entertainment, ...)
        #[arg(short, long)]
        category: String,

        /// What the money was spent on
        #[arg(short, long)]
        description: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Mark the expense as not worth it
        #[arg(long)]
        not_worthy: bool,

        /// Tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum IncomeAction {
    /// List income, newest first
    List,

    /// Record income
    Add {
        /// Amount received
        amount: f64,

        /// Where the money came from
        #[arg(short, long)]
        source: String,

        /// Description
        #[arg(short, long)]
        description: String,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Recurring frequency: weekly, biweekly, monthly, yearly
        #[arg(long)]
        recurring: Option<String>,
    },

    /// Delete an income entry
    Delete {
        /// Income ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BudgetsAction {
    /// List budgets with spending so far
    List {
        /// Month (1-12)
        #[arg(long)]
        month: Option<u32>,

        /// Year
        #[arg(long)]
        year: Option<i32>,
    },

    /// Create or update the budget for a category and month
    Set {
        /// Category (food, transport, ...)
        category: String,

        /// Spending limit for the month
        amount: f64,

        /// Month (1-12, defaults to the current month)
        #[arg(long)]
        month: Option<u32>,

        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Delete a budget
    Delete {
        /// Budget ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum NotificationsAction {
    /// List notifications
    List {
        /// Only show unread notifications
        #[arg(long)]
        unread: bool,
    },

    /// Mark a notification as read
    Read {
        /// Notification ID
        id: i64,
    },

    /// Mark all notifications as read
    ReadAll,

    /// Delete a notification
    Delete {
        /// Notification ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// This month's totals, savings and insights
    Dashboard,

    /// Monthly expense and income totals
    Trend {
        /// Number of months to include
        #[arg(long, default_value = "6")]
        months: u32,
    },

    /// Spending by category
    Categories {
        /// Time window: this-month, 7d, 30d, 90d, 1y, all
        #[arg(long, default_value = "30d")]
        window: String,
    },

    /// Totals and changes for a time window
    Window {
        /// Time window: this-month, 7d, 30d, 90d, 1y, all
        #[arg(long, default_value = "30d")]
        window: String,
    },

    /// Daily spending
    Activity {
        /// Number of days to include
        #[arg(long, default_value = "30")]
        days: u32,
    },
}
