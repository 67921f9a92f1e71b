//! Data export and import
//!
//! Supports:
//! - Full JSON export of a user's expenses, income and budgets
//! - CSV export with an expenses section and an income section
//! - JSON import that re-owns records to the importing user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::{
    insert_budget_rows_skipping_existing, insert_expense_rows, insert_income_rows, Database,
    ExpenseFilter,
};
use crate::error::{Error, Result};
use crate::models::{Budget, Expense, Income, NewBudget, NewExpense, NewIncome};

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Json => "spendwise_data.json",
            Self::Csv => "spendwise_report.csv",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown export format: {} (expected json or csv)", s)),
        }
    }
}

/// Everything a user owns, as exported
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataExport {
    pub expenses: Vec<Expense>,
    pub income: Vec<Income>,
    pub budgets: Vec<Budget>,
    pub export_date: DateTime<Utc>,
}

/// Import payload; identifiers and owners in the input are ignored
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportPayload {
    #[serde(default)]
    pub expenses: Option<Vec<NewExpense>>,
    #[serde(default)]
    pub income: Option<Vec<NewIncome>>,
    #[serde(default)]
    pub budgets: Option<Vec<NewBudget>>,
}

impl ImportPayload {
    pub fn is_empty(&self) -> bool {
        self.expenses.is_none() && self.income.is_none() && self.budgets.is_none()
    }
}

/// Counts from an import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub expenses: usize,
    pub income: usize,
    pub budgets: usize,
    /// Budgets skipped because the user already had one for the period
    pub budgets_skipped: usize,
}

impl Database {
    /// Collect all of a user's records
    pub fn export_data(&self, user_id: &str) -> Result<DataExport> {
        Ok(DataExport {
            expenses: self.list_expenses(user_id, &ExpenseFilter::new())?,
            income: self.list_income(user_id, None)?,
            budgets: self.list_budgets(user_id, None, None)?,
            export_date: Utc::now(),
        })
    }

    /// Pretty-printed JSON export
    pub fn export_json(&self, user_id: &str) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_data(user_id)?)?)
    }

    /// CSV report: an expenses section followed by an income section, newest first
    pub fn export_csv(&self, user_id: &str) -> Result<String> {
        let expenses = self.list_expenses(user_id, &ExpenseFilter::new())?;
        let income = self.list_income(user_id, None)?;

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        writer.write_record(["Expenses"])?;
        writer.write_record(["Date", "Category", "Description", "Amount"])?;
        for expense in &expenses {
            writer.write_record([
                expense.date.to_string(),
                expense.category.to_string(),
                expense.description.clone(),
                format!("{:.2}", expense.amount),
            ])?;
        }

        writer.write_record([""])?;
        writer.write_record(["Income"])?;
        writer.write_record(["Date", "Source", "Description", "Amount"])?;
        for income in &income {
            writer.write_record([
                income.date.to_string(),
                income.source.clone(),
                income.description.clone(),
                format!("{:.2}", income.amount),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| Error::InvalidData(e.to_string()))
    }

    /// Import records for a user in one transaction.
    ///
    /// Every record is validated before anything is written. Budgets whose
    /// period the user already has are skipped. Budget evaluation is not run.
    pub fn import_data(&self, user_id: &str, payload: &ImportPayload) -> Result<ImportStats> {
        if payload.is_empty() {
            return Err(Error::InvalidData("No data provided to import".to_string()));
        }

        let expenses = payload.expenses.as_deref().unwrap_or_default();
        let income = payload.income.as_deref().unwrap_or_default();
        let budgets = payload.budgets.as_deref().unwrap_or_default();

        for expense in expenses {
            expense.validate()?;
        }
        for entry in income {
            entry.validate()?;
        }
        for budget in budgets {
            budget.validate()?;
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let expense_count = insert_expense_rows(&tx, user_id, expenses)?;
        let income_count = insert_income_rows(&tx, user_id, income)?;
        let budget_count = insert_budget_rows_skipping_existing(&tx, user_id, budgets)?;
        tx.commit()?;

        let stats = ImportStats {
            expenses: expense_count,
            income: income_count,
            budgets: budget_count,
            budgets_skipped: budgets.len() - budget_count,
        };
        info!(
            user_id,
            expenses = stats.expenses,
            income = stats.income,
            budgets = stats.budgets,
            skipped = stats.budgets_skipped,
            "Imported data"
        );
        Ok(stats)
    }
}
