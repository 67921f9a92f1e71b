//! Budget operations
//!
//! At most one budget exists per (user, category, month, year). Write paths
//! look the period up before inserting; the UNIQUE constraint backs that up.

use rusqlite::{params, OptionalExtension};

use super::{ensure_owner, parse_datetime, Database};
use crate::budget::summarize;
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetPeriod, BudgetUpdate, BudgetWithSpent, Category, NewBudget};

const BUDGET_COLUMNS: &str = "id, user_id, category, amount, month, year, created_at, updated_at";

/// Result of [`Database::upsert_budget`]
#[derive(Debug, Clone)]
pub struct BudgetUpsert {
    pub budget: Budget,
    /// False when an existing budget for the period was updated
    pub created: bool,
}

impl Database {
    pub fn get_budget(&self, id: i64) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                &format!("SELECT {} FROM budgets WHERE id = ?", BUDGET_COLUMNS),
                params![id],
                Self::row_to_budget,
            )
            .optional()?;
        Ok(budget)
    }

    pub fn get_budget_for_user(&self, user_id: &str, id: i64) -> Result<Budget> {
        let budget = self
            .get_budget(id)?
            .ok_or_else(|| Error::NotFound("Budget not found".to_string()))?;
        ensure_owner(&budget.user_id, user_id)?;
        Ok(budget)
    }

    /// The user's budget for a period, if any
    pub fn find_budget_for_period(&self, user_id: &str, period: BudgetPeriod) -> Result<Option<Budget>> {
        let conn = self.conn()?;
        let budget = conn
            .query_row(
                &format!(
                    "SELECT {} FROM budgets WHERE user_id = ? AND category = ? AND month = ? AND year = ?",
                    BUDGET_COLUMNS
                ),
                params![user_id, period.category.as_str(), period.month, period.year],
                Self::row_to_budget,
            )
            .optional()?;
        Ok(budget)
    }

    /// List budgets, optionally for a single month
    pub fn list_budgets(&self, user_id: &str, month: Option<u32>, year: Option<i32>) -> Result<Vec<Budget>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM budgets
            WHERE user_id = ?1
              AND (?2 IS NULL OR month = ?2)
              AND (?3 IS NULL OR year = ?3)
            ORDER BY year DESC, month DESC, category
            "#,
            BUDGET_COLUMNS
        ))?;

        let budgets = stmt
            .query_map(params![user_id, month, year], Self::row_to_budget)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(budgets)
    }

    /// List budgets with spend recomputed from expenses
    pub fn list_budgets_with_spent(
        &self,
        user_id: &str,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Vec<BudgetWithSpent>> {
        self.list_budgets(user_id, month, year)?
            .into_iter()
            .map(|budget| self.budget_with_spent(budget))
            .collect()
    }

    /// Recompute a budget's spend from its owner's expenses in the period
    pub fn budget_with_spent(&self, budget: Budget) -> Result<BudgetWithSpent> {
        let (start, end) = budget.period().date_range()?;
        let spent = self.sum_expenses(&budget.user_id, budget.category, start, end)?;
        Ok(summarize(budget, spent))
    }

    /// Insert a budget, failing with `Conflict` if the period is taken
    pub fn insert_budget(&self, user_id: &str, budget: &NewBudget) -> Result<Budget> {
        budget.validate()?;
        if self.find_budget_for_period(user_id, budget.period())?.is_some() {
            return Err(Error::Conflict(
                "Budget for this category and month already exists".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO budgets (user_id, category, amount, month, year) VALUES (?, ?, ?, ?, ?)",
            params![
                user_id,
                budget.category.as_str(),
                budget.amount,
                budget.month,
                budget.year
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_budget(id)?
            .ok_or_else(|| Error::NotFound(format!("Budget {} vanished after insert", id)))
    }

    /// Create the budget for a period, or update its amount if one exists
    pub fn upsert_budget(&self, user_id: &str, budget: &NewBudget) -> Result<BudgetUpsert> {
        budget.validate()?;

        match self.find_budget_for_period(user_id, budget.period())? {
            Some(existing) => {
                let conn = self.conn()?;
                conn.execute(
                    "UPDATE budgets SET amount = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
                    params![budget.amount, existing.id],
                )?;
                drop(conn);
                let budget = self.get_budget_for_user(user_id, existing.id)?;
                Ok(BudgetUpsert {
                    budget,
                    created: false,
                })
            }
            None => Ok(BudgetUpsert {
                budget: self.insert_budget(user_id, budget)?,
                created: true,
            }),
        }
    }

    /// Update an owned budget; moving it onto another budget's period is a `Conflict`
    pub fn update_budget(&self, user_id: &str, id: i64, update: &BudgetUpdate) -> Result<Budget> {
        let mut budget = self.get_budget_for_user(user_id, id)?;
        update.apply(&mut budget)?;

        if let Some(other) = self.find_budget_for_period(user_id, budget.period())? {
            if other.id != id {
                return Err(Error::Conflict(
                    "Budget for this category and month already exists".to_string(),
                ));
            }
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE budgets
            SET category = ?, amount = ?, month = ?, year = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![
                budget.category.as_str(),
                budget.amount,
                budget.month,
                budget.year,
                id
            ],
        )?;
        drop(conn);

        self.get_budget_for_user(user_id, id)
    }

    pub fn delete_budget(&self, user_id: &str, id: i64) -> Result<()> {
        self.get_budget_for_user(user_id, id)?;
        let conn = self.conn()?;
        conn.execute("DELETE FROM budgets WHERE id = ?", params![id])?;
        Ok(())
    }

    /// Insert budgets in one transaction, skipping periods the user already has
    ///
    /// Returns (imported, skipped).
    pub fn insert_budgets_skipping_existing(
        &self,
        user_id: &str,
        budgets: &[NewBudget],
    ) -> Result<(usize, usize)> {
        for budget in budgets {
            budget.validate()?;
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let imported = insert_budget_rows_skipping_existing(&tx, user_id, budgets)?;
        tx.commit()?;

        Ok((imported, budgets.len() - imported))
    }

    /// Helper to convert a row to Budget
    pub(crate) fn row_to_budget(row: &rusqlite::Row) -> rusqlite::Result<Budget> {
        let category_str: String = row.get(2)?;
        let created_at_str: String = row.get(6)?;
        let updated_at_str: String = row.get(7)?;

        Ok(Budget {
            id: row.get(0)?,
            user_id: row.get(1)?,
            category: category_str.parse().unwrap_or(Category::Other),
            amount: row.get(3)?,
            month: row.get(4)?,
            year: row.get(5)?,
            created_at: parse_datetime(&created_at_str),
            updated_at: parse_datetime(&updated_at_str),
        })
    }
}

/// Insert budgets whose period is free; returns how many were inserted.
/// Duplicate periods inside `budgets` are skipped as well.
pub(crate) fn insert_budget_rows_skipping_existing(
    conn: &rusqlite::Connection,
    user_id: &str,
    budgets: &[NewBudget],
) -> Result<usize> {
    let mut stmt = conn.prepare(
        r#"
        INSERT OR IGNORE INTO budgets (user_id, category, amount, month, year)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )?;
    let mut imported = 0;
    for budget in budgets {
        imported += stmt.execute(params![
            user_id,
            budget.category.as_str(),
            budget.amount,
            budget.month,
            budget.year
        ])?;
    }
    Ok(imported)
}
