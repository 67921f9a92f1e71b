//! Expense operations

use rusqlite::{params, OptionalExtension};

use super::{ensure_owner, parse_date, parse_datetime, Database, ExpenseFilter};
use crate::error::{Error, Result};
use crate::models::{Category, Expense, ExpenseUpdate, NewExpense};

const EXPENSE_COLUMNS: &str = "id, user_id, amount, category, description, date, notes, is_worthy, tags, created_at, updated_at";

impl Database {
    /// Insert a validated expense for a user
    pub fn insert_expense(&self, user_id: &str, expense: &NewExpense) -> Result<Expense> {
        expense.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO expenses (user_id, amount, category, description, date, notes, is_worthy, tags)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                expense.amount,
                expense.category.as_str(),
                expense.description.trim(),
                expense.date.to_string(),
                expense.notes.as_deref().filter(|n| !n.is_empty()),
                expense.is_worthy,
                serde_json::to_string(&expense.tags)?,
            ],
        )?;

        let id = conn.last_insert_rowid();
        drop(conn);
        self.get_expense(id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {} vanished after insert", id)))
    }

    /// Insert many validated expenses in a single transaction
    pub fn insert_expenses(&self, user_id: &str, expenses: &[NewExpense]) -> Result<usize> {
        for expense in expenses {
            expense.validate()?;
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let inserted = insert_expense_rows(&tx, user_id, expenses)?;
        tx.commit()?;

        Ok(inserted)
    }

    /// Get an expense by id regardless of owner
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let expense = conn
            .query_row(
                &format!("SELECT {} FROM expenses WHERE id = ?", EXPENSE_COLUMNS),
                params![id],
                Self::row_to_expense,
            )
            .optional()?;
        Ok(expense)
    }

    /// Get an expense owned by `user_id`
    ///
    /// Returns `NotFound` when the id is absent and `Unauthorized` when it
    /// belongs to someone else.
    pub fn get_expense_for_user(&self, user_id: &str, id: i64) -> Result<Expense> {
        let expense = self
            .get_expense(id)?
            .ok_or_else(|| Error::NotFound("Expense not found".to_string()))?;
        ensure_owner(&expense.user_id, user_id)?;
        Ok(expense)
    }

    /// List a user's expenses newest first
    pub fn list_expenses(&self, user_id: &str, filter: &ExpenseFilter<'_>) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let built = filter.build();

        let sql = format!(
            "SELECT {} FROM expenses WHERE user_id = ?{} ORDER BY date DESC, id DESC",
            EXPENSE_COLUMNS, built.conditions
        );

        let mut params: Vec<&dyn rusqlite::ToSql> = vec![&user_id];
        params.extend(built.params_refs());

        let mut stmt = conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(params.as_slice(), Self::row_to_expense)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(expenses)
    }

    /// Apply a partial update to an owned expense and return the new record
    pub fn update_expense(&self, user_id: &str, id: i64, update: &ExpenseUpdate) -> Result<Expense> {
        let mut expense = self.get_expense_for_user(user_id, id)?;
        update.apply(&mut expense)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE expenses
            SET amount = ?, category = ?, description = ?, date = ?, notes = ?,
                is_worthy = ?, tags = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![
                expense.amount,
                expense.category.as_str(),
                expense.description.trim(),
                expense.date.to_string(),
                expense.notes,
                expense.is_worthy,
                serde_json::to_string(&expense.tags)?,
                id,
            ],
        )?;
        drop(conn);

        self.get_expense_for_user(user_id, id)
    }

    /// Delete an owned expense
    pub fn delete_expense(&self, user_id: &str, id: i64) -> Result<()> {
        self.get_expense_for_user(user_id, id)?;
        let conn = self.conn()?;
        conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;
        Ok(())
    }

    /// Total spend for a user's category over an inclusive date range
    pub fn sum_expenses(
        &self,
        user_id: &str,
        category: Category,
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    ) -> Result<f64> {
        let conn = self.conn()?;
        let total: f64 = conn.query_row(
            r#"
            SELECT COALESCE(SUM(amount), 0.0) FROM expenses
            WHERE user_id = ? AND category = ? AND date >= ? AND date <= ?
            "#,
            params![user_id, category.as_str(), start.to_string(), end.to_string()],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Helper to convert a row to Expense
    /// Column order matches `EXPENSE_COLUMNS`
    pub(crate) fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
        let category_str: String = row.get(3)?;
        let date_str: String = row.get(5)?;
        let tags_json: String = row.get(8)?;
        let created_at_str: String = row.get(9)?;
        let updated_at_str: String = row.get(10)?;

        Ok(Expense {
            id: row.get(0)?,
            user_id: row.get(1)?,
            amount: row.get(2)?,
            category: category_str.parse().unwrap_or(Category::Other),
            description: row.get(4)?,
            date: parse_date(&date_str),
            notes: row.get(6)?,
            is_worthy: row.get(7)?,
            tags: serde_json::from_str(&tags_json).unwrap_or_default(),
            created_at: parse_datetime(&created_at_str),
            updated_at: parse_datetime(&updated_at_str),
        })
    }
}

/// Bulk insert on an open connection or transaction; callers validate first
pub(crate) fn insert_expense_rows(
    conn: &rusqlite::Connection,
    user_id: &str,
    expenses: &[NewExpense],
) -> Result<usize> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO expenses (user_id, amount, category, description, date, notes, is_worthy, tags)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )?;
    for expense in expenses {
        stmt.execute(params![
            user_id,
            expense.amount,
            expense.category.as_str(),
            expense.description.trim(),
            expense.date.to_string(),
            expense.notes.as_deref().filter(|n| !n.is_empty()),
            expense.is_worthy,
            serde_json::to_string(&expense.tags)?,
        ])?;
    }
    Ok(expenses.len())
}
