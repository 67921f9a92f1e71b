//! Income operations

use rusqlite::{params, OptionalExtension};

use super::{ensure_owner, parse_date, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{Income, IncomeUpdate, NewIncome};

const INCOME_COLUMNS: &str = "id, user_id, amount, source, description, date, is_recurring, recurring_frequency, created_at, updated_at";

impl Database {
    pub fn insert_income(&self, user_id: &str, income: &NewIncome) -> Result<Income> {
        income.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO income (user_id, amount, source, description, date, is_recurring, recurring_frequency)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                income.amount,
                income.source.trim(),
                income.description.trim(),
                income.date.to_string(),
                income.is_recurring,
                income.normalized_frequency().map(|f| f.as_str()),
            ],
        )?;

        let id = conn.last_insert_rowid();
        drop(conn);
        self.get_income(id)?
            .ok_or_else(|| Error::NotFound(format!("Income {} vanished after insert", id)))
    }

    /// Insert many validated income entries in a single transaction
    pub fn insert_income_many(&self, user_id: &str, entries: &[NewIncome]) -> Result<usize> {
        for income in entries {
            income.validate()?;
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let inserted = insert_income_rows(&tx, user_id, entries)?;
        tx.commit()?;

        Ok(inserted)
    }

    pub fn get_income(&self, id: i64) -> Result<Option<Income>> {
        let conn = self.conn()?;
        let income = conn
            .query_row(
                &format!("SELECT {} FROM income WHERE id = ?", INCOME_COLUMNS),
                params![id],
                Self::row_to_income,
            )
            .optional()?;
        Ok(income)
    }

    /// Get an income entry owned by `user_id`
    pub fn get_income_for_user(&self, user_id: &str, id: i64) -> Result<Income> {
        let income = self
            .get_income(id)?
            .ok_or_else(|| Error::NotFound("Income not found".to_string()))?;
        ensure_owner(&income.user_id, user_id)?;
        Ok(income)
    }

    /// List a user's income newest first, optionally bounded by date
    pub fn list_income(
        &self,
        user_id: &str,
        date_range: Option<(chrono::NaiveDate, chrono::NaiveDate)>,
    ) -> Result<Vec<Income>> {
        let conn = self.conn()?;

        let incomes = if let Some((start, end)) = date_range {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM income WHERE user_id = ? AND date >= ? AND date <= ? ORDER BY date DESC, id DESC",
                INCOME_COLUMNS
            ))?;
            let rows = stmt.query_map(
                params![user_id, start.to_string(), end.to_string()],
                Self::row_to_income,
            )?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        } else {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM income WHERE user_id = ? ORDER BY date DESC, id DESC",
                INCOME_COLUMNS
            ))?;
            let rows = stmt.query_map(params![user_id], Self::row_to_income)?;
            rows.collect::<std::result::Result<Vec<_>, _>>()?
        };

        Ok(incomes)
    }

    pub fn update_income(&self, user_id: &str, id: i64, update: &IncomeUpdate) -> Result<Income> {
        let mut income = self.get_income_for_user(user_id, id)?;
        update.apply(&mut income)?;

        let conn = self.conn()?;
        conn.execute(
            r#"
            UPDATE income
            SET amount = ?, source = ?, description = ?, date = ?, is_recurring = ?,
                recurring_frequency = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![
                income.amount,
                income.source.trim(),
                income.description.trim(),
                income.date.to_string(),
                income.is_recurring,
                income.recurring_frequency.map(|f| f.as_str()),
                id,
            ],
        )?;
        drop(conn);

        self.get_income_for_user(user_id, id)
    }

    pub fn delete_income(&self, user_id: &str, id: i64) -> Result<()> {
        self.get_income_for_user(user_id, id)?;
        let conn = self.conn()?;
        conn.execute("DELETE FROM income WHERE id = ?", params![id])?;
        Ok(())
    }

    /// Helper to convert a row to Income
    /// Column order matches `INCOME_COLUMNS`
    pub(crate) fn row_to_income(row: &rusqlite::Row) -> rusqlite::Result<Income> {
        let date_str: String = row.get(5)?;
        let frequency_str: Option<String> = row.get(7)?;
        let created_at_str: String = row.get(8)?;
        let updated_at_str: String = row.get(9)?;

        Ok(Income {
            id: row.get(0)?,
            user_id: row.get(1)?,
            amount: row.get(2)?,
            source: row.get(3)?,
            description: row.get(4)?,
            date: parse_date(&date_str),
            is_recurring: row.get(6)?,
            recurring_frequency: frequency_str.and_then(|s| s.parse().ok()),
            created_at: parse_datetime(&created_at_str),
            updated_at: parse_datetime(&updated_at_str),
        })
    }
}

/// Bulk insert on an open connection or transaction; callers validate first
pub(crate) fn insert_income_rows(
    conn: &rusqlite::Connection,
    user_id: &str,
    entries: &[NewIncome],
) -> Result<usize> {
    let mut stmt = conn.prepare(
        r#"
        INSERT INTO income (user_id, amount, source, description, date, is_recurring, recurring_frequency)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )?;
    for income in entries {
        stmt.execute(params![
            user_id,
            income.amount,
            income.source.trim(),
            income.description.trim(),
            income.date.to_string(),
            income.is_recurring,
            income.normalized_frequency().map(|f| f.as_str()),
        ])?;
    }
    Ok(entries.len())
}
