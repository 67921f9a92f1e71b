//! Notification operations

use rusqlite::{params, OptionalExtension};

use super::{ensure_owner, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewNotification, Notification};
use crate::notify::AlertKey;

const NOTIFICATION_COLUMNS: &str = "id, user_id, title, message, is_read, type, created_at";

impl Database {
    /// Create a manual (unkeyed) notification
    pub fn insert_notification(&self, user_id: &str, notification: &NewNotification) -> Result<Notification> {
        notification.validate()?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO notifications (user_id, title, message, type) VALUES (?, ?, ?, ?)",
            params![
                user_id,
                notification.title,
                notification.message,
                notification.notification_type.as_str()
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_notification(id)?
            .ok_or_else(|| Error::NotFound(format!("Notification {} vanished after insert", id)))
    }

    /// Insert a budget alert carrying a dedup key
    ///
    /// The partial unique index on unread keyed notifications turns a
    /// duplicate into a no-op, so this returns `None` instead of failing.
    pub fn insert_alert_notification(
        &self,
        user_id: &str,
        key: &AlertKey,
        notification: &NewNotification,
    ) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO notifications
                (user_id, title, message, type, alert_category, alert_month, alert_year, alert_severity)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                notification.title,
                notification.message,
                notification.notification_type.as_str(),
                key.category.as_str(),
                key.month,
                key.year,
                key.severity.as_str(),
            ],
        )?;

        if inserted == 0 {
            return Ok(None);
        }
        Ok(Some(conn.last_insert_rowid()))
    }

    /// Id of the unread notification for an alert key
    pub fn find_unread_alert_notification(&self, user_id: &str, key: &AlertKey) -> Result<Option<i64>> {
        let conn = self.conn()?;
        let id = conn
            .query_row(
                r#"
                SELECT id FROM notifications
                WHERE user_id = ? AND is_read = 0
                  AND alert_category = ? AND alert_month = ? AND alert_year = ? AND alert_severity = ?
                "#,
                params![
                    user_id,
                    key.category.as_str(),
                    key.month,
                    key.year,
                    key.severity.as_str()
                ],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    pub fn get_notification(&self, id: i64) -> Result<Option<Notification>> {
        let conn = self.conn()?;
        let notification = conn
            .query_row(
                &format!("SELECT {} FROM notifications WHERE id = ?", NOTIFICATION_COLUMNS),
                params![id],
                Self::row_to_notification,
            )
            .optional()?;
        Ok(notification)
    }

    pub fn get_notification_for_user(&self, user_id: &str, id: i64) -> Result<Notification> {
        let notification = self
            .get_notification(id)?
            .ok_or_else(|| Error::NotFound("Notification not found".to_string()))?;
        ensure_owner(&notification.user_id, user_id)?;
        Ok(notification)
    }

    /// List notifications newest first
    pub fn list_notifications(&self, user_id: &str, unread_only: bool) -> Result<Vec<Notification>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            r#"
            SELECT {} FROM notifications
            WHERE user_id = ? AND (? = 0 OR is_read = 0)
            ORDER BY created_at DESC, id DESC
            "#,
            NOTIFICATION_COLUMNS
        ))?;

        let notifications = stmt
            .query_map(params![user_id, unread_only], Self::row_to_notification)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(notifications)
    }

    pub fn count_unread_notifications(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM notifications WHERE user_id = ? AND is_read = 0",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Mark one notification read, releasing its alert key
    pub fn mark_notification_read(&self, user_id: &str, id: i64) -> Result<Notification> {
        self.get_notification_for_user(user_id, id)?;
        let conn = self.conn()?;
        conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?",
            params![id],
        )?;
        drop(conn);
        self.get_notification_for_user(user_id, id)
    }

    /// Mark every unread notification read; returns how many changed
    pub fn mark_all_notifications_read(&self, user_id: &str) -> Result<usize> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE notifications SET is_read = 1 WHERE user_id = ? AND is_read = 0",
            params![user_id],
        )?;
        Ok(changed)
    }

    pub fn delete_notification(&self, user_id: &str, id: i64) -> Result<()> {
        self.get_notification_for_user(user_id, id)?;
        let conn = self.conn()?;
        conn.execute("DELETE FROM notifications WHERE id = ?", params![id])?;
        Ok(())
    }

    pub(crate) fn row_to_notification(row: &rusqlite::Row) -> rusqlite::Result<Notification> {
        let type_str: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;

        Ok(Notification {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            message: row.get(3)?,
            is_read: row.get(4)?,
            notification_type: type_str.parse().unwrap_or_default(),
            created_at: parse_datetime(&created_at_str),
        })
    }
}
