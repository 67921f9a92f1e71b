//! Notification command implementations

use anyhow::Result;
use spendwise_core::models::NotificationType;
use spendwise_core::Database;

pub fn cmd_notifications_list(db: &Database, user: &str, unread_only: bool) -> Result<()> {
    let notifications = db.list_notifications(user, unread_only)?;

    if notifications.is_empty() {
        println!("✨ No notifications");
        return Ok(());
    }

    let unread = db.count_unread_notifications(user)?;

    println!();
    println!("🔔 Notifications ({} unread)", unread);
    println!("   ─────────────────────────────────────────────────────────────");

    for notification in &notifications {
        let icon = match notification.notification_type {
            NotificationType::Info => "ℹ️ ",
            NotificationType::Success => "✅",
            NotificationType::Warning => "⚠️ ",
            NotificationType::Error => "❌",
        };
        let marker = if notification.is_read { " " } else { "•" };
        println!(
            "   {} [{}] {} {}",
            marker, notification.id, icon, notification.title
        );
        println!("        {}", notification.message);
    }

    Ok(())
}

pub fn cmd_notifications_read(db: &Database, user: &str, id: i64) -> Result<()> {
    db.mark_notification_read(user, id)?;
    println!("✅ Marked notification #{} as read", id);
    Ok(())
}

pub fn cmd_notifications_read_all(db: &Database, user: &str) -> Result<()> {
    let count = db.mark_all_notifications_read(user)?;
    println!("✅ Marked {} notification(s) as read", count);
    Ok(())
}

pub fn cmd_notifications_delete(db: &Database, user: &str, id: i64) -> Result<()> {
    db.delete_notification(user, id)?;
    println!("🗑️  Deleted notification #{}", id);
    Ok(())
}
