//! Notification handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::parse_json;
use crate::{AppError, AppState, CurrentUser, DeletedResponse};
use spendwise_core::models::{NewNotification, Notification};

/// Query parameters for listing notifications
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Serialize)]
pub struct CountResponse {
    pub count: i64,
}

/// GET /api/notifications - List notifications, newest first
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<NotificationQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = state
        .db
        .list_notifications(&user.id, params.unread_only)?;

    state.audit(
        &user.id,
        "list",
        Some("notification"),
        None,
        Some(&format!(
            "unread_only={}, returned={}",
            params.unread_only,
            notifications.len()
        )),
    );

    Ok(Json(notifications))
}

/// GET /api/notifications/unread-count - Number of unread notifications
pub async fn unread_notification_count(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<CountResponse>, AppError> {
    let count = state.db.count_unread_notifications(&user.id)?;
    Ok(Json(CountResponse { count }))
}

/// POST /api/notifications - Create a manual notification
pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    body: Bytes,
) -> Result<(StatusCode, Json<Notification>), AppError> {
    let new_notification: NewNotification = parse_json(&body)?;
    let notification = state.db.insert_notification(&user.id, &new_notification)?;

    state.audit(
        &user.id,
        "create",
        Some("notification"),
        Some(notification.id),
        None,
    );

    Ok((StatusCode::CREATED, Json(notification)))
}

/// PUT /api/notifications/:id/read - Mark one notification read
pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Notification>, AppError> {
    let notification = state.db.mark_notification_read(&user.id, id)?;

    state.audit(&user.id, "read", Some("notification"), Some(id), None);

    Ok(Json(notification))
}

/// PUT /api/notifications/read-all - Mark every unread notification read
pub async fn mark_all_notifications_read(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<CountResponse>, AppError> {
    let count = state.db.mark_all_notifications_read(&user.id)?;

    state.audit(
        &user.id,
        "read_all",
        Some("notification"),
        None,
        Some(&format!("count={}", count)),
    );

    Ok(Json(CountResponse {
        count: count as i64,
    }))
}

/// DELETE /api/notifications/:id - Delete a notification
pub async fn delete_notification(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, AppError> {
    state.db.delete_notification(&user.id, id)?;

    state.audit(&user.id, "delete", Some("notification"), Some(id), None);

    Ok(Json(DeletedResponse { id }))
}
