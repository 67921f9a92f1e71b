//! Income handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::parse_json;
use crate::{AppError, AppState, CurrentUser, DeletedResponse};
use spendwise_core::models::{Income, IncomeUpdate, NewIncome};

/// GET /api/income - List the caller's income, newest first
pub async fn list_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Income>>, AppError> {
    let income = state.db.list_income(&user.id, None)?;

    state.audit(
        &user.id,
        "list",
        Some("income"),
        None,
        Some(&format!("returned={}", income.len())),
    );

    Ok(Json(income))
}

/// GET /api/income/:id - Get a single income entry
pub async fn get_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Income>, AppError> {
    let income = state.db.get_income_for_user(&user.id, id)?;

    state.audit(&user.id, "get", Some("income"), Some(id), None);

    Ok(Json(income))
}

/// POST /api/income - Record an income entry
pub async fn create_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    body: Bytes,
) -> Result<(StatusCode, Json<Income>), AppError> {
    let new_income: NewIncome = parse_json(&body)?;
    let income = state.db.insert_income(&user.id, &new_income)?;

    state.audit(
        &user.id,
        "create",
        Some("income"),
        Some(income.id),
        Some(&format!(
            "amount={}, recurring={}",
            income.amount, income.is_recurring
        )),
    );

    Ok((StatusCode::CREATED, Json(income)))
}

/// PUT /api/income/:id - Partially update an income entry
pub async fn update_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<Income>, AppError> {
    let update: IncomeUpdate = parse_json(&body)?;
    let income = state.db.update_income(&user.id, id, &update)?;

    state.audit(&user.id, "update", Some("income"), Some(id), None);

    Ok(Json(income))
}

/// DELETE /api/income/:id - Delete an income entry
pub async fn delete_income(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, AppError> {
    state.db.delete_income(&user.id, id)?;

    state.audit(&user.id, "delete", Some("income"), Some(id), None);

    Ok(Json(DeletedResponse { id }))
}
