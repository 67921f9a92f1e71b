//! Expense handlers
//!
//! Creating or updating an expense re-evaluates the budget for the period
//! the expense lands in. Evaluation never fails the request.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use super::parse_json;
use crate::{AppError, AppState, CurrentUser, DeletedResponse};
use spendwise_core::analytics::TimeWindow;
use spendwise_core::models::{Category, Expense, ExpenseUpdate, NewExpense};
use spendwise_core::{BudgetEvaluator, ExpenseFilter};

/// Query parameters for listing expenses
#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    /// Free-text search over description, category and notes
    pub search: Option<String>,
    /// Category filter (e.g. "food")
    pub category: Option<String>,
    /// Time window (this-month, 7d, 30d, 90d, 1y, all)
    pub window: Option<String>,
}

/// Parse an optional category parameter
pub(crate) fn parse_category(raw: Option<&str>) -> Result<Option<Category>, AppError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<Category>())
        .transpose()
        .map_err(|e| AppError::bad_request(&e))
}

/// Parse an optional time window parameter
pub(crate) fn parse_window(raw: Option<&str>) -> Result<Option<TimeWindow>, AppError> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| s.parse::<TimeWindow>())
        .transpose()
        .map_err(|e| AppError::bad_request(&e))
}

/// GET /api/expenses - List the caller's expenses, newest first
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<ExpenseQuery>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let category = parse_category(params.category.as_deref())?;
    let window = parse_window(params.window.as_deref())?;

    let mut filter = ExpenseFilter::new()
        .category(category)
        .search(params.search.as_deref());
    if let Some(window) = window {
        filter = window.apply(filter, state.clock.today());
    }

    let expenses = state.db.list_expenses(&user.id, &filter)?;

    // Audit log - read access
    state.audit(
        &user.id,
        "list",
        Some("expense"),
        None,
        Some(&format!(
            "search={:?}, category={:?}, window={:?}, returned={}",
            params.search,
            params.category,
            params.window,
            expenses.len()
        )),
    );

    Ok(Json(expenses))
}

/// GET /api/expenses/:id - Get a single expense
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Expense>, AppError> {
    let expense = state.db.get_expense_for_user(&user.id, id)?;

    state.audit(&user.id, "get", Some("expense"), Some(id), None);

    Ok(Json(expense))
}

/// POST /api/expenses - Record an expense and evaluate its budget
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    body: Bytes,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let new_expense: NewExpense = parse_json(&body)?;
    let expense = state.db.insert_expense(&user.id, &new_expense)?;

    let outcome = BudgetEvaluator::new(&state.db).evaluate_expense(&expense);

    state.audit(
        &user.id,
        "create",
        Some("expense"),
        Some(expense.id),
        Some(&format!(
            "amount={}, category={}, budget_status={:?}, notified={}",
            expense.amount,
            expense.category,
            outcome.status(),
            outcome.notified()
        )),
    );

    Ok((StatusCode::CREATED, Json(expense)))
}

/// PUT /api/expenses/:id - Partially update an expense
///
/// Only the period the expense ends up in is re-evaluated.
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<Expense>, AppError> {
    let update: ExpenseUpdate = parse_json(&body)?;
    let expense = state.db.update_expense(&user.id, id, &update)?;

    let outcome = BudgetEvaluator::new(&state.db).evaluate_expense(&expense);

    state.audit(
        &user.id,
        "update",
        Some("expense"),
        Some(id),
        Some(&format!(
            "budget_status={:?}, notified={}",
            outcome.status(),
            outcome.notified()
        )),
    );

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, AppError> {
    state.db.delete_expense(&user.id, id)?;

    state.audit(&user.id, "delete", Some("expense"), Some(id), None);

    Ok(Json(DeletedResponse { id }))
}
