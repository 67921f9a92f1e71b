//! Budget handlers
//!
//! Budgets are unique per (category, month, year). Updating an existing
//! budget, through upsert or edit, re-evaluates the affected period.

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
use spendwise_core::models::{BudgetUpdate, BudgetWithSpent, NewBudget};
use spendwise_core::BudgetEvaluator;

/// Query parameters for listing budgets
#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    /// Zero-based month
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// GET /api/budgets - List budgets with spend recomputed from expenses
pub async fn list_budgets(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<BudgetQuery>,
) -> Result<Json<Vec<BudgetWithSpent>>, AppError> {
    let budgets = state
        .db
        .list_budgets_with_spent(&user.id, params.month, params.year)?;

    state.audit(
        &user.id,
        "list",
        Some("budget"),
        None,
        Some(&format!(
            "month={:?}, year={:?}, returned={}",
            params.month,
            params.year,
            budgets.len()
        )),
    );

    Ok(Json(budgets))
}

/// GET /api/budgets/:id - Get a single budget with its recomputed spend
pub async fn get_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<BudgetWithSpent>, AppError> {
    let budget = state.db.get_budget_for_user(&user.id, id)?;
    let entry = state.db.budget_with_spent(budget)?;

    state.audit(&user.id, "get", Some("budget"), Some(id), None);

    Ok(Json(entry))
}

/// POST /api/budgets - Create a budget, or update the amount of the existing one
///
/// Returns 201 when a budget was created and 200 when one was updated. Only
/// an update re-evaluates the period; a new budget is first checked by the
/// next expense write in its period.
pub async fn upsert_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    body: Bytes,
) -> Result<(StatusCode, Json<BudgetWithSpent>), AppError> {
    let new_budget: NewBudget = parse_json(&body)?;
    let upsert = state.db.upsert_budget(&user.id, &new_budget)?;

    if !upsert.created {
        BudgetEvaluator::new(&state.db).evaluate(&user.id, upsert.budget.period());
    }

    let entry = state.db.budget_with_spent(upsert.budget)?;

    state.audit(
        &user.id,
        if upsert.created { "create" } else { "update" },
        Some("budget"),
        Some(entry.budget.id),
        Some(&format!(
            "category={}, period={}, amount={}, status={}",
            entry.budget.category,
            entry.budget.period().label(),
            entry.budget.amount,
            entry.status.as_str()
        )),
    );

    let status = if upsert.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(entry)))
}

/// PUT /api/budgets/:id - Update a budget and re-evaluate its period
pub async fn update_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Json<BudgetWithSpent>, AppError> {
    let update: BudgetUpdate = parse_json(&body)?;
    let budget = state.db.update_budget(&user.id, id, &update)?;

    BudgetEvaluator::new(&state.db).evaluate(&user.id, budget.period());

    let entry = state.db.budget_with_spent(budget)?;

    state.audit(
        &user.id,
        "update",
        Some("budget"),
        Some(id),
        Some(&format!("status={}", entry.status.as_str())),
    );

    Ok(Json(entry))
}

/// DELETE /api/budgets/:id - Delete a budget
pub async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, AppError> {
    state.db.delete_budget(&user.id, id)?;

    state.audit(&user.id, "delete", Some("budget"), Some(id), None);

    Ok(Json(DeletedResponse { id }))
}
