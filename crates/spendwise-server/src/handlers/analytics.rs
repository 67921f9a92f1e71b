//! Analytics handlers
//!
//! Each handler fetches the caller's records and hands them to the pure
//! functions in `spendwise_core::analytics` together with the server clock's
//! date.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;

use super::expenses::parse_window;
use crate::{AppError, AppState, CurrentUser};
use spendwise_core::analytics::{
    self, CategoryShare, DailyPoint, Dashboard, MonthlyPoint, WindowAnalytics,
    DEFAULT_ACTIVITY_DAYS, DEFAULT_TREND_MONTHS, MAX_ACTIVITY_DAYS, MAX_TREND_MONTHS,
};
use spendwise_core::models::{Expense, Income};
use spendwise_core::ExpenseFilter;

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub months: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    /// this-month, 7d, 30d (default), 90d, 1y, all
    pub window: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub days: Option<u32>,
}

fn load_records(state: &AppState, user_id: &str) -> Result<(Vec<Expense>, Vec<Income>), AppError> {
    let expenses = state.db.list_expenses(user_id, &ExpenseFilter::new())?;
    let income = state.db.list_income(user_id, None)?;
    Ok((expenses, income))
}

/// GET /api/analytics/dashboard - Current month stats with insights
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Dashboard>, AppError> {
    let (expenses, income) = load_records(&state, &user.id)?;
    let dashboard = analytics::dashboard(&expenses, &income, state.clock.today());

    state.audit(&user.id, "view", Some("dashboard"), None, None);

    Ok(Json(dashboard))
}

/// GET /api/analytics/trend?months=N - Monthly expense/income totals, oldest first
pub async fn get_trend(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<TrendQuery>,
) -> Result<Json<Vec<MonthlyPoint>>, AppError> {
    let months = params
        .months
        .unwrap_or(DEFAULT_TREND_MONTHS)
        .clamp(1, MAX_TREND_MONTHS);

    let (expenses, income) = load_records(&state, &user.id)?;
    let trend = analytics::monthly_trend(&expenses, &income, state.clock.today(), months);

    state.audit(
        &user.id,
        "view",
        Some("trend"),
        None,
        Some(&format!("months={}", months)),
    );

    Ok(Json(trend))
}

/// GET /api/analytics/categories?window= - Category breakdown within a window
pub async fn get_categories(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<WindowQuery>,
) -> Result<Json<Vec<CategoryShare>>, AppError> {
    let window = parse_window(params.window.as_deref())?.unwrap_or_default();
    let filter = window.apply(ExpenseFilter::new(), state.clock.today());

    let expenses = state.db.list_expenses(&user.id, &filter)?;
    let breakdown = analytics::category_breakdown(&expenses);

    state.audit(
        &user.id,
        "view",
        Some("categories"),
        None,
        Some(&format!("window={}", window)),
    );

    Ok(Json(breakdown))
}

/// GET /api/analytics/window?window= - Totals, breakdowns and deltas for a window
pub async fn get_window_analytics(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<WindowQuery>,
) -> Result<Json<WindowAnalytics>, AppError> {
    let window = parse_window(params.window.as_deref())?.unwrap_or_default();

    let (expenses, income) = load_records(&state, &user.id)?;
    let report = analytics::window_analytics(&expenses, &income, window, state.clock.today());

    state.audit(
        &user.id,
        "view",
        Some("window_analytics"),
        None,
        Some(&format!("window={}", window)),
    );

    Ok(Json(report))
}

/// GET /api/analytics/activity?days=N - Daily spend for the last N days
pub async fn get_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<ActivityQuery>,
) -> Result<Json<Vec<DailyPoint>>, AppError> {
    let days = params
        .days
        .unwrap_or(DEFAULT_ACTIVITY_DAYS)
        .clamp(1, MAX_ACTIVITY_DAYS);
    let today = state.clock.today();

    let since = today - chrono::Duration::days(i64::from(days));
    let filter = ExpenseFilter::new().since(Some(since));
    let expenses = state.db.list_expenses(&user.id, &filter)?;
    let activity = analytics::daily_activity(&expenses, today, days);

    state.audit(
        &user.id,
        "view",
        Some("activity"),
        None,
        Some(&format!("days={}", days)),
    );

    Ok(Json(activity))
}
