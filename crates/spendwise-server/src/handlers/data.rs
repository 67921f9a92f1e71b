//! Data export and import handlers

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{header, Response, StatusCode},
    Extension, Json,
};
use serde::Deserialize;
use tracing::info;

use super::parse_json;
use crate::{AppError, AppState, CurrentUser};
use spendwise_core::{ExportFormat, ImportPayload, ImportStats};

/// Query parameters for export
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Output format: json (default) or csv
    pub format: Option<String>,
}

/// GET /api/data/export?format=json|csv - Download all of the caller's data
pub async fn export_data(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<ExportQuery>,
) -> Result<Response<Body>, AppError> {
    let format = match params.format.as_deref() {
        Some(raw) => raw
            .parse::<ExportFormat>()
            .map_err(|e| AppError::bad_request(&e))?,
        None => ExportFormat::default(),
    };

    let content = match format {
        ExportFormat::Json => state.db.export_json(&user.id)?,
        ExportFormat::Csv => state.db.export_csv(&user.id)?,
    };

    state.audit(
        &user.id,
        "export",
        None,
        None,
        Some(&format!("format={:?}, bytes={}", format, content.len())),
    );
    info!(user = %user.id, ?format, "Exported data");

    let content_type = match format {
        ExportFormat::Json => format.content_type().to_string(),
        ExportFormat::Csv => format!("{}; charset=utf-8", format.content_type()),
    };

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", format.file_name()),
        )
        .body(Body::from(content))
        .map_err(|e| AppError::internal(&e.to_string()))
}

/// POST /api/data/import - Import expenses, income and budgets for the caller
pub async fn import_data(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    body: Bytes,
) -> Result<Json<ImportStats>, AppError> {
    let payload: ImportPayload = parse_json(&body)?;
    let stats = state.db.import_data(&user.id, &payload)?;

    state.audit(
        &user.id,
        "import",
        None,
        None,
        Some(&format!(
            "expenses={}, income={}, budgets={}, budgets_skipped={}",
            stats.expenses, stats.income, stats.budgets, stats.budgets_skipped
        )),
    );

    Ok(Json(stats))
}
