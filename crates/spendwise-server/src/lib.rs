//! Spendwise Web Server
//!
//! Axum-based REST API for the Spendwise personal finance tracker.
//!
//! Security features:
//! - Authentication via upstream identity header or API key (use --no-auth for local dev)
//! - Per-user ownership checks on every record
//! - Restrictive CORS policy
//! - Audit logging for all API access (reads and writes)
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info, warn};

use spendwise_core::{Clock, Database, SystemClock};

mod handlers;

/// Maximum import payload size (10 MB)
pub const MAX_IMPORT_SIZE: usize = 10 * 1024 * 1024;

/// Maximum audit log page size
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Header carrying the identity established by an upstream auth proxy
pub const USER_HEADER: &str = "x-spendwise-user";

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Identity used when authentication is disabled
pub const LOCAL_DEV_USER: &str = "local-dev";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// API keys for service authentication
    /// Format: "Bearer <key>" in Authorization header
    pub api_keys: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Source of "today" for budget periods and analytics
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Record an audit entry; failures are logged, not returned
    pub fn audit(
        &self,
        user_id: &str,
        action: &str,
        entity_type: Option<&str>,
        entity_id: Option<i64>,
        details: Option<&str>,
    ) {
        if let Err(e) = self
            .db
            .log_audit(user_id, action, entity_type, entity_id, details)
        {
            warn!(user_id, action, error = %e, "Failed to write audit entry");
        }
    }
}

/// The authenticated caller. Its `id` owns every record the request touches.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    /// How the caller was authenticated: header, api_key or none
    pub method: &'static str,
}

/// Authentication middleware - resolves the caller and stores it as a request extension
///
/// # Security Notes
///
/// **Identity header**: `x-spendwise-user` is trusted as-is. Only expose the
/// server behind a proxy that strips and sets this header.
///
/// **API keys**: Compared using constant-time comparison to prevent timing attacks.
/// The caller's identity is `api-key:<index>` so each key owns its own records.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let user = match resolve_user(request.headers(), &state.config) {
        Some(user) => user,
        None if !state.config.require_auth => CurrentUser {
            id: LOCAL_DEV_USER.to_string(),
            method: "none",
        },
        None => {
            warn!(path = %request.uri().path(), "Unauthorized request - no valid auth");
            return AppError::unauthorized("Authentication required").into_response();
        }
    };

    tracing::debug!(user = %user.id, method = user.method, path = %request.uri().path(), "Authenticated");
    request.extensions_mut().insert(user);
    next.run(request).await
}

/// Determine the caller from request headers
pub fn resolve_user(headers: &HeaderMap, config: &ServerConfig) -> Option<CurrentUser> {
    let header_user = headers
        .get(USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());

    if let Some(id) = header_user {
        return Some(CurrentUser {
            id: id.to_string(),
            method: "header",
        });
    }

    headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .and_then(|key| validate_api_key(key, &config.api_keys))
        .map(|index| CurrentUser {
            id: format!("api-key:{}", index),
            method: "api_key",
        })
}

/// Find the configured API key matching `provided`, using constant-time comparison
fn validate_api_key(provided: &str, valid_keys: &[String]) -> Option<usize> {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();

    valid_keys.iter().position(|key| {
        let key_bytes = key.as_bytes();
        // Only compare if lengths match (constant-time for same-length keys)
        provided_bytes.len() == key_bytes.len() && bool::from(provided_bytes.ct_eq(key_bytes))
    })
}

/// Parse a comma-separated list (API keys, CORS origins)
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Response for delete endpoints
#[derive(Serialize)]
pub struct DeletedResponse {
    pub id: i64,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    create_router_with_clock(db, static_dir, config, Arc::new(SystemClock))
}

/// Create the application router with an explicit clock (for testing)
pub fn create_router_with_clock(
    db: Database,
    static_dir: Option<&str>,
    config: ServerConfig,
    clock: Arc<dyn Clock>,
) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        clock,
    });

    let api_routes = Router::new()
        // Auth
        .route("/me", get(handlers::get_me))
        // Expenses
        .route(
            "/expenses",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/expenses/:id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        // Income
        .route(
            "/income",
            get(handlers::list_income).post(handlers::create_income),
        )
        .route(
            "/income/:id",
            get(handlers::get_income)
                .put(handlers::update_income)
                .delete(handlers::delete_income),
        )
        // Budgets
        .route(
            "/budgets",
            get(handlers::list_budgets).post(handlers::upsert_budget),
        )
        .route(
            "/budgets/:id",
            get(handlers::get_budget)
                .put(handlers::update_budget)
                .delete(handlers::delete_budget),
        )
        // Notifications
        .route(
            "/notifications",
            get(handlers::list_notifications).post(handlers::create_notification),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::unread_notification_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::mark_all_notifications_read),
        )
        .route(
            "/notifications/:id/read",
            put(handlers::mark_notification_read),
        )
        .route(
            "/notifications/:id",
            axum::routing::delete(handlers::delete_notification),
        )
        // Analytics
        .route("/analytics/dashboard", get(handlers::get_dashboard))
        .route("/analytics/trend", get(handlers::get_trend))
        .route("/analytics/categories", get(handlers::get_categories))
        .route("/analytics/window", get(handlers::get_window_analytics))
        .route("/analytics/activity", get(handlers::get_activity))
        // Data export/import
        .route("/data/export", get(handlers::export_data))
        .route(
            "/data/import",
            post(handlers::import_data).layer(DefaultBodyLimit::max(MAX_IMPORT_SIZE)),
        )
        // Audit log
        .route("/audit", get(handlers::list_audit_log));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    // Serve the browser client if a build directory is provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    } else if config.api_keys.is_empty() {
        info!(
            "No API keys configured; requests must carry the {} header",
            USER_HEADER
        );
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unauthorized(msg: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "message": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<spendwise_core::Error> for AppError {
    fn from(err: spendwise_core::Error) -> Self {
        use spendwise_core::Error;

        match err {
            Error::InvalidData(msg) | Error::Conflict(msg) => Self::bad_request(&msg),
            Error::Unauthorized(msg) => Self::unauthorized(&msg),
            Error::NotFound(msg) => Self::not_found(&msg),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(other.into()),
            },
        }
    }
}
