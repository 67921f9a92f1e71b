//! Spendwise Core Library
//!
//! Shared functionality for the Spendwise personal finance tracker:
//! - Domain models and validation
//! - SQLite record store with migrations and optional encryption
//! - Budget evaluation with deduplicated alert notifications
//! - Analytics over expense and income collections
//! - JSON/CSV export and JSON import

pub mod analytics;
pub mod budget;
pub mod clock;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod notify;
pub mod store;

pub use budget::{classify, BudgetEvaluator, Evaluation};
pub use clock::{Clock, FixedClock, SystemClock};
pub use db::{AuditEntry, BudgetUpsert, Database, ExpenseFilter};
pub use error::{Error, Result};
pub use export::{DataExport, ExportFormat, ImportPayload, ImportStats};
pub use notify::{notify_once, AlertKey, AlertSeverity};
pub use store::RecordStore;
