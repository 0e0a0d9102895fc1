use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Whether a ledger entry was produced by a direct HR change or by the
/// leave-request workflow. The unified history view merges both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "history_origin", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum HistoryOrigin {
    Direct,
    Leave,
}

/// Immutable audit row capturing one past employment state. The only
/// permitted mutation after insert is stamping `end_date` when the entry
/// is superseded.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmploymentHistoryEntry {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub position: String,
    pub department: String,
    pub contract_type: String,
    pub base_salary: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub termination_reason: Option<String>,
    pub origin: HistoryOrigin,
    pub recorded_by: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
}
