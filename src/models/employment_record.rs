use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Current contractual state of a worker. Terminated is absorbing: once a
/// record reaches it, no further status-changing operation is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Active,
    MedicalLeave,
    AdministrativePermit,
    Terminated,
}

impl EmploymentStatus {
    pub fn is_leave(&self) -> bool {
        matches!(
            self,
            EmploymentStatus::MedicalLeave | EmploymentStatus::AdministrativePermit
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmploymentRecord {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub position: String,
    pub department: String,
    pub contract_type: String,
    pub work_schedule: Option<String>,
    pub base_salary: i64,
    pub health_affiliation: Option<String>,
    pub pension_affiliation: Option<String>,
    pub has_insurance: bool,
    pub contract_start: NaiveDate,
    pub contract_end: Option<NaiveDate>,
    pub status: EmploymentStatus,
    pub termination_reason: Option<String>,
    pub leave_start: Option<NaiveDate>,
    pub leave_end: Option<NaiveDate>,
    pub leave_reason: Option<String>,
    pub contract_document: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
