use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::employment_record::EmploymentRecord;
use crate::models::worker::Worker;

/// Creating a worker also creates its 1:1 employment record and the
/// initial open history entry, so the payload carries both halves.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateWorkerPayload {
    #[validate(custom(function = "crate::utils::validation::validate_national_id"))]
    pub national_id: String,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub hire_date: NaiveDate,

    #[validate(length(min = 1))]
    pub position: String,
    #[validate(length(min = 1))]
    pub department: String,
    #[validate(length(min = 1))]
    pub contract_type: String,
    pub work_schedule: Option<String>,
    pub base_salary: Option<i64>,
    pub health_affiliation: Option<String>,
    pub pension_affiliation: Option<String>,
    #[serde(default)]
    pub has_insurance: bool,
    pub contract_start: NaiveDate,
    pub contract_end: Option<NaiveDate>,
    pub contract_document: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateWorkerPayload {
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WorkerListQuery {
    /// When true, workers flagged out of the system are included.
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkerWithRecord {
    pub worker: Worker,
    pub record: EmploymentRecord,
}
