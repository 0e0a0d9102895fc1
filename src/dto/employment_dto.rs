use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One requested labor change. The variant fields make "payload field must
/// be present" a type-level guarantee; empty strings are still rejected by
/// the service before any write.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "change_type", rename_all = "snake_case")]
pub enum LaborChange {
    Termination {
        effective_date: NaiveDate,
        reason: String,
    },
    RoleChange {
        position: String,
        effective_date: Option<NaiveDate>,
    },
    DepartmentChange {
        department: String,
        effective_date: Option<NaiveDate>,
    },
    ContractTypeChange {
        contract_type: String,
        effective_date: Option<NaiveDate>,
    },
    SalaryChange {
        new_salary: i64,
        effective_date: Option<NaiveDate>,
    },
    ScheduleChange {
        schedule: String,
        effective_date: Option<NaiveDate>,
    },
}

impl LaborChange {
    pub fn kind(&self) -> &'static str {
        match self {
            LaborChange::Termination { .. } => "termination",
            LaborChange::RoleChange { .. } => "role_change",
            LaborChange::DepartmentChange { .. } => "department_change",
            LaborChange::ContractTypeChange { .. } => "contract_type_change",
            LaborChange::SalaryChange { .. } => "salary_change",
            LaborChange::ScheduleChange { .. } => "schedule_change",
        }
    }
}

/// Direct HR edit of the non-protected employment fields. Status, salary,
/// position, department and contract type only move through the labor
/// change path.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateEmploymentPayload {
    pub work_schedule: Option<String>,
    pub health_affiliation: Option<String>,
    pub pension_affiliation: Option<String>,
    pub has_insurance: Option<bool>,
    pub contract_document: Option<String>,
}
