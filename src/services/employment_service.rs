use crate::dto::employment_dto::{LaborChange, UpdateEmploymentPayload};
use crate::error::{Error, Result};
use crate::models::employment_history::HistoryOrigin;
use crate::models::employment_record::{EmploymentRecord, EmploymentStatus};
use crate::models::worker::Worker;
use crate::services::history_service::{HistoryService, HistorySnapshot};
use crate::utils::dates;
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Outcome of one applied labor change.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeSummary {
    pub worker_id: Uuid,
    pub change_type: String,
    pub previous_status: EmploymentStatus,
    pub new_status: EmploymentStatus,
    pub effective_date: NaiveDate,
    pub history_entry_id: Option<Uuid>,
}

#[derive(Clone)]
pub struct EmploymentService {
    pool: PgPool,
}

impl EmploymentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_by_worker(&self, worker_id: Uuid) -> Result<EmploymentRecord> {
        let record = sqlx::query_as::<_, EmploymentRecord>(
            r#"SELECT * FROM employment_records WHERE worker_id = $1"#,
        )
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Employment record not found".to_string()))?;
        Ok(record)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<EmploymentRecord> {
        let record =
            sqlx::query_as::<_, EmploymentRecord>(r#"SELECT * FROM employment_records WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound("Employment record not found".to_string()))?;
        Ok(record)
    }

    /// Direct HR edit of the non-protected fields. No ledger entry; the
    /// audit trail only tracks transitions.
    pub async fn update_fields(
        &self,
        id: Uuid,
        payload: UpdateEmploymentPayload,
    ) -> Result<EmploymentRecord> {
        let current = self.get_by_id(id).await?;
        if current.status == EmploymentStatus::Terminated {
            return Err(Error::BadRequest(
                "Employment record is terminated".to_string(),
            ));
        }

        let record = sqlx::query_as::<_, EmploymentRecord>(
            r#"
            UPDATE employment_records
            SET work_schedule = COALESCE($2, work_schedule),
                health_affiliation = COALESCE($3, health_affiliation),
                pension_affiliation = COALESCE($4, pension_affiliation),
                has_insurance = COALESCE($5, has_insurance),
                contract_document = COALESCE($6, contract_document),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.work_schedule)
        .bind(payload.health_affiliation)
        .bind(payload.pension_affiliation)
        .bind(payload.has_insurance)
        .bind(payload.contract_document)
        .fetch_one(&self.pool)
        .await?;
        Ok(record)
    }

    /// Applies one labor change: validates, then closes the open ledger
    /// entry (pre-change values frozen), opens a new entry with the
    /// post-change terms, updates the record and, for terminations, the
    /// worker, all inside one transaction. Lookup failures short-circuit
    /// before the transaction starts.
    pub async fn apply_labor_change(
        &self,
        worker_id: Uuid,
        change: LaborChange,
        acting_user: Option<Uuid>,
    ) -> Result<ChangeSummary> {
        let worker = sqlx::query_as::<_, Worker>(r#"SELECT * FROM workers WHERE id = $1"#)
            .bind(worker_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Worker not found".to_string()))?;

        let record = self.get_by_worker(worker.id).await?;
        validate_change(&record, &change)?;

        let effective_date = change_effective_date(&change).unwrap_or_else(dates::today);
        let previous_status = record.status;

        let mut tx = self.pool.begin().await?;

        let summary = match change {
            LaborChange::Termination { reason, .. } => {
                HistoryService::close_open_entry(
                    &mut tx,
                    worker.id,
                    effective_date,
                    Some(reason.trim()),
                )
                .await?;

                sqlx::query(
                    r#"
                    UPDATE employment_records
                    SET status = 'terminated', contract_end = $2,
                        termination_reason = $3, updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(record.id)
                .bind(effective_date)
                .bind(reason.trim())
                .execute(&mut *tx)
                .await?;

                sqlx::query(r#"UPDATE workers SET in_system = FALSE, updated_at = NOW() WHERE id = $1"#)
                    .bind(worker.id)
                    .execute(&mut *tx)
                    .await?;

                ChangeSummary {
                    worker_id: worker.id,
                    change_type: "termination".to_string(),
                    previous_status,
                    new_status: EmploymentStatus::Terminated,
                    effective_date,
                    history_entry_id: None,
                }
            }
            other => {
                // The open ledger entry holds the terms in force. Closing
                // it freezes the pre-change values; the new entry opens
                // with the post-change terms.
                let mut snapshot =
                    HistorySnapshot::of_record(&record, HistoryOrigin::Direct, acting_user);
                match &other {
                    LaborChange::RoleChange { position, .. } => {
                        snapshot.position = position.trim().to_string();
                    }
                    LaborChange::DepartmentChange { department, .. } => {
                        snapshot.department = department.trim().to_string();
                    }
                    LaborChange::ContractTypeChange { contract_type, .. } => {
                        snapshot.contract_type = contract_type.trim().to_string();
                    }
                    LaborChange::SalaryChange { new_salary, .. } => {
                        snapshot.base_salary = *new_salary;
                    }
                    // The schedule is not part of the ledger snapshot; the
                    // transition itself is still recorded.
                    LaborChange::ScheduleChange { .. } => {}
                    LaborChange::Termination { .. } => unreachable!("handled above"),
                }

                let entry = HistoryService::close_current_and_open_new(
                    &mut tx,
                    worker.id,
                    &snapshot,
                    effective_date,
                )
                .await?;

                let (column, value): (&str, ChangeValue) = match &other {
                    LaborChange::RoleChange { position, .. } => {
                        ("position", ChangeValue::Text(position.trim().to_string()))
                    }
                    LaborChange::DepartmentChange { department, .. } => {
                        ("department", ChangeValue::Text(department.trim().to_string()))
                    }
                    LaborChange::ContractTypeChange { contract_type, .. } => (
                        "contract_type",
                        ChangeValue::Text(contract_type.trim().to_string()),
                    ),
                    LaborChange::SalaryChange { new_salary, .. } => {
                        ("base_salary", ChangeValue::Int(*new_salary))
                    }
                    LaborChange::ScheduleChange { schedule, .. } => {
                        ("work_schedule", ChangeValue::Text(schedule.trim().to_string()))
                    }
                    LaborChange::Termination { .. } => unreachable!("handled above"),
                };

                let sql = format!(
                    "UPDATE employment_records SET {} = $2, updated_at = NOW() WHERE id = $1",
                    column
                );
                let query = sqlx::query(&sql).bind(record.id);
                match value {
                    ChangeValue::Text(v) => query.bind(v).execute(&mut *tx).await?,
                    ChangeValue::Int(v) => query.bind(v).execute(&mut *tx).await?,
                };

                ChangeSummary {
                    worker_id: worker.id,
                    change_type: other.kind().to_string(),
                    previous_status,
                    new_status: previous_status,
                    effective_date,
                    history_entry_id: Some(entry.id),
                }
            }
        };

        tx.commit().await?;

        tracing::info!(
            worker_id = %summary.worker_id,
            change_type = %summary.change_type,
            effective_date = %summary.effective_date,
            "labor change applied"
        );
        Ok(summary)
    }
}

enum ChangeValue {
    Text(String),
    Int(i64),
}

fn change_effective_date(change: &LaborChange) -> Option<NaiveDate> {
    match change {
        LaborChange::Termination { effective_date, .. } => Some(*effective_date),
        LaborChange::RoleChange { effective_date, .. }
        | LaborChange::DepartmentChange { effective_date, .. }
        | LaborChange::ContractTypeChange { effective_date, .. }
        | LaborChange::SalaryChange { effective_date, .. }
        | LaborChange::ScheduleChange { effective_date, .. } => *effective_date,
    }
}

/// Business-rule checks performed before any write. Terminated is
/// absorbing, salary never moves down through this path, and text fields
/// must carry a value.
fn validate_change(record: &EmploymentRecord, change: &LaborChange) -> Result<()> {
    if record.status == EmploymentStatus::Terminated {
        return Err(Error::BadRequest(
            "Employment record is terminated and accepts no further changes".to_string(),
        ));
    }

    match change {
        LaborChange::Termination { reason, .. } => {
            if reason.trim().is_empty() {
                return Err(Error::BadRequest(
                    "Termination requires a reason".to_string(),
                ));
            }
        }
        LaborChange::SalaryChange { new_salary, .. } => {
            if *new_salary <= 0 {
                return Err(Error::BadRequest(
                    "New salary must be greater than zero".to_string(),
                ));
            }
            if *new_salary <= record.base_salary {
                return Err(Error::BadRequest(
                    "New salary must be strictly greater than the current salary".to_string(),
                ));
            }
        }
        LaborChange::RoleChange { position, .. } => {
            require_text(position, "position")?;
        }
        LaborChange::DepartmentChange { department, .. } => {
            require_text(department, "department")?;
        }
        LaborChange::ContractTypeChange { contract_type, .. } => {
            require_text(contract_type, "contract type")?;
        }
        LaborChange::ScheduleChange { schedule, .. } => {
            require_text(schedule, "work schedule")?;
        }
    }
    Ok(())
}

fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::BadRequest(format!("A {} must be provided", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(status: EmploymentStatus, salary: i64) -> EmploymentRecord {
        EmploymentRecord {
            id: Uuid::new_v4(),
            worker_id: Uuid::new_v4(),
            position: "Operator".to_string(),
            department: "Plant".to_string(),
            contract_type: "indefinite".to_string(),
            work_schedule: Some("full-time".to_string()),
            base_salary: salary,
            health_affiliation: None,
            pension_affiliation: None,
            has_insurance: false,
            contract_start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            contract_end: None,
            status,
            termination_reason: None,
            leave_start: None,
            leave_end: None,
            leave_reason: None,
            contract_document: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn terminated_record_rejects_every_change() {
        let rec = record(EmploymentStatus::Terminated, 1_000_000);
        let change = LaborChange::Termination {
            effective_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            reason: "restructuring".to_string(),
        };
        let err = validate_change(&rec, &change).unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);

        let raise = LaborChange::SalaryChange {
            new_salary: 2_000_000,
            effective_date: None,
        };
        assert!(validate_change(&rec, &raise).is_err());
    }

    #[test]
    fn salary_must_strictly_increase() {
        let rec = record(EmploymentStatus::Active, 1_000_000);

        let equal = LaborChange::SalaryChange {
            new_salary: 1_000_000,
            effective_date: None,
        };
        assert!(validate_change(&rec, &equal).is_err());

        let cut = LaborChange::SalaryChange {
            new_salary: 900_000,
            effective_date: None,
        };
        assert!(validate_change(&rec, &cut).is_err());

        let zero = LaborChange::SalaryChange {
            new_salary: 0,
            effective_date: None,
        };
        assert!(validate_change(&rec, &zero).is_err());

        let raise = LaborChange::SalaryChange {
            new_salary: 1_500_000,
            effective_date: None,
        };
        assert!(validate_change(&rec, &raise).is_ok());
    }

    #[test]
    fn text_changes_require_content() {
        let rec = record(EmploymentStatus::Active, 500_000);
        let blank = LaborChange::RoleChange {
            position: "   ".to_string(),
            effective_date: None,
        };
        assert!(validate_change(&rec, &blank).is_err());

        let ok = LaborChange::DepartmentChange {
            department: "Logistics".to_string(),
            effective_date: None,
        };
        assert!(validate_change(&rec, &ok).is_ok());
    }

    #[test]
    fn changes_allowed_while_on_leave() {
        // A record on leave is not terminated; HR may still adjust terms.
        let rec = record(EmploymentStatus::MedicalLeave, 500_000);
        let raise = LaborChange::SalaryChange {
            new_salary: 600_000,
            effective_date: None,
        };
        assert!(validate_change(&rec, &raise).is_ok());
    }

    #[test]
    fn termination_requires_reason() {
        let rec = record(EmploymentStatus::Active, 500_000);
        let blank = LaborChange::Termination {
            effective_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            reason: "".to_string(),
        };
        assert!(validate_change(&rec, &blank).is_err());
    }
}
