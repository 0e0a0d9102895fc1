use crate::dto::leave_dto::{CreateLeavePayload, LeaveListQuery, ReviewDecision};
use crate::error::{Error, Result};
use crate::models::employment_history::HistoryOrigin;
use crate::models::employment_record::{EmploymentRecord, EmploymentStatus};
use crate::models::leave_request::{LeaveRequest, LeaveType};
use crate::services::history_service::{HistoryService, HistorySnapshot};
use crate::utils::dates;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct LeaveService {
    pool: PgPool,
}

impl LeaveService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateLeavePayload) -> Result<LeaveRequest> {
        if payload.end_date <= payload.start_date {
            return Err(Error::BadRequest(
                "Leave end date must be after the start date".to_string(),
            ));
        }
        if payload.leave_type == LeaveType::MedicalLeave && payload.document.is_none() {
            return Err(Error::BadRequest(
                "Medical leave requires an attached document".to_string(),
            ));
        }

        let worker_exists: Option<(Uuid,)> =
            sqlx::query_as(r#"SELECT id FROM workers WHERE id = $1 AND in_system = TRUE"#)
                .bind(payload.worker_id)
                .fetch_optional(&self.pool)
                .await?;
        if worker_exists.is_none() {
            return Err(Error::NotFound("Worker not found".to_string()));
        }

        let request = sqlx::query_as::<_, LeaveRequest>(
            r#"
            INSERT INTO leave_requests
                (worker_id, leave_type, start_date, end_date, justification, document)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(payload.worker_id)
        .bind(payload.leave_type)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(payload.justification.trim())
        .bind(payload.document)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    pub async fn get(&self, id: Uuid) -> Result<LeaveRequest> {
        let request =
            sqlx::query_as::<_, LeaveRequest>(r#"SELECT * FROM leave_requests WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound("Leave request not found".to_string()))?;
        Ok(request)
    }

    pub async fn list(&self, query: LeaveListQuery) -> Result<Vec<LeaveRequest>> {
        let requests = sqlx::query_as::<_, LeaveRequest>(
            r#"
            SELECT * FROM leave_requests
            WHERE ($1::uuid IS NULL OR worker_id = $1)
              AND ($2::leave_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(query.worker_id)
        .bind(query.status)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// Reviews a pending request. Approval transactionally pushes the
    /// employment record into the matching leave status and opens a ledger
    /// entry dated at the leave start; rejection touches the request row
    /// only. A request already in a terminal state fails with Conflict.
    pub async fn review(
        &self,
        id: Uuid,
        decision: ReviewDecision,
        comment: Option<String>,
        reviewer: Option<Uuid>,
    ) -> Result<LeaveRequest> {
        let request = self.get(id).await?;
        if request.status.is_terminal() {
            return Err(Error::Conflict(
                "Leave request has already been reviewed".to_string(),
            ));
        }

        if decision == ReviewDecision::Reject {
            // The pending guard closes the window between the check above
            // and this write when two reviewers race.
            let updated = sqlx::query_as::<_, LeaveRequest>(
                r#"
                UPDATE leave_requests
                SET status = 'rejected', reviewed_by = $2, review_comment = $3,
                    updated_at = NOW()
                WHERE id = $1 AND status = 'pending'
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(reviewer)
            .bind(comment)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                Error::Conflict("Leave request has already been reviewed".to_string())
            })?;
            return Ok(updated);
        }

        let record = sqlx::query_as::<_, EmploymentRecord>(
            r#"SELECT * FROM employment_records WHERE worker_id = $1"#,
        )
        .bind(request.worker_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Employment record not found".to_string()))?;

        if record.status == EmploymentStatus::Terminated {
            return Err(Error::BadRequest(
                "Employment record is terminated and accepts no further changes".to_string(),
            ));
        }

        let snapshot = HistorySnapshot::of_record(&record, HistoryOrigin::Leave, reviewer);

        let mut tx = self.pool.begin().await?;

        HistoryService::close_current_and_open_new(
            &mut tx,
            request.worker_id,
            &snapshot,
            request.start_date,
        )
        .await?;

        sqlx::query(
            r#"
            UPDATE employment_records
            SET status = $2, leave_start = $3, leave_end = $4, leave_reason = $5,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(request.leave_type.employment_status())
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.justification)
        .execute(&mut *tx)
        .await?;

        // Guarded on pending: if a concurrent review won, zero rows come
        // back, the transaction drops and the ledger writes roll back.
        let updated = sqlx::query_as::<_, LeaveRequest>(
            r#"
            UPDATE leave_requests
            SET status = 'approved', reviewed_by = $2, review_comment = $3,
                updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(reviewer)
        .bind(comment)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| Error::Conflict("Leave request has already been reviewed".to_string()))?;

        tx.commit().await?;

        tracing::info!(
            request_id = %id,
            worker_id = %request.worker_id,
            leave_type = ?request.leave_type,
            "leave request approved"
        );
        Ok(updated)
    }

    /// Reverts every record whose leave window has elapsed back to Active.
    /// The daily cron job and the manual trigger both land here; records
    /// with `leave_end >= today` are never touched, so rerunning is a
    /// no-op.
    pub async fn run_expiry_sweep(&self) -> Result<u64> {
        let today = dates::today();
        let expired = sqlx::query_as::<_, EmploymentRecord>(
            r#"
            SELECT * FROM employment_records
            WHERE status IN ('medical_leave', 'administrative_permit')
              AND leave_end IS NOT NULL
              AND leave_end < $1
            "#,
        )
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        let mut reverted = 0u64;
        for record in expired {
            match self.end_expired_leave(&record).await {
                Ok(()) => reverted += 1,
                Err(e) => {
                    tracing::error!(
                        record_id = %record.id,
                        worker_id = %record.worker_id,
                        error = %e,
                        "failed to expire leave"
                    );
                }
            }
        }

        if reverted > 0 {
            tracing::info!(count = reverted, "expired leaves reverted to active");
        }
        Ok(reverted)
    }

    /// Single source of truth for what expiry means: close the leave
    /// ledger entry at `leave_end`, reopen one with current terms, and
    /// clear the leave fields.
    async fn end_expired_leave(&self, record: &EmploymentRecord) -> Result<()> {
        // Another writer may have moved the record since the scan.
        if !record.status.is_leave() {
            return Ok(());
        }
        let leave_end = record
            .leave_end
            .ok_or_else(|| Error::Internal("Leave record has no end date".to_string()))?;

        let snapshot = HistorySnapshot::of_record(record, HistoryOrigin::Leave, None);

        let mut tx = self.pool.begin().await?;

        HistoryService::close_current_and_open_new(&mut tx, record.worker_id, &snapshot, leave_end)
            .await?;

        sqlx::query(
            r#"
            UPDATE employment_records
            SET status = 'active', leave_start = NULL, leave_end = NULL,
                leave_reason = NULL, updated_at = NOW()
            WHERE id = $1 AND status IN ('medical_leave', 'administrative_permit')
            "#,
        )
        .bind(record.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
