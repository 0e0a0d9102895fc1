use crate::dto::worker_dto::{CreateWorkerPayload, UpdateWorkerPayload, WorkerWithRecord};
use crate::error::{Error, Result};
use crate::models::employment_history::HistoryOrigin;
use crate::models::employment_record::EmploymentRecord;
use crate::models::worker::Worker;
use crate::services::history_service::{HistoryService, HistorySnapshot};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct WorkerService {
    pool: PgPool,
}

impl WorkerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the worker, its 1:1 employment record and the initial open
    /// ledger entry in one transaction.
    pub async fn create(
        &self,
        payload: CreateWorkerPayload,
        acting_user: Option<Uuid>,
    ) -> Result<WorkerWithRecord> {
        let exists: Option<(Uuid,)> =
            sqlx::query_as(r#"SELECT id FROM workers WHERE national_id = $1"#)
                .bind(&payload.national_id)
                .fetch_optional(&self.pool)
                .await?;
        if exists.is_some() {
            return Err(Error::Conflict(
                "A worker with this national id already exists".to_string(),
            ));
        }

        // Normalize-on-write: absent or negative salaries become 0.
        let base_salary = payload.base_salary.unwrap_or(0).max(0);

        let mut tx = self.pool.begin().await?;

        let worker = sqlx::query_as::<_, Worker>(
            r#"
            INSERT INTO workers
                (national_id, first_name, last_name, email, phone, address, hire_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&payload.national_id)
        .bind(payload.first_name.trim())
        .bind(payload.last_name.trim())
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(payload.hire_date)
        .fetch_one(&mut *tx)
        .await?;

        let record = sqlx::query_as::<_, EmploymentRecord>(
            r#"
            INSERT INTO employment_records
                (worker_id, position, department, contract_type, work_schedule,
                 base_salary, health_affiliation, pension_affiliation, has_insurance,
                 contract_start, contract_end, contract_document)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(worker.id)
        .bind(payload.position.trim())
        .bind(payload.department.trim())
        .bind(payload.contract_type.trim())
        .bind(&payload.work_schedule)
        .bind(base_salary)
        .bind(&payload.health_affiliation)
        .bind(&payload.pension_affiliation)
        .bind(payload.has_insurance)
        .bind(payload.contract_start)
        .bind(payload.contract_end)
        .bind(&payload.contract_document)
        .fetch_one(&mut *tx)
        .await?;

        let snapshot = HistorySnapshot::of_record(&record, HistoryOrigin::Direct, acting_user);
        HistoryService::open_entry(&mut tx, worker.id, &snapshot, record.contract_start).await?;

        tx.commit().await?;

        tracing::info!(worker_id = %worker.id, "worker created");
        Ok(WorkerWithRecord { worker, record })
    }

    pub async fn get(&self, id: Uuid) -> Result<Worker> {
        let worker = sqlx::query_as::<_, Worker>(r#"SELECT * FROM workers WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Worker not found".to_string()))?;
        Ok(worker)
    }

    pub async fn list(&self, include_inactive: bool) -> Result<Vec<Worker>> {
        let workers = sqlx::query_as::<_, Worker>(
            r#"
            SELECT * FROM workers
            WHERE in_system = TRUE OR $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;
        Ok(workers)
    }

    /// Contact fields only. Identity and employment terms never move
    /// through this path, and workers are never hard-deleted.
    pub async fn update(&self, id: Uuid, payload: UpdateWorkerPayload) -> Result<Worker> {
        self.get(id).await?;
        let worker = sqlx::query_as::<_, Worker>(
            r#"
            UPDATE workers
            SET email = COALESCE($2, email),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.email)
        .bind(payload.phone)
        .bind(payload.address)
        .fetch_one(&self.pool)
        .await?;
        Ok(worker)
    }
}
