use crate::error::Result;
use crate::models::employment_history::{EmploymentHistoryEntry, HistoryOrigin};
use crate::models::employment_record::EmploymentRecord;
use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Values copied into the ledger at the moment of a transition.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    pub position: String,
    pub department: String,
    pub contract_type: String,
    pub base_salary: i64,
    pub origin: HistoryOrigin,
    pub recorded_by: Option<Uuid>,
}

impl HistorySnapshot {
    /// Snapshot of the record's current terms; callers overwrite the
    /// fields a change touches before opening the new entry.
    pub fn of_record(
        record: &EmploymentRecord,
        origin: HistoryOrigin,
        recorded_by: Option<Uuid>,
    ) -> Self {
        Self {
            position: record.position.clone(),
            department: record.department.clone(),
            contract_type: record.contract_type.clone(),
            base_salary: record.base_salary,
            origin,
            recorded_by,
        }
    }
}

#[derive(Clone)]
pub struct HistoryService {
    pool: PgPool,
}

impl HistoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stamps the end date (and optionally a termination reason) on the
    /// worker's open ledger entry. The caller's transaction owns the write.
    pub async fn close_open_entry(
        conn: &mut PgConnection,
        worker_id: Uuid,
        end_date: NaiveDate,
        termination_reason: Option<&str>,
    ) -> Result<Option<Uuid>> {
        let closed: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE employment_history
            SET end_date = $2, termination_reason = COALESCE($3, termination_reason)
            WHERE worker_id = $1 AND end_date IS NULL
            RETURNING id
            "#,
        )
        .bind(worker_id)
        .bind(end_date)
        .bind(termination_reason)
        .fetch_optional(conn)
        .await?;
        Ok(closed.map(|(id,)| id))
    }

    /// Opens a fresh ledger entry. At most one open entry per worker exists
    /// at any time; callers close the previous one first (same transaction).
    pub async fn open_entry(
        conn: &mut PgConnection,
        worker_id: Uuid,
        snapshot: &HistorySnapshot,
        start_date: NaiveDate,
    ) -> Result<EmploymentHistoryEntry> {
        let entry = sqlx::query_as::<_, EmploymentHistoryEntry>(
            r#"
            INSERT INTO employment_history
                (worker_id, position, department, contract_type, base_salary,
                 start_date, origin, recorded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(worker_id)
        .bind(&snapshot.position)
        .bind(&snapshot.department)
        .bind(&snapshot.contract_type)
        .bind(snapshot.base_salary)
        .bind(start_date)
        .bind(snapshot.origin)
        .bind(snapshot.recorded_by)
        .fetch_one(conn)
        .await?;
        Ok(entry)
    }

    pub async fn close_current_and_open_new(
        conn: &mut PgConnection,
        worker_id: Uuid,
        snapshot: &HistorySnapshot,
        effective_date: NaiveDate,
    ) -> Result<EmploymentHistoryEntry> {
        Self::close_open_entry(&mut *conn, worker_id, effective_date, None).await?;
        Self::open_entry(conn, worker_id, snapshot, effective_date).await
    }

    /// Direct-change entries for one worker, newest first.
    pub async fn list_by_worker(&self, worker_id: Uuid) -> Result<Vec<EmploymentHistoryEntry>> {
        let entries = sqlx::query_as::<_, EmploymentHistoryEntry>(
            r#"
            SELECT * FROM employment_history
            WHERE worker_id = $1 AND origin = 'direct'
            ORDER BY start_date DESC, created_at DESC
            "#,
        )
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Unified view: direct-change and leave-originated entries merged,
    /// same ordering.
    pub async fn list_unified(&self, worker_id: Uuid) -> Result<Vec<EmploymentHistoryEntry>> {
        let entries = sqlx::query_as::<_, EmploymentHistoryEntry>(
            r#"
            SELECT * FROM employment_history
            WHERE worker_id = $1
            ORDER BY start_date DESC, created_at DESC
            "#,
        )
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
