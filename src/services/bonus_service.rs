use crate::dto::bonus_dto::{
    AssignBonusPayload, CreateBonusPayload, UpdateAssignmentPayload, UpdateBonusPayload,
};
use crate::error::{Error, Result};
use crate::models::bonus::{Bonus, BonusAssignment, BonusRecurrence};
use crate::utils::dates;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Validity window of an assignment, derived from the bonus definition.
/// Permanent bonuses never end, one-off bonuses end the day they start,
/// recurring bonuses run `duration_months` with month-overflow clamped.
pub fn compute_end_date(
    recurrence: BonusRecurrence,
    start_date: NaiveDate,
    duration_months: Option<i32>,
) -> Option<NaiveDate> {
    match recurrence {
        BonusRecurrence::Permanent => None,
        BonusRecurrence::OneOff => Some(start_date),
        BonusRecurrence::Recurring => {
            let months = duration_months.unwrap_or(0).max(0) as u32;
            Some(dates::add_months_clamped(start_date, months))
        }
    }
}

#[derive(Clone)]
pub struct BonusService {
    pool: PgPool,
}

impl BonusService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: CreateBonusPayload) -> Result<Bonus> {
        self.check_name_unique(&payload.name, None).await?;
        self.check_signature_unique(
            payload.recurrence,
            &payload.amount,
            payload.taxable,
            payload.duration_months,
            None,
        )
        .await?;

        let bonus = sqlx::query_as::<_, Bonus>(
            r#"
            INSERT INTO bonuses (name, amount, category, recurrence, taxable, duration_months)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(&payload.amount)
        .bind(payload.category)
        .bind(payload.recurrence)
        .bind(payload.taxable)
        .bind(payload.duration_months)
        .fetch_one(&self.pool)
        .await?;
        Ok(bonus)
    }

    pub async fn get(&self, id: Uuid) -> Result<Bonus> {
        let bonus = sqlx::query_as::<_, Bonus>(r#"SELECT * FROM bonuses WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Bonus not found".to_string()))?;
        Ok(bonus)
    }

    pub async fn list(&self) -> Result<Vec<Bonus>> {
        let bonuses =
            sqlx::query_as::<_, Bonus>(r#"SELECT * FROM bonuses ORDER BY created_at DESC"#)
                .fetch_all(&self.pool)
                .await?;
        Ok(bonuses)
    }

    /// Updates a bonus and, when its recurrence or duration changed,
    /// recomputes and persists the end date of every active assignment.
    /// Assignments are never lazily recalculated at read time.
    pub async fn update(&self, id: Uuid, payload: UpdateBonusPayload) -> Result<Bonus> {
        let current = self.get(id).await?;

        let name = payload.name.unwrap_or_else(|| current.name.clone());
        let amount = payload.amount.unwrap_or_else(|| current.amount.clone());
        let category = payload.category.unwrap_or(current.category);
        let recurrence = payload.recurrence.unwrap_or(current.recurrence);
        let taxable = payload.taxable.unwrap_or(current.taxable);
        // Absent = keep, explicit null = clear back to indefinite.
        if let Some(Some(d)) = payload.duration_months {
            if d < 1 {
                return Err(Error::BadRequest(
                    "Bonus duration must be at least one month".to_string(),
                ));
            }
        }
        let duration_months = match payload.duration_months {
            Some(value) => value,
            None => current.duration_months,
        };

        if name != current.name {
            self.check_name_unique(&name, Some(id)).await?;
        }
        self.check_signature_unique(recurrence, &amount, taxable, duration_months, Some(id))
            .await?;

        let window_changed =
            recurrence != current.recurrence || duration_months != current.duration_months;

        let mut tx = self.pool.begin().await?;

        let bonus = sqlx::query_as::<_, Bonus>(
            r#"
            UPDATE bonuses
            SET name = $2, amount = $3, category = $4, recurrence = $5,
                taxable = $6, duration_months = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name.trim())
        .bind(&amount)
        .bind(category)
        .bind(recurrence)
        .bind(taxable)
        .bind(duration_months)
        .fetch_one(&mut *tx)
        .await?;

        if window_changed {
            let assignments = sqlx::query_as::<_, BonusAssignment>(
                r#"SELECT * FROM bonus_assignments WHERE bonus_id = $1 AND active = TRUE"#,
            )
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

            for assignment in &assignments {
                let end_date =
                    compute_end_date(bonus.recurrence, assignment.assigned_at, bonus.duration_months);
                sqlx::query(
                    r#"UPDATE bonus_assignments SET end_date = $2, updated_at = NOW() WHERE id = $1"#,
                )
                .bind(assignment.id)
                .bind(end_date)
                .execute(&mut *tx)
                .await?;
            }

            tracing::info!(
                bonus_id = %id,
                assignments = assignments.len(),
                "recomputed assignment end dates"
            );
        }

        tx.commit().await?;
        Ok(bonus)
    }

    pub async fn assign(&self, payload: AssignBonusPayload) -> Result<BonusAssignment> {
        let bonus = self.get(payload.bonus_id).await?;

        let record_exists: Option<(Uuid,)> =
            sqlx::query_as(r#"SELECT id FROM employment_records WHERE id = $1"#)
                .bind(payload.record_id)
                .fetch_optional(&self.pool)
                .await?;
        if record_exists.is_none() {
            return Err(Error::NotFound("Employment record not found".to_string()));
        }

        let assigned_at = payload.assigned_at.unwrap_or_else(dates::today);
        let end_date = compute_end_date(bonus.recurrence, assigned_at, bonus.duration_months);

        let assignment = sqlx::query_as::<_, BonusAssignment>(
            r#"
            INSERT INTO bonus_assignments (bonus_id, record_id, assigned_at, end_date, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(payload.bonus_id)
        .bind(payload.record_id)
        .bind(assigned_at)
        .bind(end_date)
        .bind(&payload.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(assignment)
    }

    pub async fn list_assignments(&self, record_id: Uuid) -> Result<Vec<BonusAssignment>> {
        let assignments = sqlx::query_as::<_, BonusAssignment>(
            r#"
            SELECT * FROM bonus_assignments
            WHERE record_id = $1
            ORDER BY assigned_at DESC, created_at DESC
            "#,
        )
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(assignments)
    }

    pub async fn update_assignment(
        &self,
        id: Uuid,
        payload: UpdateAssignmentPayload,
    ) -> Result<BonusAssignment> {
        let assignment = sqlx::query_as::<_, BonusAssignment>(
            r#"
            UPDATE bonus_assignments
            SET active = COALESCE($2, active),
                notes = COALESCE($3, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.active)
        .bind(payload.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Bonus assignment not found".to_string()))?;
        Ok(assignment)
    }

    async fn check_name_unique(&self, name: &str, exclude: Option<Uuid>) -> Result<()> {
        let clash: Option<(Uuid,)> = sqlx::query_as(
            r#"SELECT id FROM bonuses WHERE name = $1 AND ($2::uuid IS NULL OR id <> $2)"#,
        )
        .bind(name.trim())
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;
        if clash.is_some() {
            return Err(Error::Conflict(
                "A bonus with this name already exists".to_string(),
            ));
        }
        Ok(())
    }

    /// No two bonuses may share the same (recurrence, amount, taxable,
    /// duration) tuple.
    async fn check_signature_unique(
        &self,
        recurrence: BonusRecurrence,
        amount: &str,
        taxable: bool,
        duration_months: Option<i32>,
        exclude: Option<Uuid>,
    ) -> Result<()> {
        let clash: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM bonuses
            WHERE recurrence = $1 AND amount = $2 AND taxable = $3
              AND duration_months IS NOT DISTINCT FROM $4
              AND ($5::uuid IS NULL OR id <> $5)
            "#,
        )
        .bind(recurrence)
        .bind(amount)
        .bind(taxable)
        .bind(duration_months)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;
        if clash.is_some() {
            return Err(Error::Conflict(
                "A bonus with the same recurrence, amount, taxability and duration already exists"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn permanent_never_ends() {
        assert_eq!(
            compute_end_date(BonusRecurrence::Permanent, d(2024, 3, 1), Some(12)),
            None
        );
    }

    #[test]
    fn one_off_ends_on_its_start_date() {
        let start = d(2024, 3, 1);
        assert_eq!(
            compute_end_date(BonusRecurrence::OneOff, start, None),
            Some(start)
        );
        // Duration is ignored for one-off bonuses.
        assert_eq!(
            compute_end_date(BonusRecurrence::OneOff, start, Some(6)),
            Some(start)
        );
    }

    #[test]
    fn recurring_adds_months() {
        assert_eq!(
            compute_end_date(BonusRecurrence::Recurring, d(2024, 3, 15), Some(6)),
            Some(d(2024, 9, 15))
        );
    }

    #[test]
    fn recurring_clamps_month_overflow() {
        assert_eq!(
            compute_end_date(BonusRecurrence::Recurring, d(2024, 1, 31), Some(1)),
            Some(d(2024, 2, 29))
        );
        assert_eq!(
            compute_end_date(BonusRecurrence::Recurring, d(2023, 8, 31), Some(1)),
            Some(d(2023, 9, 30))
        );
    }

    #[test]
    fn recurring_without_duration_ends_at_start() {
        assert_eq!(
            compute_end_date(BonusRecurrence::Recurring, d(2024, 3, 1), None),
            Some(d(2024, 3, 1))
        );
    }
}
