use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "bonus_category", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BonusCategory {
    StateMandated,
    Company,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "bonus_recurrence", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BonusRecurrence {
    Permanent,
    Recurring,
    OneOff,
}

/// Reference pay-addition definition. `amount` is a formatted digit string,
/// never a float, to avoid locale-rounding ambiguity.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bonus {
    pub id: Uuid,
    pub name: String,
    pub amount: String,
    pub category: BonusCategory,
    pub recurrence: BonusRecurrence,
    pub taxable: bool,
    pub duration_months: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BonusAssignment {
    pub id: Uuid,
    pub bonus_id: Uuid,
    pub record_id: Uuid,
    pub assigned_at: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub active: bool,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
