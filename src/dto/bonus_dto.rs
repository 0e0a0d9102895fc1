use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::bonus::{BonusCategory, BonusRecurrence};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBonusPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(custom(function = "crate::utils::validation::validate_amount"))]
    pub amount: String,
    pub category: BonusCategory,
    pub recurrence: BonusRecurrence,
    #[serde(default = "default_taxable")]
    pub taxable: bool,
    #[validate(range(min = 1))]
    pub duration_months: Option<i32>,
}

fn default_taxable() -> bool {
    true
}

/// `duration_months` uses a double option: an absent field leaves the
/// duration unchanged, an explicit `null` clears it back to indefinite.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateBonusPayload {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(custom(function = "crate::utils::validation::validate_amount"))]
    pub amount: Option<String>,
    pub category: Option<BonusCategory>,
    pub recurrence: Option<BonusRecurrence>,
    pub taxable: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub duration_months: Option<Option<i32>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<i32>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<i32>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignBonusPayload {
    pub bonus_id: Uuid,
    pub record_id: Uuid,
    pub assigned_at: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateAssignmentPayload {
    pub active: Option<bool>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_duration_distinguishes_absent_from_null() {
        let unchanged: UpdateBonusPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(unchanged.duration_months, None);

        let cleared: UpdateBonusPayload =
            serde_json::from_str(r#"{"duration_months": null}"#).unwrap();
        assert_eq!(cleared.duration_months, Some(None));

        let set: UpdateBonusPayload = serde_json::from_str(r#"{"duration_months": 6}"#).unwrap();
        assert_eq!(set.duration_months, Some(Some(6)));
    }
}
