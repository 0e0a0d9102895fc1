use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::leave_request::LeaveType;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateLeavePayload {
    pub worker_id: Uuid,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 1))]
    pub justification: String,
    /// Stored filename from a prior document upload. Required for medical
    /// leave, optional for administrative permits.
    pub document: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReviewLeavePayload {
    pub decision: ReviewDecision,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LeaveListQuery {
    pub worker_id: Option<Uuid>,
    pub status: Option<crate::models::leave_request::LeaveStatus>,
}
