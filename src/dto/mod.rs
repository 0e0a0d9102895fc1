pub mod auth_dto;
pub mod bonus_dto;
pub mod employment_dto;
pub mod leave_dto;
pub mod worker_dto;

use serde::Serialize;

/// Single response envelope used by every endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let body = serde_json::to_value(ApiResponse::ok("created", 7)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "created");
        assert_eq!(body["data"], 7);
    }

    #[test]
    fn data_omitted_when_absent() {
        let body = serde_json::to_value(ApiResponse::message("done")).unwrap();
        assert!(body.get("data").is_none());
    }
}
