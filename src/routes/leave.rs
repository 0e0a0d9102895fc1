use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::leave_dto::{CreateLeavePayload, LeaveListQuery, ReviewLeavePayload},
    dto::ApiResponse,
    error::Result,
    middleware::auth::Claims,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/licencia-permiso",
    request_body = CreateLeavePayload,
    responses(
        (status = 201, description = "Leave request created"),
        (status = 400, description = "Invalid dates or missing document"),
        (status = 404, description = "Worker not found")
    )
)]
#[axum::debug_handler]
pub async fn create_leave(
    State(state): State<AppState>,
    Json(payload): Json<CreateLeavePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let request = state.leave_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Leave request created", request)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/licencia-permiso",
    params(
        ("worker_id" = Option<Uuid>, Query, description = "Filter by worker"),
        ("status" = Option<String>, Query, description = "Filter by request status")
    ),
    responses((status = 200, description = "Leave requests, newest first"))
)]
#[axum::debug_handler]
pub async fn list_leaves(
    State(state): State<AppState>,
    Query(query): Query<LeaveListQuery>,
) -> Result<impl IntoResponse> {
    let requests = state.leave_service.list(query).await?;
    Ok(Json(ApiResponse::ok("Leave requests", requests)))
}

#[utoipa::path(
    get,
    path = "/api/licencia-permiso/{id}",
    params(("id" = Uuid, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Leave request"),
        (status = 404, description = "Leave request not found")
    )
)]
#[axum::debug_handler]
pub async fn get_leave(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let request = state.leave_service.get(id).await?;
    Ok(Json(ApiResponse::ok("Leave request", request)))
}

#[utoipa::path(
    post,
    path = "/api/licencia-permiso/{id}/review",
    params(("id" = Uuid, Path, description = "Leave request ID")),
    request_body = ReviewLeavePayload,
    responses(
        (status = 200, description = "Request reviewed"),
        (status = 409, description = "Request already reviewed"),
        (status = 404, description = "Leave request not found")
    )
)]
#[axum::debug_handler]
pub async fn review_leave(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ReviewLeavePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let request = state
        .leave_service
        .review(id, payload.decision, payload.comment, claims.user_id())
        .await?;
    Ok(Json(ApiResponse::ok("Leave request reviewed", request)))
}

#[utoipa::path(
    post,
    path = "/api/licencia-permiso/expirar",
    responses((status = 200, description = "Expiry sweep executed"))
)]
#[axum::debug_handler]
pub async fn run_expiry_sweep(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let reverted = state.leave_service.run_expiry_sweep().await?;
    Ok(Json(ApiResponse::ok(
        format!("Expiry sweep reverted {} record(s)", reverted),
        reverted,
    )))
}
